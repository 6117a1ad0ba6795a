//! Job evaluation and application lifecycle engine.
//!
//! The crate is organized around three subsystems:
//!
//! - [`pipeline`]: turns raw job postings into classified, scored
//!   apply/skip decision records against a set of role variants.
//! - [`tracker`]: the persisted application table, its status state
//!   machine, and follow-up scheduling.
//! - [`interviews`]: interview scheduling and time-offset reminder
//!   computation.
//!
//! Collectors (scrapers), resume generation, and the dashboard UI live
//! outside this crate and talk to it through the routers in `tracker`
//! and `interviews` or through the `jobwright-api` CLI.

pub mod config;
pub mod error;
pub mod interviews;
pub mod pipeline;
pub mod telemetry;
pub mod tracker;
