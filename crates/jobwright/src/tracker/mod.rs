//! Application tracking: the persisted entity table, the status state
//! machine, and follow-up scheduling.

pub mod domain;
pub mod followup;
pub mod lifecycle;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{Application, ApplicationStatus, StatusChange};
pub use followup::{
    due_followups, followup_interval_days, next_followup, template, DueFollowup,
};
pub use lifecycle::{transition, TransitionError};
pub use router::application_router;
pub use store::{ApplicationStore, ApplicationUpdate, StoreError, StoreSummary};
