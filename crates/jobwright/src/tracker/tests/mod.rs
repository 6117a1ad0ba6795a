mod common;
mod followup;
mod store;
