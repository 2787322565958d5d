//! CLI command implementations

pub mod monitor;
pub mod onboard;
pub mod users;
