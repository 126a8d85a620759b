//! CLI command implementations

mod context;
mod start;
mod status;

pub use start::{StartOptions, run_start};
pub use status::{StatusOptions, run_status};
