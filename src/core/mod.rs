//! Core application logic
//!
//! This module contains:
//! - Normalization settings (persisted, overridable from the CLI)
//! - Audio file discovery below a chosen directory
//! - The batch runner that normalizes files one at a time

mod batch;
mod scanning;
mod state;

pub use batch::{run_batch, BatchReport};
pub use scanning::DirectoryScan;
pub use state::NormalizeSettings;
