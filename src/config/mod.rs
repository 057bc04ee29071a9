//! Configuration module for lockstep
//!
//! User preferences for the demo window and their persistence to the
//! platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
