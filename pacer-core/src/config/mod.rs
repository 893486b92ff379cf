//! Configuration types
//!
//! Training program definitions and device tuning values.

#[cfg(feature = "serde")]
pub mod program;
pub mod tuning;
pub mod types;

pub use tuning::*;
pub use types::*;
