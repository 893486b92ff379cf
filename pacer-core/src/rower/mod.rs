//! Stroke detection
//!
//! Turns the raw position stream of the rowing machine into stroke
//! boundaries, stroke length, and stroke rate.

pub mod detector;
pub mod window;

pub use detector::Rower;
pub use window::{PositionWindow, Turn};
