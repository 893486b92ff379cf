//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod clock;
pub mod control;
pub mod signal;

pub use clock::Clock;
pub use control::SequenceControl;
pub use signal::{Indicator, ToneOutput};
