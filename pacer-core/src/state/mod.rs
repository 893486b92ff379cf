//! State machine for training program execution
//!
//! The program is either idle or running one of its steps. Transitions are
//! explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::{Event, ProgramEvent};
pub use machine::ProgramState;
