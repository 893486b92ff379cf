//! Training step sequencer
//!
//! Plays a training program step by step: paces the rower with cadence
//! signals at each step's target rate and moves on when a step's time is up.

pub mod executor;
pub mod task;

pub use executor::{SequencerError, StepSequencer};
pub use task::SequencerTask;
