//! Training program type definitions
//!
//! Programs are authored outside the device and loaded step by step into
//! the sequencer before the workout starts.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum steps per program
pub const MAX_STEPS: usize = 16;

/// Maximum program label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum instruction text length
pub const MAX_INSTRUCTION_LEN: usize = 32;

/// Milliseconds per minute, the numerator of every cadence conversion
pub const MS_PER_MINUTE: u32 = 60_000;

/// Errors building or transferring a training program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramError {
    /// Program already holds `MAX_STEPS` steps
    TooManySteps,
    /// Output buffer too small for the encoded program
    Encode,
    /// Bytes are not a valid encoded program
    Decode,
}

/// One segment of a training program
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingStep {
    /// Target stroke rate in strokes per minute (0 = no cadence signal)
    pub target_spm: u16,
    /// Duration in seconds
    pub duration_s: u32,
    /// Instruction shown to the rower; not interpreted by the core
    pub instruction: String<MAX_INSTRUCTION_LEN>,
}

impl TrainingStep {
    /// Create a step
    ///
    /// Instructions longer than `MAX_INSTRUCTION_LEN` bytes are truncated.
    pub fn new(target_spm: u16, duration_s: u32, instruction: &str) -> Self {
        Self {
            target_spm,
            duration_s,
            instruction: truncated(instruction),
        }
    }

    /// Check if this step paces the rower with a cadence signal
    pub fn has_cadence(&self) -> bool {
        self.target_spm != 0
    }

    /// Interval between cadence signals, or None for an unpaced step
    ///
    /// Never shorter than 1 ms.
    pub fn cadence_period_ms(&self) -> Option<u32> {
        if self.has_cadence() {
            Some((MS_PER_MINUTE / self.target_spm as u32).max(1))
        } else {
            None
        }
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.duration_s.saturating_mul(1000)
    }
}

/// Ordered list of training steps
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingProgram {
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
    /// Steps in execution order
    pub steps: Vec<TrainingStep, MAX_STEPS>,
}

impl TrainingProgram {
    /// Create an empty program
    pub fn new(label: &str) -> Self {
        Self {
            label: truncated(label),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn push(&mut self, step: TrainingStep) -> Result<(), ProgramError> {
        self.steps.push(step).map_err(|_| ProgramError::TooManySteps)
    }

    /// Total program duration in seconds
    pub fn total_duration_s(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.duration_s))
    }
}

/// Copy `text` into a bounded string, dropping whatever does not fit
fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
