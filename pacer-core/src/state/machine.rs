//! Program state machine definition

use super::events::Event;

/// Program execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramState {
    /// No program running
    #[default]
    Idle,
    /// Executing the step at this index
    Running(usize),
}

impl ProgramState {
    /// Check if a step is being executed
    pub fn is_running(&self) -> bool {
        matches!(self, ProgramState::Running(_))
    }

    /// Index of the active step
    pub fn step(&self) -> Option<usize> {
        match self {
            ProgramState::Running(index) => Some(*index),
            ProgramState::Idle => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// `step_count` is the number of steps in the loaded program.
    pub fn transition(self, event: Event, step_count: usize) -> Self {
        use Event::*;
        use ProgramState::*;

        match (self, event) {
            // Start (or restart) from the first step
            (_, Start) if step_count > 0 => Running(0),

            // Step elapsed: next step, or finished after the last one
            (Running(index), StepElapsed) if index + 1 < step_count => Running(index + 1),
            (Running(_), StepElapsed) => Idle,

            (Running(_), Stop) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
