//! Events consumed and produced by the program state machine

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Program start requested (host or first completed stroke)
    Start,
    /// Current step's duration elapsed
    StepElapsed,
    /// Program stop requested
    Stop,
}

/// Program progress reported to the host after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramEvent {
    /// A step became active (0-based index)
    StepStarted(usize),
    /// The last step finished and the program stopped
    ProgramFinished,
}

impl ProgramEvent {
    /// Check if this event ends the program
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgramEvent::ProgramFinished)
    }
}
