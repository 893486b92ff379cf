//! Timer tasks owned by the sequencer

/// Work scheduled on the sequencer's timer queue
///
/// The sequencer dispatches these itself when they come due, so no
/// callback ever needs a pointer back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerTask {
    /// Repeating: light the indicator and beep at the target cadence
    CadenceSignal,
    /// One-shot: end the indicator pulse started by a cadence signal
    IndicatorOff,
    /// One-shot: the active step's duration elapsed
    StepAdvance,
    /// One-shot: second half of the step transition cue
    TransitionTone,
}

impl SequencerTask {
    /// Check if this task belongs to the active step
    ///
    /// Step tasks are cancelled whenever the step changes or the program
    /// stops; cue tasks run to completion.
    pub fn is_step_task(&self) -> bool {
        matches!(self, SequencerTask::CadenceSignal | SequencerTask::StepAdvance)
    }
}
