//! Sequence control capability
//!
//! The stroke detector starts the training program on a completed stroke.
//! It only needs to know whether the program is running and how to start
//! it, so it receives this capability instead of the sequencer itself.

use core::cell::RefCell;

use crate::sequencer::SequencerError;

/// Start/running control over a training program
pub trait SequenceControl {
    /// Check if the program is running
    fn running(&self) -> bool;

    /// Start the program from its first step
    fn start(&mut self) -> Result<(), SequencerError>;
}

impl<S: SequenceControl + ?Sized> SequenceControl for &mut S {
    fn running(&self) -> bool {
        (**self).running()
    }

    fn start(&mut self) -> Result<(), SequencerError> {
        (**self).start()
    }
}

/// Shared access for hosts that own the sequencer next to the detector
///
/// A sequencer that is already borrowed reports itself as running, so the
/// detector never tries to start it re-entrantly.
impl<S: SequenceControl> SequenceControl for &RefCell<S> {
    fn running(&self) -> bool {
        self.try_borrow().map(|s| s.running()).unwrap_or(true)
    }

    fn start(&mut self) -> Result<(), SequencerError> {
        match self.try_borrow_mut() {
            Ok(mut s) => s.start(),
            Err(_) => Err(SequencerError::Busy),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Counts start requests
    #[derive(Debug, Default)]
    pub struct MockControl {
        pub running: bool,
        pub starts: u32,
    }

    impl SequenceControl for MockControl {
        fn running(&self) -> bool {
            self.running
        }

        fn start(&mut self) -> Result<(), SequencerError> {
            self.starts += 1;
            self.running = true;
            Ok(())
        }
    }
}
