//! Binary program transfer
//!
//! Programs travel as postcard-encoded bytes, so a host tool can author a
//! program and the firmware can load it without a text parser.

use super::types::{ProgramError, TrainingProgram};

impl TrainingProgram {
    /// Encode into `buf`, returning the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, ProgramError> {
        postcard::to_slice(self, buf)
            .map(|used| used.len())
            .map_err(|_| ProgramError::Encode)
    }

    /// Decode a program from bytes produced by [`TrainingProgram::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self, ProgramError> {
        postcard::from_bytes(bytes).map_err(|_| ProgramError::Decode)
    }
}
