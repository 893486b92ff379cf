//! Device tuning values
//!
//! Constants carried over from the reference device, exposed as
//! configuration so boards with different buzzers or sensors can adjust them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Empirical correction added to every measured stroke length
///
/// Compensates for the sampling lag between the true turning point and the
/// sample that reveals it.
pub const STROKE_LENGTH_OFFSET: i32 = 2;

/// Stroke detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Added to `end - begin` when computing stroke length
    pub stroke_length_offset: i32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            stroke_length_offset: STROKE_LENGTH_OFFSET,
        }
    }
}

/// Cadence and transition cue configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalConfig {
    /// Cadence beep frequency (Hz)
    pub cadence_tone_hz: u16,
    /// Cadence beep length (ms)
    pub cadence_tone_ms: u16,
    /// How long the indicator stays lit per cadence pulse (ms)
    pub pulse_ms: u32,
    /// First transition tone frequency (Hz)
    pub transition_low_hz: u16,
    /// Second transition tone frequency (Hz)
    pub transition_high_hz: u16,
    /// Length of each transition tone (ms)
    pub transition_tone_ms: u16,
    /// Delay between the start of the two transition tones (ms)
    pub transition_gap_ms: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            cadence_tone_hz: 880,
            cadence_tone_ms: 60,
            pulse_ms: 200,
            transition_low_hz: 440,
            transition_high_hz: 880,
            transition_tone_ms: 60,
            transition_gap_ms: 60,
        }
    }
}
