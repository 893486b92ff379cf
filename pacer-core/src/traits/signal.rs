//! Cadence and transition cue outputs
//!
//! The sequencer drives two fire-and-forget effects: a visual indicator
//! (LED) and a tone generator (piezo buzzer). Neither reports completion.

/// Trait for the visual cadence indicator
pub trait Indicator {
    /// Turn the indicator on or off
    fn set_on(&mut self, on: bool);
}

/// Trait for audible cues
///
/// Implementations start the tone and return immediately; the tone stops
/// on its own after `duration_ms`. A new tone replaces one still playing.
pub trait ToneOutput {
    /// Emit a tone at `frequency_hz` for `duration_ms`
    fn tone(&mut self, frequency_hz: u16, duration_ms: u16);
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn set_on(&mut self, on: bool) {
        (**self).set_on(on)
    }
}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    fn tone(&mut self, frequency_hz: u16, duration_ms: u16) {
        (**self).tone(frequency_hz, duration_ms)
    }
}
