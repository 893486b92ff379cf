//! PWM piezo buzzer
//!
//! Plays fixed-length tones without blocking. `tone()` starts the square
//! wave and returns immediately; `poll()` silences it once the tone's
//! duration has passed, so it must be called from the host loop at least
//! as often as the shortest tone needs.
//!
//! ```ignore
//! let mut buzzer = PwmBuzzer::new(pwm, clock);
//! buzzer.tone(880, 60);
//!
//! // In the host loop:
//! buzzer.poll();
//! ```

use embedded_hal::pwm::SetDutyCycle;
use pacer_core::traits::{Clock, ToneOutput};

/// PWM outputs whose period can be retuned at runtime
///
/// `embedded-hal` only covers the duty cycle; the board layer supplies the
/// divider/top arithmetic for its timer.
pub trait ToneFrequency {
    /// Set the output frequency in Hz
    fn set_frequency(&mut self, frequency_hz: u16);
}

impl<T: ToneFrequency + ?Sized> ToneFrequency for &mut T {
    fn set_frequency(&mut self, frequency_hz: u16) {
        T::set_frequency(self, frequency_hz)
    }
}

/// Sounding tone, (start time, length) in ms
#[derive(Debug, Clone, Copy)]
struct Sounding {
    started_ms: u32,
    duration_ms: u32,
}

/// Piezo buzzer on a PWM channel
pub struct PwmBuzzer<P, C> {
    pwm: P,
    clock: C,
    sounding: Option<Sounding>,
}

impl<P, C> PwmBuzzer<P, C>
where
    P: SetDutyCycle + ToneFrequency,
    C: Clock,
{
    /// Create a new buzzer, silent
    pub fn new(pwm: P, clock: C) -> Self {
        let mut buzzer = Self {
            pwm,
            clock,
            sounding: None,
        };
        buzzer.silence();
        buzzer
    }

    /// Stop the tone immediately
    pub fn silence(&mut self) {
        self.sounding = None;
        if self.pwm.set_duty_cycle_fully_off().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Buzzer PWM write failed");
        }
    }

    /// Silence the tone if its duration has elapsed
    ///
    /// Returns true while a tone is still sounding.
    pub fn poll(&mut self) -> bool {
        let Some(sounding) = self.sounding else {
            return false;
        };

        let elapsed = self.clock.now_ms().wrapping_sub(sounding.started_ms);
        if elapsed >= sounding.duration_ms {
            self.silence();
            false
        } else {
            true
        }
    }

    /// Check if a tone is sounding
    pub fn is_sounding(&self) -> bool {
        self.sounding.is_some()
    }

    /// Release the PWM output
    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P, C> ToneOutput for PwmBuzzer<P, C>
where
    P: SetDutyCycle + ToneFrequency,
    C: Clock,
{
    /// Start a tone, replacing any tone still sounding
    fn tone(&mut self, frequency_hz: u16, duration_ms: u16) {
        if frequency_hz == 0 || duration_ms == 0 {
            self.silence();
            return;
        }

        self.pwm.set_frequency(frequency_hz);
        if self.pwm.set_duty_cycle_percent(50).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Buzzer PWM write failed");
            self.sounding = None;
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Tone {} Hz for {} ms", frequency_hz, duration_ms);

        self.sounding = Some(Sounding {
            started_ms: self.clock.now_ms(),
            duration_ms: duration_ms as u32,
        });
    }
}
