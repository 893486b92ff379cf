//! RP2040 glue for the core and driver traits

use core::convert::Infallible;

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Instant;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use pacer_core::traits::Clock;
use pacer_drivers::ToneFrequency;

/// Millisecond clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Wraps after ~49 days; the core only uses wrapping differences
        Instant::now().as_millis() as u32
    }
}

/// PWM clock divider for the buzzer slice
///
/// 125 MHz / 64 keeps every audible frequency above ~30 Hz within a
/// 16-bit top.
const BUZZER_DIVIDER: u8 = 64;

/// Buzzer output on PWM channel B of one slice
pub struct PwmTone {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmTone {
    /// Take over a slice, silent until a frequency and duty are set
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = PwmConfig::default();
        config.divider = BUZZER_DIVIDER.into();
        config.top = u16::MAX;
        config.compare_b = 0;
        pwm.set_config(&config);

        Self { pwm, config }
    }
}

impl ToneFrequency for PwmTone {
    fn set_frequency(&mut self, frequency_hz: u16) {
        let tick_hz = clk_sys_freq() / BUZZER_DIVIDER as u32;
        let top = (tick_hz / frequency_hz.max(1) as u32)
            .saturating_sub(1)
            .clamp(1, u16::MAX as u32);

        // Keep the duty fraction across the period change
        let old_period = self.config.top as u32 + 1;
        let compare = self.config.compare_b as u32 * (top + 1) / old_period;

        self.config.top = top as u16;
        self.config.compare_b = compare.min(top) as u16;
        self.pwm.set_config(&self.config);
    }
}

impl ErrorType for PwmTone {
    type Error = Infallible;
}

impl SetDutyCycle for PwmTone {
    fn max_duty_cycle(&self) -> u16 {
        self.config.top
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.config.compare_b = duty.min(self.config.top);
        self.pwm.set_config(&self.config);
        Ok(())
    }
}
