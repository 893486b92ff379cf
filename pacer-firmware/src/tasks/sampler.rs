//! Position sampling task
//!
//! Reads the handle position sensor and forwards every changed reading to
//! the trainer task.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use crate::channels::POSITION_CHANNEL;

/// ADC sampling configuration
pub struct SamplerConfig {
    /// Sampling interval in ms
    pub interval_ms: u64,
    /// Noise LSBs dropped from each 12-bit reading
    pub shift_bits: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5,
            shift_bits: 4,
        }
    }
}

/// Convert a raw ADC reading to a position
fn to_position(raw: u16, shift_bits: u8) -> i32 {
    (raw >> shift_bits.min(15)) as i32
}

/// Position sampling task
#[embassy_executor::task]
pub async fn sampler_task(
    mut adc: Adc<'static, Async>,
    mut channel: Channel<'static>,
    config: SamplerConfig,
) {
    info!(
        "Sampler task started ({} ms, {} bits dropped)",
        config.interval_ms, config.shift_bits
    );

    let mut ticker = Ticker::every(Duration::from_millis(config.interval_ms));
    let mut last: Option<i32> = None;

    loop {
        ticker.next().await;

        match adc.read(&mut channel).await {
            Ok(raw) => {
                let position = to_position(raw, config.shift_bits);
                if last == Some(position) {
                    continue;
                }
                last = Some(position);

                if POSITION_CHANNEL.try_send(position).is_err() {
                    warn!("Position channel full, sample dropped");
                }
            }
            Err(e) => {
                warn!("ADC read failed: {:?}", e);
            }
        }
    }
}
