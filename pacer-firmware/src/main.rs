//! Pacer - Rowing Trainer Firmware
//!
//! Main firmware binary for RP2040-based rowing machine add-ons. Detects
//! strokes from the handle position sensor and paces a training program
//! with an LED and a piezo buzzer.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use {defmt_rtt as _, panic_probe as _};

mod board;
mod channels;
mod program;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pacer firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Handle position sensor on ADC0 (GPIO26)
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let position_channel = Channel::new_pin(p.PIN_26, Pull::None);

    // Cadence LED (Pico onboard LED: GPIO25)
    let led = Output::new(p.PIN_25, Level::Low);

    // Piezo buzzer on PWM slice 7, channel B (GPIO15)
    let pwm = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, PwmConfig::default());
    let tone = board::PwmTone::new(pwm);

    let program = program::default_program();
    info!(
        "Program '{}': {} steps, {} s",
        program.label.as_str(),
        program.steps.len(),
        program.total_duration_s()
    );

    spawner
        .spawn(tasks::sampler_task(
            adc,
            position_channel,
            tasks::SamplerConfig::default(),
        ))
        .unwrap();
    spawner
        .spawn(tasks::trainer_task(led, tone, program))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // All work happens in the spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
