//! Hardware driver implementations
//!
//! Concrete implementations of the output traits defined in pacer-core,
//! written against `embedded-hal` so any board HAL can back them:
//!
//! - Cadence indicator on a GPIO pin (LED or lamp driver)
//! - Piezo buzzer on a PWM channel

#![no_std]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod indicator;

pub use buzzer::{PwmBuzzer, ToneFrequency};
pub use indicator::GpioIndicator;
