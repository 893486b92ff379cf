//! Board-agnostic core logic for the rowing trainer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (clock, indicator, tone output)
//! - Stroke detection from the raw position signal
//! - Cooperative timer registry
//! - Training step sequencer and its program state machine
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod rower;
pub mod sequencer;
pub mod state;
pub mod timer;
pub mod traits;
