//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Channel capacity for position samples
const POSITION_CHANNEL_SIZE: usize = 16;

/// Handle position readings from the sampler, consumed by the trainer
pub static POSITION_CHANNEL: Channel<CriticalSectionRawMutex, i32, POSITION_CHANNEL_SIZE> =
    Channel::new();
