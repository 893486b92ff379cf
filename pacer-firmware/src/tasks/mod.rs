//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod sampler;
pub mod trainer;

pub use sampler::{sampler_task, SamplerConfig};
pub use trainer::trainer_task;
