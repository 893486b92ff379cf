//! Cooperative timer registry
//!
//! A polled replacement for hardware timer callbacks: tasks are plain
//! values that come back out of [`TimerQueue::poll`] when their deadline
//! has elapsed. The owner decides what each task means.

pub mod queue;

pub use queue::{TaskHandle, TimerError, TimerQueue, TIMER_SLOTS};
