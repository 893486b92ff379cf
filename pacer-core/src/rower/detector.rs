//! Stroke detector
//!
//! Watches the position signal for turning points. A local maximum ends
//! the stroke (the handle reached the end of the drive) and a local minimum
//! begins the next one. Stroke rate is measured separately from the
//! end-to-end and begin-to-begin intervals and averaged.

use super::window::{PositionWindow, Turn};
use crate::config::{DetectorConfig, MS_PER_MINUTE};
use crate::traits::{Clock, SequenceControl};

/// Stroke detector
///
/// Starts the training program through `control` on a completed stroke
/// whenever the program is not already running.
#[derive(Debug)]
pub struct Rower<C, S> {
    clock: C,
    control: S,
    config: DetectorConfig,
    window: PositionWindow,
    /// Position at the last stroke begin
    begin_position: Option<i32>,
    strokes: u32,
    stroke_length: i32,
    last_end_ms: Option<u32>,
    last_begin_ms: Option<u32>,
    /// Cadence from the end-to-end interval
    pull_spm: f32,
    /// Cadence from the begin-to-begin interval
    give_spm: f32,
    last_turn: Option<Turn>,
}

impl<C: Clock, S: SequenceControl> Rower<C, S> {
    /// Create a detector with default configuration
    pub fn new(clock: C, control: S) -> Self {
        Self::with_config(clock, control, DetectorConfig::default())
    }

    /// Create a detector
    pub fn with_config(clock: C, control: S, config: DetectorConfig) -> Self {
        Self {
            clock,
            control,
            config,
            window: PositionWindow::new(),
            begin_position: None,
            strokes: 0,
            stroke_length: 0,
            last_end_ms: None,
            last_begin_ms: None,
            pull_spm: 0.0,
            give_spm: 0.0,
            last_turn: None,
        }
    }

    /// Record a raw position reading
    ///
    /// Returns false, changing nothing else, if the reading equals the
    /// previous one.
    pub fn update_position(&mut self, position: i32) -> bool {
        let now = self.clock.now_ms();

        if !self.window.record(position) {
            return false;
        }

        let turn = self.window.turn();
        match turn {
            Some(Turn::End) => self.stroke_end(position, now),
            Some(Turn::Begin) => self.stroke_begin(position, now),
            None => {}
        }

        self.window.shift();
        self.last_turn = turn;
        true
    }

    fn stroke_end(&mut self, position: i32, now: u32) {
        self.strokes = self.strokes.saturating_add(1);

        if let Some(begin) = self.begin_position {
            self.stroke_length = position
                .saturating_sub(begin)
                .saturating_add(self.config.stroke_length_offset);
        }

        self.pull_spm = cadence(now, self.last_end_ms);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Stroke {} end: length={}, pull={} spm",
            self.strokes,
            self.stroke_length,
            self.pull_spm
        );

        if !self.control.running() {
            match self.control.start() {
                Ok(()) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Program started by stroke {}", self.strokes);
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Stroke could not start program: {:?}", _e);
                }
            }
        }

        self.last_end_ms = Some(now);
    }

    fn stroke_begin(&mut self, position: i32, now: u32) {
        self.begin_position = Some(position);
        self.give_spm = cadence(now, self.last_begin_ms);

        #[cfg(feature = "defmt")]
        defmt::trace!("Stroke begin at {}: give={} spm", position, self.give_spm);

        self.last_begin_ms = Some(now);
    }

    /// Average of the pull and give cadence estimates
    pub fn spm(&self) -> f32 {
        (self.pull_spm + self.give_spm) / 2.0
    }

    /// Cadence from the last two stroke ends (0 until known)
    pub fn pull_spm(&self) -> f32 {
        self.pull_spm
    }

    /// Cadence from the last two stroke begins (0 until known)
    pub fn give_spm(&self) -> f32 {
        self.give_spm
    }

    /// Latest raw reading
    pub fn position(&self) -> i32 {
        self.window.position()
    }

    /// Strokes completed
    pub fn stroke_count(&self) -> u32 {
        self.strokes
    }

    /// Length of the last stroke (0 until a begin preceded an end)
    pub fn stroke_length(&self) -> i32 {
        self.stroke_length
    }

    /// Turning point found by the last changed reading
    pub fn last_turn(&self) -> Option<Turn> {
        self.last_turn
    }

    /// Turning point history
    pub fn window(&self) -> &PositionWindow {
        &self.window
    }

    /// Access the sequence control capability
    pub fn control(&self) -> &S {
        &self.control
    }

    /// Mutable access to the sequence control capability
    pub fn control_mut(&mut self) -> &mut S {
        &mut self.control
    }

    /// Forget all strokes and history, as if freshly created
    pub fn reset(&mut self) {
        self.window = PositionWindow::new();
        self.begin_position = None;
        self.strokes = 0;
        self.stroke_length = 0;
        self.last_end_ms = None;
        self.last_begin_ms = None;
        self.pull_spm = 0.0;
        self.give_spm = 0.0;
        self.last_turn = None;
    }
}

/// Strokes per minute for the interval since `last`
///
/// Zero when there is no previous turning point or no time has passed.
fn cadence(now: u32, last: Option<u32>) -> f32 {
    match last.map(|t| now.wrapping_sub(t)) {
        Some(elapsed) if elapsed > 0 => MS_PER_MINUTE as f32 / elapsed as f32,
        _ => 0.0,
    }
}
