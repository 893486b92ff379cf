//! Three-sample turning point window

/// Turning point in the position signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Turn {
    /// Local maximum passed: the drive finished, stroke ended
    End,
    /// Local minimum passed: the recovery finished, stroke began
    Begin,
}

/// The last three position observations
///
/// `position` is the latest raw reading; `previous` and `before_previous`
/// are the last two readings that changed the value. All three start at
/// zero, so the first samples of a session can register a turning point
/// against the seed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionWindow {
    position: i32,
    previous: i32,
    before_previous: i32,
}

impl PositionWindow {
    /// Create a zero-seeded window
    pub const fn new() -> Self {
        Self {
            position: 0,
            previous: 0,
            before_previous: 0,
        }
    }

    /// Latest raw reading
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Last changed reading before `position`
    pub fn previous(&self) -> i32 {
        self.previous
    }

    /// Changed reading before `previous`
    pub fn before_previous(&self) -> i32 {
        self.before_previous
    }

    /// Store a raw reading
    ///
    /// Returns true if it differs from the previous reading.
    pub fn record(&mut self, position: i32) -> bool {
        self.position = position;
        self.position != self.previous
    }

    /// Classify the latest reading against the history
    ///
    /// The end check runs first. Both need a strict reversal, so at most
    /// one can match.
    pub fn turn(&self) -> Option<Turn> {
        if self.position < self.previous && self.before_previous < self.previous {
            Some(Turn::End)
        } else if self.position > self.previous && self.before_previous > self.previous {
            Some(Turn::Begin)
        } else {
            None
        }
    }

    /// Move the latest reading into history
    pub fn shift(&mut self) {
        self.before_previous = self.previous;
        self.previous = self.position;
    }
}
