//! Host timestamp bookkeeping.

use std::time::Duration;

/// Converts host frame timestamps into simulation deltas.
///
/// The first timestamp observed after [`FrameClock::restart`] only anchors
/// the clock and yields a zero delta. A timestamp that goes backwards also
/// yields a zero delta and becomes the new reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    last: Option<Duration>,
}

impl FrameClock {
    /// Creates a clock that has not observed any timestamp yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Forgets the reference timestamp, typically when a level (re)starts.
    pub fn restart(&mut self) {
        self.last = None;
    }

    /// Records `now` and returns the time elapsed since the previous timestamp.
    pub fn observe(&mut self, now: Duration) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last = Some(now);
        dt
    }

    /// Moves the reference forward by `dt` and returns it unchanged.
    ///
    /// An unanchored clock is anchored at zero first.
    pub fn step(&mut self, dt: Duration) -> Duration {
        let base = self.last.unwrap_or(Duration::ZERO);
        self.last = Some(base.saturating_add(dt));
        dt
    }

    /// Most recently observed timestamp, if any.
    #[must_use]
    pub const fn last(&self) -> Option<Duration> {
        self.last
    }
}
