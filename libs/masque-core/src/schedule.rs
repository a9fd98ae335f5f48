//! Time-of-day windows for routines

use chrono::NaiveTime;

/// A wall-clock time-of-day window.
///
/// When start < end the window is the ordinary daytime range
/// `[start, end)`. When start >= end the window wraps overnight:
/// active strictly after `start` or strictly before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Parse a `["HH:MM", "HH:MM"]` pair
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        let start = NaiveTime::parse_from_str(start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end, "%H:%M").ok()?;
        Some(Self { start, end })
    }

    /// Check whether `now` falls within the window
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.start < self.end {
            self.start <= now && now < self.end
        } else {
            // Overnight range (e.g. 22:00 to 06:00)
            self.start < now || now < self.end
        }
    }
}
