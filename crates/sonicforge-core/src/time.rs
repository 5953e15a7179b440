//! Time representation for waveform editing.
//!
//! All times are seconds as `f64`. A `TimeRange` keeps its endpoints in the
//! order they were produced so a reverse drag can be represented; call
//! [`TimeRange::normalized`] before using it as an interval.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pair of time offsets in seconds.
///
/// `start <= end` is not required. Consumers that need an interval should
/// use [`TimeRange::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    /// Anchor of the range (where a drag began).
    pub start: f64,
    /// Moving end of the range.
    pub end: f64,
}

impl TimeRange {
    /// Create a new time range.
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// A zero-length range at `time`.
    #[inline]
    pub fn point(time: f64) -> Self {
        Self {
            start: time,
            end: time,
        }
    }

    /// Same range with `start <= end`.
    #[inline]
    pub fn normalized(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Absolute length in seconds.
    #[inline]
    pub fn duration(self) -> f64 {
        (self.end - self.start).abs()
    }

    /// Whether the range has no length.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.duration() <= f64::EPSILON
    }

    /// Check if a time falls within the normalized range (inclusive).
    pub fn contains(self, time: f64) -> bool {
        let n = self.normalized();
        time >= n.start && time <= n.end
    }

    /// Smallest range covering both this range and `time`.
    pub fn extended_to(self, time: f64) -> Self {
        let n = self.normalized();
        Self {
            start: n.start.min(time),
            end: n.end.max(time),
        }
    }

    /// Clamp both endpoints into `[0, duration]`, preserving order.
    pub fn clamped(self, duration: f64) -> Self {
        Self {
            start: clamp_time(self.start, duration),
            end: clamp_time(self.end, duration),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s..{:.3}s", self.start, self.end)
    }
}

/// Clamp a time into `[0, duration]`. Non-finite input maps to 0.
#[inline]
pub fn clamp_time(time: f64, duration: f64) -> f64 {
    let duration = if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    };
    if !time.is_finite() {
        return 0.0;
    }
    time.clamp(0.0, duration)
}

/// Format seconds as `m:ss`, or `h:mm:ss` once past an hour.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
