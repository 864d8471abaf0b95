use std::cmp::Ordering;

use crate::foundation::error::{MergeError, MergeResult};

pub use kurbo::{Affine, Size, Vec2};

/// Rational media time: `value / timescale` seconds.
///
/// Durations coming out of containers are rational, and comparing them in
/// floating point invites off-by-one-frame surprises, so comparisons are
/// done by cross-multiplication.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct MediaTime {
    /// Time value in `1/timescale` units.
    pub value: i64,
    /// Units per second; must be > 0.
    pub timescale: u32,
}

impl MediaTime {
    /// Zero time at a nominal 600-unit timescale.
    pub const ZERO: MediaTime = MediaTime {
        value: 0,
        timescale: 600,
    };

    /// Build a time value, rejecting a zero timescale.
    pub fn new(value: i64, timescale: u32) -> MergeResult<Self> {
        if timescale == 0 {
            return Err(MergeError::validation("MediaTime timescale must be > 0"));
        }
        Ok(Self { value, timescale })
    }

    /// Build a time value from seconds, rounding to the given timescale.
    pub fn from_secs_f64(secs: f64, timescale: u32) -> MergeResult<Self> {
        if timescale == 0 {
            return Err(MergeError::validation("MediaTime timescale must be > 0"));
        }
        Ok(Self {
            value: (secs * f64::from(timescale)).round() as i64,
            timescale,
        })
    }

    /// Time in seconds as a float.
    pub fn as_secs_f64(self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// True when strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.value > 0
    }

    /// The later of two times.
    pub fn max(self, other: MediaTime) -> MediaTime {
        if self >= other { self } else { other }
    }
}

impl PartialEq for MediaTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MediaTime {}

impl PartialOrd for MediaTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MediaTime {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.value) * i128::from(other.timescale);
        let rhs = i128::from(other.value) * i128::from(self.timescale);
        lhs.cmp(&rhs)
    }
}

/// A half-open span of media time starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Range start.
    pub start: MediaTime,
    /// Range length; must not be negative.
    pub duration: MediaTime,
}

impl TimeRange {
    /// Build a range, rejecting negative durations.
    pub fn new(start: MediaTime, duration: MediaTime) -> MergeResult<Self> {
        if duration.value < 0 {
            return Err(MergeError::validation("TimeRange duration must be >= 0"));
        }
        Ok(Self { start, duration })
    }

    /// Full-length range starting at zero.
    pub fn from_start(duration: MediaTime) -> MergeResult<Self> {
        Self::new(MediaTime::ZERO, duration)
    }

    /// Range end in seconds.
    pub fn end_secs_f64(self) -> f64 {
        self.start.as_secs_f64() + self.duration.as_secs_f64()
    }
}

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator; must be > 0.
    pub num: u32,
    /// Denominator; must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate, rejecting zero terms.
    pub fn new(num: u32, den: u32) -> MergeResult<Self> {
        if den == 0 {
            return Err(MergeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MergeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frame rate as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Fixed output frame rate of the merged composition.
pub const MERGE_FPS: Fps = Fps { num: 30, den: 1 };
