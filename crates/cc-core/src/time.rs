//! Timeline time values

use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Position or duration on the timeline, in whole nanoseconds.
///
/// Integer storage keeps `start + length` exact when a segment is shifted
/// backwards and extended by the same amount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timecode(pub i64);

impl Timecode {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * NANOS_PER_SECOND).round() as i64)
    }

    #[inline]
    pub fn from_millis(ms: f64) -> Self {
        Self((ms * NANOS_PER_MILLI).round() as i64)
    }

    #[inline]
    pub fn to_seconds(self) -> f64 {
        self.0 as f64 / NANOS_PER_SECOND
    }

    #[inline]
    pub fn to_millis(self) -> f64 {
        self.0 as f64 / NANOS_PER_MILLI
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl std::ops::Add for Timecode {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Timecode {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Timecode {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Timecode {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}ms", self.to_millis())
    }
}
