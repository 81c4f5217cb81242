//! Splice time and duck gain math
//!
//! Maps normalized percentages (0.0..=1.0) to physical units. Inputs are
//! expected to be clamped by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest splice position (seconds from segment start)
pub const MIN_SPLICE_TIME: f64 = 0.020;
/// Longest splice position (seconds from segment start)
pub const MAX_SPLICE_TIME: f64 = 0.060;
/// Duck level at 0% crispness
pub const MIN_DUCK_DB: f64 = 0.0;
/// Duck level at 100% crispness
pub const MAX_DUCK_DB: f64 = -15.0;

/// Splice position in seconds for a 0..=1 splice percentage
#[inline]
pub fn splice_time(splice_percent: f64) -> f64 {
    MIN_SPLICE_TIME + splice_percent * (MAX_SPLICE_TIME - MIN_SPLICE_TIME)
}

/// Duck level in dB for a 0..=1 crispness percentage (more crisp = quieter)
#[inline]
pub fn duck_db(crisp_percent: f64) -> f64 {
    MIN_DUCK_DB + crisp_percent * (MAX_DUCK_DB - MIN_DUCK_DB)
}

/// Linear amplitude multiplier for a dB value
#[inline]
pub fn linear_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Decibel value wrapper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decibels(pub f64);

impl Decibels {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn to_gain(self) -> f64 {
        linear_gain(self.0)
    }
}

impl Default for Decibels {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Decibels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} dB", self.0)
    }
}
