//! Fade curves and fade settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CcError, Timecode};

/// Fade curve shapes understood by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FadeCurve {
    #[default]
    Linear,
    Fast,
    Slow,
    Sharp,
    Smooth,
}

impl FadeCurve {
    /// All curves in curve-index order
    pub const ALL: [FadeCurve; 5] = [
        FadeCurve::Linear,
        FadeCurve::Fast,
        FadeCurve::Slow,
        FadeCurve::Sharp,
        FadeCurve::Smooth,
    ];

    /// Curve for a curve index (0-4). Anything else falls back to Linear.
    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(FadeCurve::Linear)
    }

    pub fn index(self) -> i32 {
        match self {
            FadeCurve::Linear => 0,
            FadeCurve::Fast => 1,
            FadeCurve::Slow => 2,
            FadeCurve::Sharp => 3,
            FadeCurve::Smooth => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::Fast => "Fast",
            FadeCurve::Slow => "Slow",
            FadeCurve::Sharp => "Sharp",
            FadeCurve::Smooth => "Smooth",
        }
    }
}

impl fmt::Display for FadeCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FadeCurve {
    type Err = CcError;

    /// Accepts a curve name (case-insensitive) or a curve index
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<i32>() {
            if (0..Self::ALL.len() as i32).contains(&index) {
                return Ok(Self::from_index(index));
            }
            return Err(CcError::InvalidParam(format!("curve index out of range: {index}")));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CcError::InvalidParam(format!("unknown fade curve: {s}")))
    }
}

/// Fade configuration on one edge of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Fade {
    /// Fade length
    pub length: Timecode,
    /// Fade curve type
    pub curve: FadeCurve,
}

impl Fade {
    pub fn new(length: Timecode, curve: FadeCurve) -> Self {
        Self { length, curve }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping() {
        for (i, curve) in FadeCurve::ALL.iter().enumerate() {
            assert_eq!(curve.index(), i as i32);
            assert_eq!(FadeCurve::from_index(i as i32), *curve);
        }
        assert_eq!(FadeCurve::from_index(-1), FadeCurve::Linear);
        assert_eq!(FadeCurve::from_index(9), FadeCurve::Linear);
    }

    #[test]
    fn test_parse() {
        assert_eq!("smooth".parse::<FadeCurve>().unwrap(), FadeCurve::Smooth);
        assert_eq!("Sharp".parse::<FadeCurve>().unwrap(), FadeCurve::Sharp);
        assert_eq!("2".parse::<FadeCurve>().unwrap(), FadeCurve::Slow);
        assert!("7".parse::<FadeCurve>().is_err());
        assert!("wobbly".parse::<FadeCurve>().is_err());
    }
}
