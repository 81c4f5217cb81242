//! Parameter tuples
//!
//! Two representations of the same settings:
//! - [`SliderValues`]: the four UI-space integers stored in settings and presets
//! - [`SpliceParams`]: the physical-unit tuple consumed by the splice transform

use serde::{Deserialize, Serialize};

use crate::{Decibels, FadeCurve, Timecode, duck_db, linear_gain, splice_time};

/// Lowest slider position
pub const SLIDER_MIN: i32 = 0;
/// Highest slider position
pub const SLIDER_MAX: i32 = 100;
/// Highest valid curve index
pub const CURVE_INDEX_MAX: i32 = 4;
/// Field value meaning "not applicable"
pub const UNSET: i32 = -1;

/// UI-space settings: splice, crisp and offset sliders (0-100) plus a curve index (0-4).
///
/// The crisp and offset sliders are inverted: a crisp slider at 100 means no
/// ducking, an offset slider at 0 means a full-length overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SliderValues {
    pub splice: i32,
    pub crisp: i32,
    pub offset: i32,
    pub curve: i32,
}

impl Default for SliderValues {
    fn default() -> Self {
        Self {
            splice: 47,
            crisp: 100,
            offset: 0,
            curve: 4,
        }
    }
}

impl SliderValues {
    /// Sentinel tuple carried by the "Custom" preset
    pub const UNSET: Self = Self::new(UNSET, UNSET, UNSET, UNSET);

    pub const fn new(splice: i32, crisp: i32, offset: i32, curve: i32) -> Self {
        Self {
            splice,
            crisp,
            offset,
            curve,
        }
    }

    /// Clamp sliders to 0-100 and the curve index to 0-4
    pub fn clamped(self) -> Self {
        let clamped = Self {
            splice: self.splice.clamp(SLIDER_MIN, SLIDER_MAX),
            crisp: self.crisp.clamp(SLIDER_MIN, SLIDER_MAX),
            offset: self.offset.clamp(SLIDER_MIN, SLIDER_MAX),
            curve: self.curve.clamp(0, CURVE_INDEX_MAX),
        };
        if clamped != self {
            log::debug!("Clamped slider values {:?} -> {:?}", self, clamped);
        }
        clamped
    }

    /// Splice position as 0..=1
    pub fn splice_percent(&self) -> f64 {
        self.splice.clamp(SLIDER_MIN, SLIDER_MAX) as f64 / 100.0
    }

    /// Crispness as 0..=1 (inverted slider)
    pub fn crisp_percent(&self) -> f64 {
        (SLIDER_MAX - self.crisp.clamp(SLIDER_MIN, SLIDER_MAX)) as f64 / 100.0
    }

    /// Overlap fraction as 0..=1 (inverted slider)
    pub fn overlap_fraction(&self) -> f64 {
        (SLIDER_MAX - self.offset.clamp(SLIDER_MIN, SLIDER_MAX)) as f64 / 100.0
    }

    pub fn fade_curve(&self) -> FadeCurve {
        FadeCurve::from_index(self.curve)
    }

    /// Physical parameters for the splice transform
    pub fn to_splice_params(&self) -> SpliceParams {
        SpliceParams::from_percentages(
            self.splice_percent(),
            self.crisp_percent(),
            self.overlap_fraction(),
            self.fade_curve(),
        )
    }

    /// Label under the splice slider, e.g. "47%"
    pub fn splice_label(&self) -> String {
        format!("{}%", self.splice)
    }

    /// Label under the crisp slider, e.g. "-3.0 dB"
    pub fn duck_label(&self) -> String {
        Decibels(duck_db(self.crisp_percent())).to_string()
    }

    /// Label under the offset slider, e.g. "100%"
    pub fn offset_label(&self) -> String {
        format!("{}%", SLIDER_MAX - self.offset)
    }
}

/// Physical-unit parameters for one splice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpliceParams {
    /// Cut position measured from the segment start (seconds)
    pub splice_time: f64,
    /// Gain applied to the trailing piece
    pub duck: Decibels,
    /// Fraction of `splice_time` used as the crossfade overlap (0..=1)
    pub overlap_fraction: f64,
    /// Curve for both crossfade edges
    pub fade_curve: FadeCurve,
}

impl SpliceParams {
    pub fn new(splice_time: f64, duck_db: f64, overlap_fraction: f64, fade_curve: FadeCurve) -> Self {
        Self {
            splice_time,
            duck: Decibels(duck_db),
            overlap_fraction,
            fade_curve,
        }
    }

    /// Build from normalized percentages (each 0..=1)
    pub fn from_percentages(
        splice_percent: f64,
        crisp_percent: f64,
        overlap_fraction: f64,
        fade_curve: FadeCurve,
    ) -> Self {
        Self::new(
            splice_time(splice_percent),
            duck_db(crisp_percent),
            overlap_fraction,
            fade_curve,
        )
    }

    /// Split offset from the segment start
    #[inline]
    pub fn splice_offset(&self) -> Timecode {
        Timecode::from_seconds(self.splice_time)
    }

    /// Crossfade overlap between the two pieces
    #[inline]
    pub fn overlap_duration(&self) -> Timecode {
        Timecode::from_seconds(self.splice_time * self.overlap_fraction)
    }

    /// Linear gain for the trailing piece
    #[inline]
    pub fn linear_gain(&self) -> f64 {
        linear_gain(self.duck.0)
    }

    /// Overlap as an integer percentage, for reporting
    pub fn offset_percent(&self) -> i32 {
        (self.overlap_fraction * 100.0).round() as i32
    }
}

impl Default for SpliceParams {
    fn default() -> Self {
        SliderValues::default().to_splice_params()
    }
}
