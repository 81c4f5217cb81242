//! Splice transform
//!
//! Cuts one segment at `splice_time` from its start and turns the cut into a
//! crossfade: the trailing piece is pulled back over the leading piece by the
//! overlap, ducked, and both sides of the overlap get matching fades.

use cc_core::{CcResult, Fade, SpliceParams, Timecode};

use crate::timeline::{SegmentId, TimelinePort};

/// Trailing material a segment must keep past the cut before it is spliced
pub const MIN_TRAILING_MS: f64 = 10.0;

/// What the transform did to one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// Split and crossfaded; `trailing` is the new segment
    Spliced {
        leading: SegmentId,
        trailing: SegmentId,
    },
    /// Segment shorter than the cut plus the trailing margin, left untouched
    TooShort,
    /// The host refused the split, segment left untouched
    SplitRejected,
}

impl SpliceOutcome {
    pub fn is_spliced(&self) -> bool {
        matches!(self, SpliceOutcome::Spliced { .. })
    }
}

/// Shortest segment that will be spliced with `params`
pub fn min_splice_length(params: &SpliceParams) -> Timecode {
    params.splice_offset() + Timecode::from_millis(MIN_TRAILING_MS)
}

/// Splice one segment.
///
/// Too-short segments and rejected splits are reported as outcomes, not
/// errors. An `Err` means the host failed part way through.
pub fn apply_splice<P>(port: &mut P, id: SegmentId, params: &SpliceParams) -> CcResult<SpliceOutcome>
where
    P: TimelinePort + ?Sized,
{
    let length = port.length(id)?;
    if length < min_splice_length(params) {
        log::debug!(
            "Segment {} too short ({} < {}), skipped",
            id,
            length,
            min_splice_length(params)
        );
        return Ok(SpliceOutcome::TooShort);
    }

    let Some(trailing) = port.split(id, params.splice_offset())? else {
        log::debug!("Segment {} could not be split", id);
        return Ok(SpliceOutcome::SplitRejected);
    };

    let overlap = params.overlap_duration();

    if port.is_audio(trailing)? {
        // Start earlier, read the source earlier, end in the same place
        let start = port.start(trailing)?;
        port.set_start(trailing, start - overlap)?;

        for take in 0..port.take_count(trailing)? {
            let offset = port.take_offset(trailing, take)?;
            port.set_take_offset(trailing, take, offset - overlap)?;
        }

        let trailing_length = port.length(trailing)?;
        port.set_length(trailing, trailing_length + overlap)?;

        port.set_gain(trailing, params.linear_gain())?;
    }

    let crossfade = Fade::new(overlap, params.fade_curve);

    // Fades on each piece must not overlap each other
    let leading_length = port.length(id)?;
    let leading_in = port.fade_in(id)?;
    if leading_in.length + overlap > leading_length {
        port.set_fade_in(id, Fade::new(leading_length - overlap, leading_in.curve))?;
    }
    let trailing_length = port.length(trailing)?;
    let trailing_out = port.fade_out(trailing)?;
    if trailing_out.length + overlap > trailing_length {
        port.set_fade_out(trailing, Fade::new(trailing_length - overlap, trailing_out.curve))?;
    }

    port.set_fade_in(trailing, crossfade)?;
    port.set_fade_out(id, crossfade)?;

    log::debug!(
        "Spliced {} at {}: trailing {} overlap {} gain {}",
        id,
        params.splice_offset(),
        trailing,
        overlap,
        params.duck
    );

    Ok(SpliceOutcome::Spliced {
        leading: id,
        trailing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_manager::{Segment, TrackManager};
    use approx::assert_abs_diff_eq;
    use cc_core::FadeCurve;

    fn ms(v: f64) -> Timecode {
        Timecode::from_millis(v)
    }

    fn setup(length_ms: f64) -> (TrackManager, SegmentId) {
        let mut manager = TrackManager::new();
        let track = manager.create_track("Vocals");
        let id = manager
            .add_segment(Segment::audio(track, "Chop", "chop.wav", ms(2000.0), ms(length_ms)))
            .unwrap();
        (manager, id)
    }

    #[test]
    fn test_splice_moves_trailing_back() {
        let (mut manager, id) = setup(500.0);
        let params = SpliceParams::new(0.040, -6.0, 0.5, FadeCurve::Smooth);

        let outcome = apply_splice(&mut manager, id, &params).unwrap();
        let SpliceOutcome::Spliced { leading, trailing } = outcome else {
            panic!("expected a splice, got {:?}", outcome);
        };
        assert_eq!(leading, id);

        let lead = manager.segment(leading).unwrap();
        assert_eq!(lead.length, ms(40.0));
        assert_eq!(lead.fade_out, Fade::new(ms(20.0), FadeCurve::Smooth));
        assert_eq!(lead.gain, 1.0);

        let trail = manager.segment(trailing).unwrap();
        assert_eq!(trail.start, ms(2020.0));
        assert_eq!(trail.length, ms(480.0));
        assert_eq!(trail.end(), ms(2500.0));
        assert_eq!(trail.takes[0].offset, ms(20.0));
        assert_eq!(trail.fade_in, Fade::new(ms(20.0), FadeCurve::Smooth));
        assert_abs_diff_eq!(trail.gain, 10f64.powf(-6.0 / 20.0), epsilon = 1e-12);
    }

    #[test]
    fn test_too_short_is_untouched() {
        let (mut manager, id) = setup(40.0);
        let before = manager.segment(id).unwrap().clone();
        let params = SpliceParams::new(0.060, -15.0, 1.0, FadeCurve::Linear);

        assert_eq!(apply_splice(&mut manager, id, &params).unwrap(), SpliceOutcome::TooShort);
        assert_eq!(manager.segment(id), Some(&before));
        assert!(!manager.can_undo());
    }

    #[test]
    fn test_rejected_split() {
        let (mut manager, id) = setup(500.0);
        // a zero cut is refused by the host
        let params = SpliceParams::new(0.0, 0.0, 1.0, FadeCurve::Linear);

        assert_eq!(
            apply_splice(&mut manager, id, &params).unwrap(),
            SpliceOutcome::SplitRejected
        );
        assert_eq!(manager.segment_count(), 1);
    }

    #[test]
    fn test_zero_overlap() {
        let (mut manager, id) = setup(500.0);
        let params = SpliceParams::new(0.030, -3.0, 0.0, FadeCurve::Fast);

        let SpliceOutcome::Spliced { trailing, .. } = apply_splice(&mut manager, id, &params).unwrap() else {
            panic!("expected a splice");
        };
        let trail = manager.segment(trailing).unwrap();
        assert_eq!(trail.start, ms(2030.0));
        assert_eq!(trail.fade_in.length, Timecode::ZERO);
        assert_eq!(trail.fade_in.curve, FadeCurve::Fast);
    }

    #[test]
    fn test_leading_fade_in_shrinks() {
        let (mut manager, id) = setup(500.0);
        manager.set_fade_in(id, Fade::new(ms(100.0), FadeCurve::Slow)).unwrap();
        let params = SpliceParams::new(0.040, -6.0, 0.25, FadeCurve::Linear);

        apply_splice(&mut manager, id, &params).unwrap();

        let lead = manager.segment(id).unwrap();
        assert_eq!(lead.fade_in, Fade::new(ms(30.0), FadeCurve::Slow));
        assert_eq!(lead.fade_out.length, ms(10.0));
        assert!(lead.fades_fit());
    }

    #[test]
    fn test_video_segment_only_gets_fades() {
        let mut manager = TrackManager::new();
        let track = manager.create_track("Video");
        let id = manager
            .add_segment(Segment::video(track, "Shot", ms(0.0), ms(1000.0)))
            .unwrap();
        let params = SpliceParams::new(0.050, -15.0, 1.0, FadeCurve::Sharp);

        let SpliceOutcome::Spliced { trailing, .. } = apply_splice(&mut manager, id, &params).unwrap() else {
            panic!("expected a splice");
        };
        let trail = manager.segment(trailing).unwrap();
        assert_eq!(trail.start, ms(50.0));
        assert_eq!(trail.length, ms(950.0));
        assert_eq!(trail.gain, 1.0);
        assert_eq!(trail.fade_in, Fade::new(ms(50.0), FadeCurve::Sharp));
        assert_eq!(manager.segment(id).unwrap().fade_out.length, ms(50.0));
    }

    #[test]
    fn test_min_splice_length() {
        let params = SpliceParams::new(0.0388, -15.0, 1.0, FadeCurve::Smooth);
        assert_eq!(min_splice_length(&params), ms(48.8));
    }
}
