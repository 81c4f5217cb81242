//! Timeline port
//!
//! The splice transform and the batch applier only see the host timeline
//! through [`TimelinePort`]. [`crate::TrackManager`] is the in-memory
//! implementation; a DAW integration implements the same trait.

use std::fmt;
use std::ops::{Deref, DerefMut};

use cc_core::{CcResult, Fade, Timecode};
use serde::{Deserialize, Serialize};

/// Timeline segment identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SegmentId(pub u64);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host timeline operations used by the splice transform
pub trait TimelinePort {
    fn start(&self, id: SegmentId) -> CcResult<Timecode>;
    fn set_start(&mut self, id: SegmentId, start: Timecode) -> CcResult<()>;

    fn length(&self, id: SegmentId) -> CcResult<Timecode>;
    fn set_length(&mut self, id: SegmentId, length: Timecode) -> CcResult<()>;

    fn fade_in(&self, id: SegmentId) -> CcResult<Fade>;
    fn set_fade_in(&mut self, id: SegmentId, fade: Fade) -> CcResult<()>;

    fn fade_out(&self, id: SegmentId) -> CcResult<Fade>;
    fn set_fade_out(&mut self, id: SegmentId, fade: Fade) -> CcResult<()>;

    fn is_audio(&self, id: SegmentId) -> CcResult<bool>;

    /// Linear playback gain; audio segments only
    fn gain(&self, id: SegmentId) -> CcResult<f64>;
    fn set_gain(&mut self, id: SegmentId, gain: f64) -> CcResult<()>;

    /// Number of takes (source references); audio segments only
    fn take_count(&self, id: SegmentId) -> CcResult<usize>;
    fn take_offset(&self, id: SegmentId, take: usize) -> CcResult<Timecode>;
    fn set_take_offset(&mut self, id: SegmentId, take: usize, offset: Timecode) -> CcResult<()>;

    /// Split `id` at `offset` from its start. The original keeps the head;
    /// the returned segment holds the tail. `Ok(None)` when the host refuses.
    fn split(&mut self, id: SegmentId, offset: Timecode) -> CcResult<Option<SegmentId>>;

    /// Selected audio segments across all tracks, in track order then by start
    fn selected_audio_segments(&self) -> Vec<SegmentId>;

    fn begin_transaction(&mut self, label: &str);
    fn commit_transaction(&mut self, label: &str);
}

/// Transaction scope: opened on creation, committed when dropped.
/// Dereferences to the port so edits go through the guard.
pub struct Transaction<'a, P: TimelinePort + ?Sized> {
    port: &'a mut P,
    label: String,
}

impl<'a, P: TimelinePort + ?Sized> Transaction<'a, P> {
    pub fn begin(port: &'a mut P, label: &str) -> Self {
        port.begin_transaction(label);
        Self {
            port,
            label: label.to_string(),
        }
    }
}

impl<P: TimelinePort + ?Sized> Deref for Transaction<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.port
    }
}

impl<P: TimelinePort + ?Sized> DerefMut for Transaction<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.port
    }
}

impl<P: TimelinePort + ?Sized> Drop for Transaction<'_, P> {
    fn drop(&mut self) {
        self.port.commit_transaction(&self.label);
    }
}
