//! Track Manager - in-memory timeline
//!
//! Provides:
//! - Tracks and placed segments (audio or video) with fades, gain and takes
//! - Split primitive and selection query
//! - Undo/Redo: every edit is a command, a transaction is one undo step
//! - JSON project load/save
//!
//! Implements [`TimelinePort`], so the splice transform runs against it the
//! same way it runs against a real host.

use std::collections::BTreeMap;
use std::path::Path;

use cc_core::{CcError, CcResult, Fade, Timecode};
use cc_state::{Command, UndoManager};
use serde::{Deserialize, Serialize};

use crate::timeline::{SegmentId, TimelinePort};

// ═══════════════════════════════════════════════════════════════════════════
// TRACKS & SEGMENTS
// ═══════════════════════════════════════════════════════════════════════════

/// Unique track identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

/// Timeline track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
}

/// Kind of media a segment places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SegmentKind {
    #[default]
    Audio,
    Video,
}

/// Source reference of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Take {
    pub name: String,
    pub source_file: String,
    /// Position in the source media that plays at the segment start
    pub offset: Timecode,
}

impl Take {
    pub fn new(name: &str, source_file: &str, offset: Timecode) -> Self {
        Self {
            name: name.to_string(),
            source_file: source_file.to_string(),
            offset,
        }
    }
}

/// Segment placed on a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub track_id: TrackId,
    pub name: String,
    #[serde(default)]
    pub kind: SegmentKind,

    // Timeline placement
    pub start: Timecode,
    pub length: Timecode,

    #[serde(default)]
    pub fade_in: Fade,
    #[serde(default)]
    pub fade_out: Fade,

    /// Linear playback gain (audio only)
    #[serde(default = "unity_gain")]
    pub gain: f64,
    #[serde(default)]
    pub takes: Vec<Take>,

    #[serde(default)]
    pub selected: bool,
    /// Locked segments reject edits
    #[serde(default)]
    pub locked: bool,
}

fn unity_gain() -> f64 {
    1.0
}

impl Segment {
    /// Audio segment with a single take starting at the top of `source_file`.
    /// The id is assigned by [`TrackManager::add_segment`].
    pub fn audio(track_id: TrackId, name: &str, source_file: &str, start: Timecode, length: Timecode) -> Self {
        Self {
            id: SegmentId(0),
            track_id,
            name: name.to_string(),
            kind: SegmentKind::Audio,
            start,
            length,
            fade_in: Fade::default(),
            fade_out: Fade::default(),
            gain: 1.0,
            takes: vec![Take::new(name, source_file, Timecode::ZERO)],
            selected: false,
            locked: false,
        }
    }

    pub fn video(track_id: TrackId, name: &str, start: Timecode, length: Timecode) -> Self {
        Self {
            kind: SegmentKind::Video,
            takes: Vec::new(),
            ..Self::audio(track_id, name, "", start, length)
        }
    }

    /// End time on timeline
    #[inline]
    pub fn end(&self) -> Timecode {
        self.start + self.length
    }

    #[inline]
    pub fn is_audio(&self) -> bool {
        self.kind == SegmentKind::Audio
    }

    /// Both fades fit inside the segment
    pub fn fades_fit(&self) -> bool {
        self.fade_in.length + self.fade_out.length <= self.length
    }
}

type SegmentMap = BTreeMap<SegmentId, Segment>;

// ═══════════════════════════════════════════════════════════════════════════
// EDIT COMMAND
// ═══════════════════════════════════════════════════════════════════════════

/// Replaces (or creates) one segment; undo puts the previous state back
struct SegmentEdit {
    name: &'static str,
    id: SegmentId,
    before: Option<Segment>,
    after: Option<Segment>,
}

impl SegmentEdit {
    fn place(map: &mut SegmentMap, id: SegmentId, state: &Option<Segment>) {
        match state {
            Some(segment) => {
                map.insert(id, segment.clone());
            }
            None => {
                map.remove(&id);
            }
        }
    }
}

impl Command<SegmentMap> for SegmentEdit {
    fn execute(&mut self, target: &mut SegmentMap) {
        Self::place(target, self.id, &self.after);
    }

    fn undo(&mut self, target: &mut SegmentMap) {
        Self::place(target, self.id, &self.before);
    }

    fn name(&self) -> &str {
        self.name
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TRACK MANAGER
// ═══════════════════════════════════════════════════════════════════════════

/// On-disk project layout
#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    tracks: Vec<Track>,
    segments: Vec<Segment>,
}

/// Tracks, segments and edit history
#[derive(Debug, Default)]
pub struct TrackManager {
    /// Tracks in display order
    tracks: Vec<Track>,
    segments: SegmentMap,
    next_id: u64,
    history: UndoManager<SegmentMap>,
}

impl TrackManager {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Create a new track at the end of the track list
    pub fn create_track(&mut self, name: &str) -> TrackId {
        let id = TrackId(self.next_id());
        self.tracks.push(Track {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Place a segment (not undoable). Assigns and returns its id.
    pub fn add_segment(&mut self, mut segment: Segment) -> CcResult<SegmentId> {
        if !self.tracks.iter().any(|t| t.id == segment.track_id) {
            return Err(CcError::InvalidParam(format!("unknown track {}", segment.track_id.0)));
        }
        if !segment.length.is_positive() {
            return Err(CcError::InvalidParam(format!(
                "segment '{}' must have a positive length",
                segment.name
            )));
        }

        let id = SegmentId(self.next_id());
        segment.id = id;
        self.segments.insert(id, segment);
        Ok(id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments on a track ordered by start
    pub fn segments_on_track(&self, track_id: TrackId) -> Vec<&Segment> {
        let mut segments: Vec<&Segment> = self
            .segments
            .values()
            .filter(|s| s.track_id == track_id)
            .collect();
        segments.sort_by_key(|s| (s.start, s.id));
        segments
    }

    /// Every audio segment, in track order then by start
    pub fn audio_segments(&self) -> Vec<SegmentId> {
        self.tracks
            .iter()
            .flat_map(|track| self.segments_on_track(track.id))
            .filter(|s| s.is_audio())
            .map(|s| s.id)
            .collect()
    }

    /// Set segment selection state (not undoable)
    pub fn select_segment(&mut self, id: SegmentId, selected: bool) {
        if let Some(segment) = self.segments.get_mut(&id) {
            segment.selected = selected;
        }
    }

    /// Clear all segment selections
    pub fn clear_selection(&mut self) {
        for segment in self.segments.values_mut() {
            segment.selected = false;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // UNDO / REDO
    // ═══════════════════════════════════════════════════════════════════════

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.segments)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.segments)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn undo_name(&self) -> Option<&str> {
        self.history.undo_name()
    }

    fn segment_ref(&self, id: SegmentId) -> CcResult<&Segment> {
        self.segments.get(&id).ok_or(CcError::UnknownSegment(id.0))
    }

    fn audio_ref(&self, id: SegmentId) -> CcResult<&Segment> {
        let segment = self.segment_ref(id)?;
        if segment.is_audio() {
            Ok(segment)
        } else {
            Err(CcError::NotAudio(id.0))
        }
    }

    /// Apply `f` to a copy of the segment and record the change
    fn edit<F>(&mut self, id: SegmentId, name: &'static str, f: F) -> CcResult<()>
    where
        F: FnOnce(&mut Segment) -> CcResult<()>,
    {
        let before = self.segment_ref(id)?.clone();
        if before.locked {
            return Err(CcError::Host(format!("segment {} is locked", id)));
        }

        let mut after = before.clone();
        f(&mut after)?;

        self.history.execute(
            Box::new(SegmentEdit {
                name,
                id,
                before: Some(before),
                after: Some(after),
            }),
            &mut self.segments,
        );
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // PROJECT FILE
    // ═══════════════════════════════════════════════════════════════════════

    pub fn from_json(json: &str) -> CcResult<Self> {
        let project: ProjectFile =
            serde_json::from_str(json).map_err(|e| CcError::Serialization(e.to_string()))?;

        let max_id = project
            .tracks
            .iter()
            .map(|t| t.id.0)
            .chain(project.segments.iter().map(|s| s.id.0))
            .max()
            .unwrap_or(0);

        Ok(Self {
            tracks: project.tracks,
            segments: project.segments.into_iter().map(|s| (s.id, s)).collect(),
            next_id: max_id + 1,
            history: UndoManager::default(),
        })
    }

    pub fn to_json(&self) -> CcResult<String> {
        let project = ProjectFile {
            tracks: self.tracks.clone(),
            segments: self.segments.values().cloned().collect(),
        };
        serde_json::to_string_pretty(&project).map_err(|e| CcError::Serialization(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> CcResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> CcResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl TimelinePort for TrackManager {
    fn start(&self, id: SegmentId) -> CcResult<Timecode> {
        Ok(self.segment_ref(id)?.start)
    }

    fn set_start(&mut self, id: SegmentId, start: Timecode) -> CcResult<()> {
        self.edit(id, "Move Segment", |s| {
            s.start = start;
            Ok(())
        })
    }

    fn length(&self, id: SegmentId) -> CcResult<Timecode> {
        Ok(self.segment_ref(id)?.length)
    }

    fn set_length(&mut self, id: SegmentId, length: Timecode) -> CcResult<()> {
        if !length.is_positive() {
            return Err(CcError::InvalidParam(format!("segment length must be positive, got {}", length)));
        }
        self.edit(id, "Resize Segment", |s| {
            s.length = length;
            Ok(())
        })
    }

    fn fade_in(&self, id: SegmentId) -> CcResult<Fade> {
        Ok(self.segment_ref(id)?.fade_in)
    }

    fn set_fade_in(&mut self, id: SegmentId, fade: Fade) -> CcResult<()> {
        self.edit(id, "Fade In", |s| {
            s.fade_in = fade;
            Ok(())
        })
    }

    fn fade_out(&self, id: SegmentId) -> CcResult<Fade> {
        Ok(self.segment_ref(id)?.fade_out)
    }

    fn set_fade_out(&mut self, id: SegmentId, fade: Fade) -> CcResult<()> {
        self.edit(id, "Fade Out", |s| {
            s.fade_out = fade;
            Ok(())
        })
    }

    fn is_audio(&self, id: SegmentId) -> CcResult<bool> {
        Ok(self.segment_ref(id)?.is_audio())
    }

    fn gain(&self, id: SegmentId) -> CcResult<f64> {
        Ok(self.audio_ref(id)?.gain)
    }

    fn set_gain(&mut self, id: SegmentId, gain: f64) -> CcResult<()> {
        self.audio_ref(id)?;
        self.edit(id, "Segment Gain", |s| {
            s.gain = gain;
            Ok(())
        })
    }

    fn take_count(&self, id: SegmentId) -> CcResult<usize> {
        Ok(self.audio_ref(id)?.takes.len())
    }

    fn take_offset(&self, id: SegmentId, take: usize) -> CcResult<Timecode> {
        self.audio_ref(id)?
            .takes
            .get(take)
            .map(|t| t.offset)
            .ok_or(CcError::UnknownTake { segment: id.0, take })
    }

    fn set_take_offset(&mut self, id: SegmentId, take: usize, offset: Timecode) -> CcResult<()> {
        self.audio_ref(id)?;
        self.edit(id, "Take Offset", |s| {
            let t = s
                .takes
                .get_mut(take)
                .ok_or(CcError::UnknownTake { segment: id.0, take })?;
            t.offset = offset;
            Ok(())
        })
    }

    fn split(&mut self, id: SegmentId, offset: Timecode) -> CcResult<Option<SegmentId>> {
        let original = self.segment_ref(id)?.clone();

        // Validate split point is strictly inside the segment
        if original.locked || !offset.is_positive() || offset >= original.length {
            log::debug!("Split of {} at {} rejected", id, offset);
            return Ok(None);
        }

        // Left piece: the original, shortened
        self.edit(id, "Split Segment", |s| {
            s.length = offset;
            s.fade_in.length = s.fade_in.length.min(offset);
            s.fade_out = Fade::default();
            Ok(())
        })?;

        // Right piece: new segment holding the tail
        let right_id = SegmentId(self.next_id());
        let right_length = original.length - offset;
        let mut right = original;
        right.id = right_id;
        right.start += offset;
        right.length = right_length;
        right.fade_in = Fade::default();
        right.fade_out.length = right.fade_out.length.min(right_length);
        for take in &mut right.takes {
            take.offset += offset;
        }

        self.history.execute(
            Box::new(SegmentEdit {
                name: "Split Segment",
                id: right_id,
                before: None,
                after: Some(right),
            }),
            &mut self.segments,
        );

        Ok(Some(right_id))
    }

    fn selected_audio_segments(&self) -> Vec<SegmentId> {
        self.audio_segments()
            .into_iter()
            .filter(|id| self.segments.get(id).is_some_and(|s| s.selected))
            .collect()
    }

    fn begin_transaction(&mut self, label: &str) {
        log::debug!("Begin transaction '{}'", label);
        self.history.begin_group();
    }

    fn commit_transaction(&mut self, label: &str) {
        log::debug!("Commit transaction '{}'", label);
        self.history.end_group(label);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::FadeCurve;

    fn ms(v: f64) -> Timecode {
        Timecode::from_millis(v)
    }

    fn manager_with_segment(length_ms: f64) -> (TrackManager, SegmentId) {
        let mut manager = TrackManager::new();
        let track = manager.create_track("Vocals");
        let id = manager
            .add_segment(Segment::audio(track, "Chop", "chop.wav", ms(1000.0), ms(length_ms)))
            .unwrap();
        (manager, id)
    }

    #[test]
    fn test_split() {
        let (mut manager, id) = manager_with_segment(1000.0);
        manager
            .set_fade_out(id, Fade::new(ms(50.0), FadeCurve::Slow))
            .unwrap();

        let right = manager.split(id, ms(400.0)).unwrap().unwrap();

        let left = manager.segment(id).unwrap();
        assert_eq!(left.start, ms(1000.0));
        assert_eq!(left.length, ms(400.0));
        assert_eq!(left.fade_out, Fade::default());

        let right = manager.segment(right).unwrap();
        assert_eq!(right.start, ms(1400.0));
        assert_eq!(right.length, ms(600.0));
        assert_eq!(right.takes[0].offset, ms(400.0));
        assert_eq!(right.fade_out.length, ms(50.0));
        assert_eq!(right.track_id, left.track_id);
    }

    #[test]
    fn test_split_rejected_outside_segment() {
        let (mut manager, id) = manager_with_segment(100.0);
        assert_eq!(manager.split(id, ms(0.0)).unwrap(), None);
        assert_eq!(manager.split(id, ms(100.0)).unwrap(), None);
        assert_eq!(manager.split(id, ms(250.0)).unwrap(), None);
        assert_eq!(manager.segment_count(), 1);
    }

    #[test]
    fn test_locked_segment() {
        let (mut manager, id) = manager_with_segment(100.0);
        manager.segments.get_mut(&id).unwrap().locked = true;

        assert_eq!(manager.split(id, ms(50.0)).unwrap(), None);
        assert!(matches!(manager.set_gain(id, 0.5), Err(CcError::Host(_))));
    }

    #[test]
    fn test_video_segment_has_no_gain() {
        let mut manager = TrackManager::new();
        let track = manager.create_track("Video");
        let id = manager
            .add_segment(Segment::video(track, "Clip", ms(0.0), ms(500.0)))
            .unwrap();

        assert!(!manager.is_audio(id).unwrap());
        assert!(matches!(manager.gain(id), Err(CcError::NotAudio(_))));
        assert!(matches!(manager.take_count(id), Err(CcError::NotAudio(_))));
    }

    #[test]
    fn test_unknown_segment() {
        let manager = TrackManager::new();
        assert!(matches!(manager.start(SegmentId(99)), Err(CcError::UnknownSegment(99))));
    }

    #[test]
    fn test_transaction_is_one_undo_step() {
        let (mut manager, id) = manager_with_segment(1000.0);
        let original = manager.segment(id).unwrap().clone();

        manager.begin_transaction("Edit");
        let right = manager.split(id, ms(100.0)).unwrap().unwrap();
        manager.set_gain(right, 0.5).unwrap();
        manager.set_fade_out(id, Fade::new(ms(10.0), FadeCurve::Fast)).unwrap();
        manager.commit_transaction("Edit");

        assert_eq!(manager.undo_name(), Some("Edit"));
        assert!(manager.undo());
        assert!(!manager.can_undo());
        assert_eq!(manager.segment_count(), 1);
        assert_eq!(manager.segment(id), Some(&original));

        assert!(manager.redo());
        assert_eq!(manager.segment_count(), 2);
        assert_eq!(manager.segment(right).unwrap().gain, 0.5);
    }

    #[test]
    fn test_selection_order() {
        let mut manager = TrackManager::new();
        let t1 = manager.create_track("One");
        let t2 = manager.create_track("Two");

        let late = manager.add_segment(Segment::audio(t1, "b", "b.wav", ms(500.0), ms(100.0))).unwrap();
        let early = manager.add_segment(Segment::audio(t1, "a", "a.wav", ms(0.0), ms(100.0))).unwrap();
        let other = manager.add_segment(Segment::audio(t2, "c", "c.wav", ms(0.0), ms(100.0))).unwrap();
        let video = manager.add_segment(Segment::video(t2, "v", ms(0.0), ms(100.0))).unwrap();
        let unselected = manager.add_segment(Segment::audio(t2, "d", "d.wav", ms(900.0), ms(100.0))).unwrap();

        for id in [late, early, other, video] {
            manager.select_segment(id, true);
        }

        assert_eq!(manager.selected_audio_segments(), vec![early, late, other]);
        assert!(!manager.selected_audio_segments().contains(&unselected));
    }

    #[test]
    fn test_json_round_trip() {
        let (mut manager, id) = manager_with_segment(250.0);
        manager.select_segment(id, true);

        let json = manager.to_json().unwrap();
        let mut loaded = TrackManager::from_json(&json).unwrap();

        assert_eq!(loaded.segment(id), manager.segment(id));
        assert_eq!(loaded.selected_audio_segments(), vec![id]);

        // new ids continue after the loaded ones
        let right = loaded.split(id, ms(100.0)).unwrap().unwrap();
        assert!(right.0 > id.0);
    }

    #[test]
    fn test_add_segment_validation() {
        let mut manager = TrackManager::new();
        let track = manager.create_track("T");
        assert!(manager.add_segment(Segment::audio(TrackId(77), "x", "x.wav", ms(0.0), ms(10.0))).is_err());
        assert!(manager.add_segment(Segment::audio(track, "x", "x.wav", ms(0.0), ms(0.0))).is_err());
    }
}
