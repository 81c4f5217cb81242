//! Batch applier
//!
//! Runs the splice transform over many segments inside one transaction so the
//! whole batch undoes as a single step. A segment that fails is counted and
//! the batch carries on with the rest.

use std::fmt;

use cc_core::{CcError, CcResult, SpliceParams};

use crate::splice::{SpliceOutcome, apply_splice};
use crate::timeline::{SegmentId, TimelinePort, Transaction};

/// Transaction label, shown by the host's undo history
pub const UNDO_LABEL: &str = "Chorus Crisp";

/// Aggregate result of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Segments that were split and crossfaded
    pub succeeded: usize,
    /// Segments left untouched (too short or split refused)
    pub skipped: usize,
    /// Segments where the host returned an error
    pub failed: usize,
    /// Message of the last failure
    pub last_error: Option<String>,
    pub params: SpliceParams,
}

impl BatchReport {
    fn new(params: SpliceParams) -> Self {
        Self {
            succeeded: 0,
            skipped: 0,
            failed: 0,
            last_error: None,
            params,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Processed {} clip(s)!\n\nSplice at: {:.3}s\nVolume duck: {:.1} dB\nOffset: {}%\nFade type: {}",
            self.succeeded,
            self.params.splice_time,
            self.params.duck.0,
            self.params.offset_percent(),
            self.params.fade_curve.name(),
        );

        if self.skipped > 0 {
            text.push_str(&format!(
                "\n\n{} clip(s) skipped (too short or could not be split)",
                self.skipped
            ));
        }

        if self.failed > 0 {
            text.push_str(&format!(
                "\n\n{} clip(s) had errors:\n{}",
                self.failed,
                self.last_error.as_deref().unwrap_or_default()
            ));
        }

        text
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Splice every segment in `segments`, in order, as one undoable action
pub fn apply_all<P>(port: &mut P, segments: &[SegmentId], params: &SpliceParams) -> BatchReport
where
    P: TimelinePort + ?Sized,
{
    let mut report = BatchReport::new(*params);
    let mut tx = Transaction::begin(port, UNDO_LABEL);

    for &id in segments {
        match apply_splice(&mut *tx, id, params) {
            Ok(SpliceOutcome::Spliced { .. }) => report.succeeded += 1,
            Ok(outcome) => {
                log::debug!("Segment {} skipped: {:?}", id, outcome);
                report.skipped += 1;
            }
            Err(e) => {
                log::warn!("Segment {} failed: {}", id, e);
                report.failed += 1;
                report.last_error = Some(e.to_string());
            }
        }
    }

    drop(tx);

    log::info!(
        "{}: {} spliced, {} skipped, {} failed",
        UNDO_LABEL,
        report.succeeded,
        report.skipped,
        report.failed
    );
    report
}

/// Splice the host's current audio selection
pub fn apply_to_selection<P>(port: &mut P, params: &SpliceParams) -> CcResult<BatchReport>
where
    P: TimelinePort + ?Sized,
{
    let selection = port.selected_audio_segments();
    if selection.is_empty() {
        return Err(CcError::NothingSelected);
    }
    Ok(apply_all(port, &selection, params))
}
