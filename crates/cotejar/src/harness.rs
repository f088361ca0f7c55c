//! One-call orchestration: capture, compare, persist, record
//!
//! [`VisualHarness`] wires the three collaborators together the way a test
//! suite uses them: grab the surface, stash the raw capture, compare against
//! the baseline, stash the diff artifact when pixels moved, and keep a
//! running [`CheckReport`] for whatever renders results at the end.

use tracing::debug;

use crate::capture::SurfaceCapture;
use crate::comparator::{validate_check_name, Comparator, Comparison};
use crate::report::CheckReport;
use crate::result::CotejoResult;
use crate::store::{self, ArtifactStore};

/// Drives visual checks end to end
///
/// Every [`run_check`](Self::run_check) leaves the latest capture in the
/// check's actual slot, the diff artifact (if any) in its diff slot, and one
/// record in the report.
#[derive(Debug)]
pub struct VisualHarness<C: SurfaceCapture, S: ArtifactStore> {
    capture: C,
    comparator: Comparator<S>,
    report: CheckReport,
}

impl<C: SurfaceCapture, S: ArtifactStore> VisualHarness<C, S> {
    /// Harness over a capture collaborator and a comparator
    pub fn new(capture: C, comparator: Comparator<S>) -> Self {
        Self {
            capture,
            comparator,
            report: CheckReport::default(),
        }
    }

    /// Harness with a named report
    pub fn with_report_name(
        capture: C,
        comparator: Comparator<S>,
        report_name: impl Into<String>,
    ) -> Self {
        Self {
            capture,
            comparator,
            report: CheckReport::new(report_name),
        }
    }

    /// Capture the current surface and compare it against the baseline
    ///
    /// # Errors
    ///
    /// Propagates capture failures, storage failures, and invalid-image
    /// errors; a failed comparison is a normal return, not an error.
    pub fn run_check(&mut self, check_name: &str) -> CotejoResult<Comparison> {
        validate_check_name(check_name)?;

        let actual = self.capture.capture_surface()?;
        let actual_png = actual.to_png()?;
        self.comparator
            .store()
            .write(&store::actual_key(check_name), &actual_png)?;
        debug!(
            "Stored {} byte capture for '{check_name}'",
            actual_png.len()
        );

        let comparison = self.comparator.compare(check_name, &actual)?;
        self.report.record(&comparison);

        if let Some(artifact) = &comparison.diff_artifact {
            let diff_png = artifact.to_png()?;
            self.comparator
                .store()
                .write(&store::diff_key(check_name), &diff_png)?;
            self.report.attach_diff(check_name, &diff_png);
        }

        Ok(comparison)
    }

    /// Capture a fresh frame and unconditionally store it as the baseline
    ///
    /// # Errors
    ///
    /// Propagates capture and storage failures.
    pub fn update_baseline(&mut self, check_name: &str) -> CotejoResult<()> {
        validate_check_name(check_name)?;

        let actual = self.capture.capture_surface()?;
        self.comparator.update_baseline(check_name, &actual)
    }

    /// Outcomes recorded so far
    #[must_use]
    pub fn report(&self) -> &CheckReport {
        &self.report
    }

    /// Consume the harness, yielding its report
    #[must_use]
    pub fn into_report(self) -> CheckReport {
        self.report
    }

    /// The underlying comparator
    #[must_use]
    pub fn comparator(&self) -> &Comparator<S> {
        &self.comparator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::capture::MockCapture;
    use crate::report::CheckStatus;
    use crate::result::CotejoError;
    use crate::store::{DirStore, MemoryStore};

    fn harness_with_frames(frames: Vec<Bitmap>) -> VisualHarness<MockCapture, MemoryStore> {
        VisualHarness::new(
            MockCapture::with_frames(frames),
            Comparator::new(MemoryStore::new()),
        )
    }

    #[test]
    fn run_check_bootstraps_and_stores_the_capture() {
        let frame = Bitmap::filled(4, 4, [30, 30, 30]);
        let mut harness = harness_with_frames(vec![frame.clone()]);

        let outcome = harness.run_check("menu").unwrap();

        assert!(outcome.passed);
        let store = harness.comparator().store();
        assert!(store.contains(&store::baseline_key("menu")));
        assert!(store.contains(&store::actual_key("menu")));
        assert!(!store.contains(&store::diff_key("menu")));
        assert_eq!(harness.report().len(), 1);
    }

    #[test]
    fn failing_check_persists_the_diff_and_attaches_it() {
        let baseline = Bitmap::filled(4, 4, [0, 0, 0]);
        let changed = Bitmap::filled(4, 4, [255, 255, 255]);
        let mut harness = harness_with_frames(vec![baseline, changed]);

        harness.run_check("menu").unwrap();
        let outcome = harness.run_check("menu").unwrap();

        assert!(!outcome.passed);
        let store = harness.comparator().store();
        assert!(store.contains(&store::diff_key("menu")));

        let record = &harness.report().records()[1];
        assert_eq!(record.status, CheckStatus::Failed);
        assert!(record.diff_image.is_some());

        // The attached image is the same artifact that landed in the store.
        let stored = store.read(&store::diff_key("menu")).unwrap().unwrap();
        let diff = Bitmap::from_png(&stored).unwrap();
        assert_eq!(Some(diff), outcome.diff_artifact);
    }

    #[test]
    fn actual_slot_tracks_the_latest_capture() {
        let first = Bitmap::filled(2, 2, [1, 1, 1]);
        let second = Bitmap::filled(2, 2, [2, 2, 2]);
        let mut harness = harness_with_frames(vec![first, second.clone()]);

        harness.run_check("hud").unwrap();
        harness.run_check("hud").unwrap();

        let stored = harness
            .comparator()
            .store()
            .read(&store::actual_key("hud"))
            .unwrap()
            .unwrap();
        assert_eq!(Bitmap::from_png(&stored).unwrap(), second);
    }

    #[test]
    fn update_baseline_consumes_one_frame() {
        let old = Bitmap::filled(3, 3, [0, 0, 0]);
        let new = Bitmap::filled(3, 3, [9, 9, 9]);
        let mut harness = harness_with_frames(vec![old.clone(), new.clone(), new.clone()]);

        harness.run_check("logo").unwrap();
        harness.update_baseline("logo").unwrap();

        let outcome = harness.run_check("logo").unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.diff_percentage, 0.0);
    }

    #[test]
    fn capture_failure_propagates_before_any_store_write() {
        let mut harness = harness_with_frames(vec![]);

        let err = harness.run_check("menu").unwrap_err();

        assert!(matches!(err, CotejoError::Capture { .. }));
        assert!(harness.comparator().store().is_empty());
        assert!(harness.report().is_empty());
    }

    #[test]
    fn empty_check_name_is_rejected_before_capturing() {
        let mut harness = harness_with_frames(vec![Bitmap::filled(1, 1, [0, 0, 0])]);

        let err = harness.run_check("").unwrap_err();

        assert!(matches!(err, CotejoError::Storage { .. }));
        assert!(harness.comparator().store().is_empty());
    }

    #[test]
    fn update_baseline_rejects_empty_name_without_capturing() {
        let frame = Bitmap::filled(2, 2, [7, 7, 7]);
        let mut harness = harness_with_frames(vec![frame]);

        let err = harness.update_baseline("").unwrap_err();

        assert!(matches!(err, CotejoError::Storage { .. }));
        assert!(harness.comparator().store().is_empty());
        // The queued frame is still available to the next check.
        assert!(harness.run_check("panel").unwrap().passed);
    }

    #[test]
    fn works_end_to_end_over_a_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path().join("artifacts")).unwrap();

        let baseline = Bitmap::filled(6, 6, [10, 20, 30]);
        let mut changed = baseline.clone();
        changed.set_pixel(0, 0, [200, 0, 0]);
        changed.set_pixel(5, 5, [200, 0, 0]);

        let capture = MockCapture::with_frames(vec![baseline, changed]);
        let mut harness = VisualHarness::with_report_name(capture, Comparator::new(store), "smoke");

        assert!(harness.run_check("panel").unwrap().passed);
        assert!(!harness.run_check("panel").unwrap().passed);

        let root = dir.path().join("artifacts");
        assert!(root.join("panel.baseline.png").is_file());
        assert!(root.join("panel.actual.png").is_file());
        assert!(root.join("panel.diff.png").is_file());

        let report = harness.into_report();
        assert_eq!(report.summary(), "smoke: 1/2 passed (50.0%)");
    }
}
