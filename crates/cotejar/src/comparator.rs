//! Pixel-exact comparison of captures against stored baselines
//!
//! One comparator serves many named checks over a single store. First run of
//! a check trusts the capture and stores it as the baseline; later runs count
//! exactly-unequal pixels and compare the percentage against a threshold.
//! Differences render as pure red markers painted over the baseline.

use tracing::{info, warn};

use crate::bitmap::Bitmap;
use crate::result::{CotejoError, CotejoResult};
use crate::store::{self, ArtifactStore};

/// Maximum percentage of differing pixels that still passes, by default
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 1.0;

/// Sentinel percentage reported when baseline and capture dimensions differ
pub const DIMENSION_MISMATCH_PERCENT: f64 = 100.0;

/// Marker color painted over differing pixels in diff artifacts
pub const DIFF_MARKER_RGB: [u8; 3] = [255, 0, 0];

/// Comparison tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparatorConfig {
    /// Maximum differing-pixel percentage that still passes
    pub threshold_percent: f64,
}

impl ComparatorConfig {
    /// Default configuration: 1% threshold
    #[must_use]
    pub const fn new() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }

    /// Set the passing threshold, in percent of differing pixels
    #[must_use]
    pub const fn with_threshold_percent(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = threshold_percent;
        self
    }
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one comparison
///
/// Ephemeral: the comparator persists nothing on the compare path except the
/// first-run baseline. Callers decide whether artifact bytes reach storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Check this outcome belongs to
    pub check_name: String,
    /// Whether the difference stayed within the threshold
    pub passed: bool,
    /// Percentage of differing pixels; 100.0 when dimensions mismatch
    pub diff_percentage: f64,
    /// Red-marker bitmap, present only when pixels pushed past the threshold
    pub diff_artifact: Option<Bitmap>,
}

/// Compares named checks against baselines held in an artifact store
///
/// The store handle is provided at construction; the comparator owns no
/// other long-lived resources and holds no state between calls. Calls for
/// different check names are independent and may run in parallel; callers
/// serialize concurrent access to the same check name themselves.
#[derive(Debug)]
pub struct Comparator<S: ArtifactStore> {
    store: S,
    config: ComparatorConfig,
}

impl<S: ArtifactStore> Comparator<S> {
    /// Comparator over `store` with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, ComparatorConfig::new())
    }

    /// Comparator over `store` with explicit tuning
    pub fn with_config(store: S, config: ComparatorConfig) -> Self {
        Self { store, config }
    }

    /// The store this comparator reads and writes
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Compare `actual` against the stored baseline for `check_name`
    ///
    /// First run for a name stores `actual` as the baseline and passes; the
    /// first capture is trusted. A baseline with different dimensions fails
    /// immediately with the 100.0 sentinel and is never pixel-compared,
    /// cropped, or resized. Otherwise pixels are compared for exact RGB
    /// equality and the check passes when the differing percentage stays
    /// within the threshold; on failure the returned comparison carries a
    /// red-marker artifact.
    ///
    /// The stored baseline is never modified on this path apart from the
    /// first-run write.
    ///
    /// # Errors
    ///
    /// [`CotejoError::InvalidImage`] when `actual` has zero width or height;
    /// [`CotejoError::Storage`] when `check_name` is empty, the store cannot
    /// be read or written, or a stored baseline fails to decode.
    pub fn compare(&self, check_name: &str, actual: &Bitmap) -> CotejoResult<Comparison> {
        validate_check_name(check_name)?;
        validate_area(actual)?;

        let key = store::baseline_key(check_name);
        let baseline_bytes = match self.store.read(&key)? {
            Some(bytes) => bytes,
            None => {
                info!("No baseline for '{check_name}', storing current capture as the baseline");
                self.store.write(&key, &actual.to_png()?)?;
                return Ok(Comparison {
                    check_name: check_name.to_string(),
                    passed: true,
                    diff_percentage: 0.0,
                    diff_artifact: None,
                });
            }
        };
        let baseline = Bitmap::from_png(&baseline_bytes)?;

        if baseline.dimensions() != actual.dimensions() {
            warn!(
                "Dimension mismatch for '{check_name}': baseline {}x{}, capture {}x{}",
                baseline.width(),
                baseline.height(),
                actual.width(),
                actual.height()
            );
            return Ok(Comparison {
                check_name: check_name.to_string(),
                passed: false,
                diff_percentage: DIMENSION_MISMATCH_PERCENT,
                diff_artifact: None,
            });
        }

        let diff_pixels = count_differing_pixels(&baseline, actual);
        #[allow(clippy::cast_precision_loss)]
        let diff_percentage = 100.0 * diff_pixels as f64 / actual.pixel_count() as f64;
        let passed = diff_percentage <= self.config.threshold_percent;

        if passed {
            info!("Visual check '{check_name}' passed ({diff_percentage:.3}% pixels differ)");
        } else {
            warn!("Visual check '{check_name}' failed ({diff_percentage:.3}% pixels differ)");
        }

        let diff_artifact = if passed {
            None
        } else {
            Some(render_diff(&baseline, actual))
        };

        Ok(Comparison {
            check_name: check_name.to_string(),
            passed,
            diff_percentage,
            diff_artifact,
        })
    }

    /// Unconditionally overwrite the stored baseline for `check_name`
    ///
    /// No comparison is performed; whether a baseline existed before does
    /// not matter.
    ///
    /// # Errors
    ///
    /// Same input constraints as [`Self::compare`]; [`CotejoError::Storage`]
    /// when the write fails.
    pub fn update_baseline(&self, check_name: &str, actual: &Bitmap) -> CotejoResult<()> {
        validate_check_name(check_name)?;
        validate_area(actual)?;

        self.store
            .write(&store::baseline_key(check_name), &actual.to_png()?)?;
        info!("Baseline for '{check_name}' updated");
        Ok(())
    }
}

pub(crate) fn validate_check_name(check_name: &str) -> CotejoResult<()> {
    if check_name.is_empty() {
        return Err(CotejoError::Storage {
            message: "Check name is empty; it is used as the storage key".to_string(),
        });
    }
    Ok(())
}

fn validate_area(actual: &Bitmap) -> CotejoResult<()> {
    if actual.width() == 0 || actual.height() == 0 {
        return Err(CotejoError::InvalidImage {
            message: format!(
                "Zero-area capture ({}x{}) cannot be compared",
                actual.width(),
                actual.height()
            ),
        });
    }
    Ok(())
}

fn count_differing_pixels(baseline: &Bitmap, actual: &Bitmap) -> u64 {
    let mut diff_pixels = 0u64;
    for y in 0..baseline.height() {
        for x in 0..baseline.width() {
            if baseline.pixel(x, y) != actual.pixel(x, y) {
                diff_pixels += 1;
            }
        }
    }
    diff_pixels
}

/// Red markers where pixels differ, the baseline's pixels everywhere else
fn render_diff(baseline: &Bitmap, actual: &Bitmap) -> Bitmap {
    let mut artifact = baseline.clone();
    for y in 0..baseline.height() {
        for x in 0..baseline.width() {
            if baseline.pixel(x, y) != actual.pixel(x, y) {
                artifact.set_pixel(x, y, DIFF_MARKER_RGB);
            }
        }
    }
    artifact
}
