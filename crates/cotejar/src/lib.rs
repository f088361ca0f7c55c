//! Cotejar: visual screenshot regression for named checks
//!
//! Given a named check and a freshly captured bitmap, Cotejar decides
//! pass/fail against a stored baseline, maintains the baseline lifecycle
//! (first run bootstraps, updates are explicit), and renders a red-marker
//! diff artifact when pixels moved past the threshold.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐  capture   ┌──────────────┐  read/write  ┌───────────────┐
//! │ SurfaceCapture │───────────►│  Comparator  │◄────────────►│ ArtifactStore │
//! └────────────────┘            └──────┬───────┘              └───────────────┘
//!                                      │ Comparison
//!                               ┌──────▼───────┐
//!                               │ CheckReport  │  summary / HTML / JUnit / JSON
//!                               └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cotejar::{Bitmap, Comparator, MemoryStore};
//!
//! let comparator = Comparator::new(MemoryStore::new());
//! let frame = Bitmap::filled(4, 4, [10, 20, 30]);
//!
//! // First run trusts the capture and stores it as the baseline.
//! let first = comparator.compare("menu", &frame)?;
//! assert!(first.passed);
//!
//! // Identical recaptures keep passing with zero difference.
//! let second = comparator.compare("menu", &frame)?;
//! assert!(second.passed);
//! assert_eq!(second.diff_percentage, 0.0);
//! # Ok::<(), cotejar::CotejoError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod bitmap;
pub mod capture;
pub mod comparator;
pub mod harness;
pub mod report;
pub mod result;
pub mod store;

pub use bitmap::Bitmap;
pub use capture::{MockCapture, SurfaceCapture};
pub use comparator::{
    Comparator, ComparatorConfig, Comparison, DEFAULT_THRESHOLD_PERCENT, DIFF_MARKER_RGB,
    DIMENSION_MISMATCH_PERCENT,
};
pub use harness::VisualHarness;
pub use report::{CheckRecord, CheckReport, CheckStatus};
pub use result::{CotejoError, CotejoResult};
pub use store::{
    actual_key, baseline_key, diff_key, ArtifactStore, DirStore, MemoryStore, ACTUAL_SUFFIX,
    BASELINE_SUFFIX, DIFF_SUFFIX,
};

/// Common imports for writing visual checks
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::capture::{MockCapture, SurfaceCapture};
    pub use crate::comparator::{Comparator, ComparatorConfig, Comparison};
    pub use crate::harness::VisualHarness;
    pub use crate::report::{CheckReport, CheckStatus};
    pub use crate::result::{CotejoError, CotejoResult};
    pub use crate::store::{ArtifactStore, DirStore, MemoryStore};
}
