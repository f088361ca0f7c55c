//! Visual Check Demo
//!
//! Walks through the baseline lifecycle:
//! - First-run bootstrap (the first capture is trusted)
//! - Passing and failing comparisons against the stored baseline
//! - Red-marker diff artifacts
//! - Harness orchestration with a report summary
//!
//! Run with: cargo run --example visual_check_demo -p cotejar

use cotejar::{
    Bitmap, Comparator, ComparatorConfig, DirStore, MemoryStore, MockCapture, VisualHarness,
};

fn main() {
    println!("=== Cotejar Visual Check Demo ===\n");

    // Demo 1: Configuration
    println!("1. Configuration");
    println!("   -------------");

    let config = ComparatorConfig::default();
    println!(
        "   Default threshold: {}% differing pixels",
        config.threshold_percent
    );

    let loose = ComparatorConfig::new().with_threshold_percent(5.0);
    println!("   Loosened threshold: {}%\n", loose.threshold_percent);

    // Demo 2: First-run bootstrap
    println!("2. First-Run Bootstrap");
    println!("   -------------------");

    let comparator = Comparator::new(MemoryStore::new());
    let frame = checkerboard(100, 100);

    let outcome = comparator
        .compare("board", &frame)
        .expect("comparison failed");
    println!("   First capture of 'board' (100x100):");
    println!(
        "     Passed: {} (capture stored as the baseline)",
        outcome.passed
    );
    println!("     Diff percentage: {:.2}%\n", outcome.diff_percentage);

    // Demo 3: Identical recapture
    println!("3. Identical Recapture");
    println!("   -------------------");

    let outcome = comparator
        .compare("board", &frame)
        .expect("comparison failed");
    println!("   Same pixels again:");
    println!("     Passed: {}", outcome.passed);
    println!("     Diff percentage: {:.2}%\n", outcome.diff_percentage);

    // Demo 4: A change past the threshold
    println!("4. Failing Check");
    println!("   -------------");

    let mut changed = frame.clone();
    for y in 0..40 {
        for x in 0..40 {
            changed.set_pixel(x, y, [0, 200, 255]);
        }
    }

    let outcome = comparator
        .compare("board", &changed)
        .expect("comparison failed");
    println!("   After repainting a 40x40 corner:");
    println!("     Passed: {}", outcome.passed);
    println!("     Diff percentage: {:.2}%", outcome.diff_percentage);
    let artifact = outcome
        .diff_artifact
        .expect("failed checks carry an artifact");
    println!(
        "     Artifact: {}x{}, differing pixels marked {:?}\n",
        artifact.width(),
        artifact.height(),
        cotejar::DIFF_MARKER_RGB
    );

    // Demo 5: Harness over a directory store
    println!("5. Harness + Report");
    println!("   ----------------");

    let root = std::env::temp_dir().join("cotejar-demo");
    let store = DirStore::new(&root).expect("store directory");
    let capture = MockCapture::with_frames(vec![frame.clone(), frame, changed]);
    let mut harness = VisualHarness::with_report_name(capture, Comparator::new(store), "demo");

    harness.run_check("board").expect("check failed"); // bootstrap
    harness.run_check("board").expect("check failed"); // pass
    harness.run_check("board").expect("check failed"); // fail, writes the diff slot

    println!("   Store contents under {}:", root.display());
    for key in harness.comparator().store().keys().expect("store listing") {
        println!("     {key}");
    }
    println!("   {}", harness.report().summary());
}

fn checkerboard(width: u32, height: u32) -> Bitmap {
    let mut frame = Bitmap::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let rgb = if (x / 10 + y / 10) % 2 == 0 {
                [230, 230, 230]
            } else {
                [25, 25, 25]
            };
            frame.set_pixel(x, y, rgb);
        }
    }
    frame
}
