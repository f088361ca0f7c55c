//! Subcommand handlers
//!
//! Each handler loads its inputs, drives the comparator over a
//! directory store, and prints a short result line. Exit status is
//! decided in [`dispatch`]: a failed comparison is not an error, it
//! is a result, so it maps to a failure exit code without touching
//! the error path.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use console::style;
use serde::Serialize;
use tracing::debug;

use cotejar::{
    actual_key, diff_key, ArtifactStore, Bitmap, Comparator, ComparatorConfig, DirStore,
    BASELINE_SUFFIX,
};

use crate::commands::{Cli, Commands, CompareArgs, ListArgs, UpdateArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Route a parsed command line to its handler
pub fn dispatch(cli: &Cli, config: &CliConfig) -> CliResult<ExitCode> {
    match &cli.command {
        Commands::Compare(args) => {
            let passed = run_compare(args, config)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Update(args) => {
            run_update(args, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::List(args) => {
            run_list(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Compare a capture file against the stored baseline
///
/// Returns whether the comparison passed. The raw capture is written
/// to the actual slot before comparing, and a failed comparison
/// leaves its diff image in the diff slot.
fn run_compare(args: &CompareArgs, config: &CliConfig) -> CliResult<bool> {
    validate_name(&args.name)?;
    if !args.threshold.is_finite() || args.threshold < 0.0 {
        return Err(CliError::invalid_argument(format!(
            "threshold must be a non-negative percentage, got {}",
            args.threshold
        )));
    }

    let actual = load_capture(&args.actual)?;
    let store = DirStore::new(&args.store)?;
    let comparator = Comparator::with_config(
        store,
        ComparatorConfig::new().with_threshold_percent(args.threshold),
    );

    comparator
        .store()
        .write(&actual_key(&args.name), &actual.to_png()?)?;

    let comparison = comparator.compare(&args.name, &actual)?;
    if let Some(artifact) = &comparison.diff_artifact {
        comparator
            .store()
            .write(&diff_key(&args.name), &artifact.to_png()?)?;
    }

    if config.verbosity.is_verbose() {
        println!(
            "  capture: {} ({}x{})",
            args.actual.display(),
            actual.width(),
            actual.height()
        );
        println!("  store:   {}", args.store.display());
    }

    if comparison.passed {
        if !config.verbosity.is_quiet() {
            println!(
                "{} {} ({:.2}% pixels differ)",
                style("✓").green().bold(),
                args.name,
                comparison.diff_percentage
            );
        }
        Ok(true)
    } else {
        if !config.verbosity.is_quiet() {
            println!(
                "{} {} ({:.2}% pixels differ, threshold {}%)",
                style("✗").red().bold(),
                args.name,
                comparison.diff_percentage,
                args.threshold
            );
            if comparison.diff_artifact.is_some() {
                println!(
                    "  diff: {}",
                    args.store.join(diff_key(&args.name)).display()
                );
            }
        }
        Ok(false)
    }
}

/// Overwrite the stored baseline with a capture file
fn run_update(args: &UpdateArgs, config: &CliConfig) -> CliResult<()> {
    validate_name(&args.name)?;
    let actual = load_capture(&args.actual)?;
    let comparator = Comparator::new(DirStore::new(&args.store)?);
    comparator.update_baseline(&args.name, &actual)?;

    if !config.verbosity.is_quiet() {
        println!(
            "{} baseline '{}' updated ({}x{})",
            style("✓").green().bold(),
            args.name,
            actual.width(),
            actual.height()
        );
    }
    Ok(())
}

/// List stored baselines with their dimensions
fn run_list(args: &ListArgs) -> CliResult<()> {
    let store = DirStore::new(&args.store)?;
    let entries = collect_baselines(&store)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No baselines stored under {}", args.store.display());
    } else {
        for entry in &entries {
            println!("{}  {}x{}", entry.name, entry.width, entry.height);
        }
    }
    Ok(())
}

/// One stored baseline in list output
#[derive(Debug, Serialize)]
struct BaselineEntry {
    /// Check name the baseline belongs to
    name: String,
    /// Baseline width in pixels
    width: u32,
    /// Baseline height in pixels
    height: u32,
}

/// Gather baseline slots from the store, sorted by check name
fn collect_baselines(store: &DirStore) -> CliResult<Vec<BaselineEntry>> {
    let mut entries = Vec::new();
    for key in store.keys()? {
        if let Some(name) = key.strip_suffix(BASELINE_SUFFIX) {
            if let Some(bytes) = store.read(&key)? {
                let baseline = Bitmap::from_png(&bytes)?;
                entries.push(BaselineEntry {
                    name: name.to_string(),
                    width: baseline.width(),
                    height: baseline.height(),
                });
            }
        }
    }
    Ok(entries)
}

/// Reject check names that cannot form storage keys
fn validate_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::invalid_argument("check name must not be empty"));
    }
    Ok(())
}

/// Read and decode a capture file
fn load_capture(path: &Path) -> CliResult<Bitmap> {
    let bytes = fs::read(path).map_err(|e| {
        CliError::invalid_argument(format!("cannot read capture {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Loaded capture file");
    Ok(Bitmap::from_png(&bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_png(dir: &Path, file: &str, bitmap: &Bitmap) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, bitmap.to_png().expect("encode png")).expect("write png");
        path
    }

    fn compare_args(capture: PathBuf, store: &Path, name: &str) -> CompareArgs {
        CompareArgs {
            actual: capture,
            name: name.to_string(),
            store: store.to_path_buf(),
            threshold: cotejar::DEFAULT_THRESHOLD_PERCENT,
        }
    }

    #[test]
    fn test_compare_bootstraps_on_first_run() {
        let temp = TempDir::new().expect("create temp dir");
        let store_dir = temp.path().join("shots");
        let capture = write_png(temp.path(), "a.png", &Bitmap::filled(4, 4, [10, 20, 30]));

        let passed = run_compare(
            &compare_args(capture, &store_dir, "login"),
            &CliConfig::default().with_verbosity(crate::config::Verbosity::Quiet),
        )
        .expect("compare succeeds");

        assert!(passed);
        assert!(store_dir.join("login.baseline.png").exists());
        assert!(store_dir.join("login.actual.png").exists());
        assert!(!store_dir.join("login.diff.png").exists());
    }

    #[test]
    fn test_compare_flags_changed_capture() {
        let temp = TempDir::new().expect("create temp dir");
        let store_dir = temp.path().join("shots");
        let config = CliConfig::default().with_verbosity(crate::config::Verbosity::Quiet);

        let black = write_png(temp.path(), "black.png", &Bitmap::filled(4, 4, [0, 0, 0]));
        let white = write_png(
            temp.path(),
            "white.png",
            &Bitmap::filled(4, 4, [255, 255, 255]),
        );

        assert!(run_compare(&compare_args(black, &store_dir, "panel"), &config).unwrap());
        let passed = run_compare(&compare_args(white, &store_dir, "panel"), &config).unwrap();
        assert!(!passed);

        let diff_bytes = fs::read(store_dir.join("panel.diff.png")).expect("diff written");
        let diff = Bitmap::from_png(&diff_bytes).expect("diff decodes");
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(diff.pixel(x, y), [255, 0, 0]);
            }
        }
    }

    #[test]
    fn test_compare_rejects_negative_threshold() {
        let temp = TempDir::new().expect("create temp dir");
        let capture = write_png(temp.path(), "a.png", &Bitmap::filled(2, 2, [0, 0, 0]));
        let mut args = compare_args(capture, &temp.path().join("shots"), "login");
        args.threshold = -1.0;

        let err = run_compare(&args, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_compare_rejects_empty_name_without_writing() {
        let temp = TempDir::new().expect("create temp dir");
        let store_dir = temp.path().join("shots");
        let capture = write_png(temp.path(), "a.png", &Bitmap::filled(2, 2, [0, 0, 0]));
        let args = compare_args(capture, &store_dir, "");

        let err = run_compare(&args, &CliConfig::default()).unwrap_err();

        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(
            !store_dir.join(".actual.png").exists(),
            "nothing may be written"
        );
        assert!(!store_dir.exists());
    }

    #[test]
    fn test_compare_rejects_missing_capture_file() {
        let temp = TempDir::new().expect("create temp dir");
        let args = compare_args(
            temp.path().join("does-not-exist.png"),
            &temp.path().join("shots"),
            "login",
        );

        let err = run_compare(&args, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(err.to_string().contains("does-not-exist.png"));
    }

    #[test]
    fn test_update_then_compare_passes() {
        let temp = TempDir::new().expect("create temp dir");
        let store_dir = temp.path().join("shots");
        let config = CliConfig::default().with_verbosity(crate::config::Verbosity::Quiet);

        let black = write_png(temp.path(), "black.png", &Bitmap::filled(3, 3, [0, 0, 0]));
        let white = write_png(
            temp.path(),
            "white.png",
            &Bitmap::filled(3, 3, [255, 255, 255]),
        );

        assert!(run_compare(&compare_args(black, &store_dir, "menu"), &config).unwrap());
        assert!(!run_compare(&compare_args(white.clone(), &store_dir, "menu"), &config).unwrap());

        run_update(
            &UpdateArgs {
                actual: white.clone(),
                name: "menu".to_string(),
                store: store_dir.clone(),
            },
            &config,
        )
        .expect("update succeeds");

        assert!(run_compare(&compare_args(white, &store_dir, "menu"), &config).unwrap());
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let temp = TempDir::new().expect("create temp dir");
        let store_dir = temp.path().join("shots");
        let capture = write_png(temp.path(), "a.png", &Bitmap::filled(2, 2, [0, 0, 0]));

        let err = run_update(
            &UpdateArgs {
                actual: capture,
                name: String::new(),
                store: store_dir.clone(),
            },
            &CliConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(!store_dir.exists(), "nothing may be written");
    }

    #[test]
    fn test_collect_baselines_reports_dimensions() {
        let temp = TempDir::new().expect("create temp dir");
        let store = DirStore::new(temp.path().join("shots")).expect("create store");
        let comparator = Comparator::new(store);

        comparator
            .update_baseline("banner", &Bitmap::new(8, 2))
            .unwrap();
        comparator
            .update_baseline("avatar", &Bitmap::new(4, 4))
            .unwrap();

        let entries = collect_baselines(comparator.store()).expect("collect baselines");
        let summary: Vec<String> = entries
            .iter()
            .map(|e| format!("{} {}x{}", e.name, e.width, e.height))
            .collect();
        assert_eq!(summary, vec!["avatar 4x4", "banner 8x2"]);
    }

    #[test]
    fn test_collect_baselines_skips_other_slots() {
        let temp = TempDir::new().expect("create temp dir");
        let store = DirStore::new(temp.path().join("shots")).expect("create store");
        let png = Bitmap::new(2, 2).to_png().expect("encode");

        store.write(&cotejar::baseline_key("login"), &png).unwrap();
        store.write(&diff_key("login"), &png).unwrap();
        store.write(&actual_key("login"), &png).unwrap();

        let entries = collect_baselines(&store).expect("collect baselines");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "login");
    }
}
