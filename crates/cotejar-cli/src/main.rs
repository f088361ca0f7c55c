//! Cotejador binary entry point
//!
//! ## Usage
//!
//! ```bash
//! cotejador compare shot.png --name login   # Compare against the stored baseline
//! cotejador update shot.png --name login    # Overwrite the baseline
//! cotejador list                            # Show stored baselines
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match cotejador::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
