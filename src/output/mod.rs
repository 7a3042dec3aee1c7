//! Output formatting module
//!
//! Human-readable run summary: failures with their reproducing command
//! lines to stderr, counts and duration to stdout.

use std::time::Duration;

use crate::models::RunSummary;

/// Print the end-of-run summary.
pub fn print_summary(summary: &RunSummary, duration: Duration) {
    for failure in &summary.failures {
        eprintln!("error: {}: {}", failure.path.display(), failure.error);
    }

    println!("Signing Summary:");
    println!("  Signed: {} files", summary.signed);
    if !summary.failures.is_empty() {
        println!("  Failed: {} units", summary.failures.len());
    }

    let duration_ms = duration.as_millis() as u64;
    let duration_sec = duration_ms as f64 / 1000.0;
    if duration_sec < 1.0 {
        println!("  Duration: {}ms", duration_ms);
    } else {
        println!("  Duration: {:.2}s", duration_sec);
    }
}
