#![forbid(unsafe_code)]

use std::fs;
use std::thread;
use std::time::Instant;

use anyhow::{bail, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use signtree::workspace::Workspace;
use signtree::{cli, output, scan};

fn main() -> Result<()> {
    env_logger::init();

    let config = cli::parse_args()?;

    // Workspace creation failure is fatal: nothing is scanned without it
    let workspace = Workspace::create()?;

    // Abrupt termination must still remove the workspace
    let cleanup_path = workspace.path().to_path_buf();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    thread::spawn(move || {
        if signals.forever().next().is_some() {
            let _ = fs::remove_dir_all(&cleanup_path);
            std::process::exit(130);
        }
    });

    let start = Instant::now();
    let summary = scan::run(&config, &workspace);

    // Explicit removal once all units have joined; the signal handler above
    // covers the abrupt-exit path
    drop(workspace);

    output::print_summary(&summary, start.elapsed());

    if !summary.succeeded() {
        bail!("{} signing unit(s) failed", summary.failures.len());
    }

    Ok(())
}
