#![forbid(unsafe_code)]

//! Tracing setup. Output goes to a file, never to the terminal the demo
//! draws on.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "guidepost_engine=debug,guidepost_demo=debug";

/// Install a `fmt` subscriber appending to `path`.
///
/// Returns `Ok(false)` when no path is given or a global subscriber is
/// already set.
pub fn init(path: Option<&Path>) -> io::Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}
