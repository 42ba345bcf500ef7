//! Tracing subscriber setup.
//!
//! Output goes to stdout, stderr, an append-only file, or nowhere, selected
//! by the `--log` flag. `RUST_LOG` overrides the level directives.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for LogTarget {
    type Err = std::convert::Infallible;

    /// `0`/`off`, `1`/`stdout`, `2`/`stderr`; anything else is a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            path => LogTarget::File(PathBuf::from(path)),
        })
    }
}

/// Default directives: our crate at the requested level, dependencies at info.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,taskbot=debug"
    } else {
        "info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber.
pub fn init(target: &LogTarget, verbose: bool) -> Result<()> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(verbose))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(verbose))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(verbose))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
