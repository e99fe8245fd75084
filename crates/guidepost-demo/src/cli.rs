#![forbid(unsafe_code)]

//! Command-line argument parsing for the tour demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `GUIDEPOST_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Guidepost Demo: onboarding tour over a mock thesis dashboard

USAGE:
    guidepost-demo [OPTIONS]

OPTIONS:
    --restart            Clear the completion marker and show the tour now
    --state-file=PATH    Where to keep the completion marker
                         (default: $XDG_STATE_HOME/guidepost/guidepost-demo/tour.json)
    --no-persist         Keep the marker in memory only
    --config=PATH        Layer a JSON tour config over the terminal defaults
    --log-file=PATH      Write tracing output to PATH
    --exit-after-ms=N    Quit after N milliseconds (for testing)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Right / Enter   Next tour step
    Left            Previous tour step
    Esc             Skip the tour
    r               Replay the tour
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    GUIDEPOST_DEMO_STATE_FILE     Override --state-file
    GUIDEPOST_DEMO_NO_PERSIST     Set to 1 for --no-persist
    GUIDEPOST_DEMO_RESTART        Set to 1 for --restart
    GUIDEPOST_DEMO_CONFIG         Override --config
    GUIDEPOST_DEMO_LOG_FILE       Override --log-file
    GUIDEPOST_DEMO_EXIT_AFTER_MS  Override --exit-after-ms
    RUST_LOG                      Log filter (default: guidepost=debug)
    GUIDEPOST_*                   Tour tunables, see TourConfig";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Clear the marker and start the tour immediately.
    pub restart: bool,
    /// Marker file; `None` uses the per-user default.
    pub state_file: Option<PathBuf>,
    /// Whether the marker survives the process.
    pub persist: bool,
    /// Optional JSON tour config.
    pub config_file: Option<PathBuf>,
    /// Optional tracing output file.
    pub log_file: Option<PathBuf>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            restart: false,
            state_file: None,
            persist: true,
            config_file: None,
            log_file: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

fn is_truthy(val: &str) -> bool {
    matches!(val.trim(), "1" | "true" | "yes" | "on")
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or a bad argument.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("guidepost-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse_from<I>(args: I, env_lookup: impl Fn(&str) -> Option<String>) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = env_lookup("GUIDEPOST_DEMO_STATE_FILE") {
            opts.state_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env_lookup("GUIDEPOST_DEMO_NO_PERSIST") {
            opts.persist = !is_truthy(&val);
        }
        if let Some(val) = env_lookup("GUIDEPOST_DEMO_RESTART") {
            opts.restart = is_truthy(&val);
        }
        if let Some(val) = env_lookup("GUIDEPOST_DEMO_CONFIG") {
            opts.config_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env_lookup("GUIDEPOST_DEMO_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env_lookup("GUIDEPOST_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--restart" => opts.restart = true,
                "--no-persist" => opts.persist = false,
                other => {
                    if let Some(val) = other.strip_prefix("--state-file=") {
                        if val.is_empty() {
                            return Err("Empty --state-file value".to_string());
                        }
                        opts.state_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--config=") {
                        opts.config_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = val
                            .parse()
                            .map_err(|_| format!("Invalid --exit-after-ms value: {val}"))?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
