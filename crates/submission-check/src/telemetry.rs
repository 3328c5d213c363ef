//! Diagnostic tracing for `check-your-submission`.
//!
//! The report (`[PASS]`/`[ERROR]` lines, the configuration dump and the
//! optional JSON report) is written to stdout through the [`Logger`] and
//! `println!`. Tracing covers everything else: the pre-check countdown, the
//! commands run under `timeout` and the output of a failed `cp` or `patch`.
//! It always goes to stderr, so a grading script can capture stdout alone.
//!
//! [`Logger`]: crate::logger::Logger

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber.
///
/// The CLI passes `Level::DEBUG` for `-v` and `Level::WARN` otherwise, so a
/// quiet run only surfaces failed commands. `RUST_LOG` overrides the level,
/// e.g. `RUST_LOG=submission_check::runner=debug` to trace command lines
/// alone. With `--json` each event is one JSON object per line for graders
/// that collect runs in bulk.
///
/// A second call (tests, or an embedding grader with its own subscriber) is
/// ignored.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
