use chrono::Utc;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// ANSI colour prefix and padded tag for each level.
fn level_style(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::Error => ("\x1b[31m", "[ERROR]"),
        Level::Warn => ("\x1b[35m", "[WARN] "),
        Level::Info => ("\x1b[32m", "[INFO] "),
        Level::Debug => ("\x1b[33m", "[DEBUG]"),
        Level::Trace => ("\x1b[36m", "[TRACE]"),
    }
}

/// Installs the global logger.
///
/// Lines are printed as `[LEVEL][HH:MM:SS] message` with the tag coloured by
/// level. Calling this more than once keeps the first logger.
pub fn init() {
    let res = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format(|buf, record| {
            let (colour, tag) = level_style(record.level());
            writeln!(
                buf,
                "{colour}{tag}[{}]\x1b[0m {}",
                Utc::now().format("%H:%M:%S"),
                record.args()
            )
        })
        .try_init();
    if let Err(err) = res {
        log::debug!("Logger already initialised: {err}");
    }
}
