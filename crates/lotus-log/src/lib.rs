//! Structured logging for the lotus pond scene.
//!
//! Console output carries uptime timestamps and targets; debug sessions can
//! additionally write JSON lines to `lotus.log` so a transition can be
//! replayed tick by tick afterwards.

use lotus_config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config name a level.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log written in debug sessions.
pub const LOG_FILE_NAME: &str = "lotus.log";

/// Resolve the filter string from the optional config.
///
/// An empty `debug.log_level` falls back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the config level. When `debug_build` is set, or the
/// config asks for `log_to_file`, a JSON layer writing to
/// `<log_dir>/lotus.log` is added; if the file cannot be created the console
/// layer is installed alone.
///
/// Returns the path of the JSON log if one was opened.
///
/// ```no_run
/// use lotus_config::Config;
/// use lotus_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let wants_file = debug_build || config.is_some_and(|c| c.debug.log_to_file);
    if wants_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
    {
        let path = log_dir.join(LOG_FILE_NAME);
        if let Ok(log_file) = std::fs::File::create(&path) {
            let file_layer = fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();

            subscriber.with(file_layer).init();
            return Some(path);
        }
    }

    subscriber.init();
    None
}
