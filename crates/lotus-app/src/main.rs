//! The binary entry point for the lotus pond session.

use std::process::ExitCode;

use clap::Parser;
use lotus_app::platform::PlatformDirs;
use lotus_app::{AppError, Session};
use lotus_config::{CliArgs, Config};
use tracing::info;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lotus: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let mut dirs = PlatformDirs::resolve()?;
    if let Some(config_dir) = args.config.clone() {
        dirs = dirs.with_config_dir(config_dir);
    }
    dirs.create_dirs()?;

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    config.validate()?;

    let log_file = lotus_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        config = %dirs.config_dir.display(),
        log_file = ?log_file,
        "lotus pond starting"
    );

    let summary = Session::new(&config).run();
    info!(
        frames = summary.frames,
        timer_steps = summary.timer_steps,
        toggles = summary.toggles,
        environment_bakes = summary.environment_bakes,
        camera = ?summary.camera,
        "summary"
    );
    Ok(())
}
