//! Command-line argument parsing for the lotus pond session.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Lotus pond command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lotus", about = "Headless day/night lotus pond session")]
pub struct CliArgs {
    /// Length of the simulated session in seconds.
    #[arg(long)]
    pub seconds: Option<f32>,

    /// Session times in milliseconds at which the toggle is pressed (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub toggle_at: Option<Vec<u64>>,

    /// Render frames per second.
    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// Camera/light tween duration in milliseconds.
    #[arg(long)]
    pub tween_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seconds) = args.seconds {
            self.simulation.seconds = seconds;
        }
        if let Some(ref toggles) = args.toggle_at {
            let mut toggles = toggles.clone();
            toggles.sort_unstable();
            self.simulation.toggle_at_ms = toggles;
        }
        if let Some(rate) = args.frame_rate {
            self.simulation.frame_rate = rate;
        }
        if let Some(ms) = args.tween_ms {
            self.transition.tween_duration_ms = ms;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
