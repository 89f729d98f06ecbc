//! Configuration system for the lotus pond scene.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Every section is `#[serde(default)]` so older and newer
//! config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, SceneConfig, SimulationConfig, SkyConfig, TransitionConfig,
};
pub use error::ConfigError;
