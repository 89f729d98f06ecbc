//! Configuration structs with scene defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Longest accepted simulated session, one week.
const MAX_SESSION_SECONDS: f32 = 604_800.0;

/// Top-level configuration for the lotus pond scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Day/night transition pacing and targets.
    pub transition: TransitionConfig,
    /// Sky shader constants and environment map resolution.
    pub sky: SkyConfig,
    /// Decorative layers and initial object placement.
    pub scene: SceneConfig,
    /// Headless session driver settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Pacing, bounds, and spatial targets of a day/night transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Tick period of the primary (sun) interpolator in milliseconds.
    pub primary_period_ms: u64,
    /// Tick period of the secondary (moon) interpolator in milliseconds.
    pub secondary_period_ms: u64,
    /// Elevation change per stepping tick, in degrees.
    pub elevation_step: f32,
    /// Scattering change per primary stepping tick.
    pub scatter_step: f32,
    /// Lowest elevation reached when the sun or moon sets.
    pub low_elevation: f32,
    /// Settled sun elevation during the day.
    pub day_elevation: f32,
    /// Settled moon elevation during the night.
    pub moon_elevation: f32,
    /// Azimuth restored once the moon has set.
    pub sun_azimuth: f32,
    /// Azimuth used while the moon rises.
    pub moon_azimuth: f32,
    /// Duration of the camera and light tweens in milliseconds.
    pub tween_duration_ms: u64,
    /// Camera position targeted when entering day.
    pub camera_day: [f32; 3],
    /// Camera position targeted when entering night.
    pub camera_night: [f32; 3],
    /// Secondary light position targeted when entering day.
    pub light_day: [f32; 3],
    /// Secondary light position targeted when entering night.
    pub light_night: [f32; 3],
    /// Elevation before the first transition.
    pub initial_elevation: f32,
    /// Azimuth before the first transition.
    pub initial_azimuth: f32,
    /// Scattering coefficient before the first transition.
    pub initial_scatter: f32,
}

/// Sky shader constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
    /// Atmospheric turbidity.
    pub turbidity: f32,
    /// Mie coefficient while the sun is up.
    pub mie_coefficient: f32,
    /// Mie coefficient while the moon is up.
    pub moon_mie_coefficient: f32,
    /// Mie directional anisotropy.
    pub mie_directional_g: f32,
    /// Edge length of each environment map face in texels.
    pub environment_map_size: u32,
}

/// Decorative layer generation and initial placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the star layer point placement.
    pub seed: u64,
    /// Number of points per star layer.
    pub star_count: u32,
    /// Side length of the square the stars are scattered over.
    pub star_spread: f32,
    /// Height of the lower star layer.
    pub star_height: f32,
    /// Height of the upper (cloned) star layer.
    pub upper_layer_height: f32,
    /// Uniform scale of the upper star layer.
    pub upper_layer_scale: f32,
    /// Camera position at start-up.
    pub camera_start: [f32; 3],
    /// Secondary light position at start-up.
    pub light_start: [f32; 3],
}

/// Headless session driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Render frames per second.
    pub frame_rate: u32,
    /// Resolution of the timer driver in milliseconds.
    pub timer_step_ms: u64,
    /// Length of the simulated session in seconds.
    pub seconds: f32,
    /// Session times (milliseconds) at which the toggle is pressed.
    pub toggle_at_ms: Vec<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            primary_period_ms: 50,
            secondary_period_ms: 20,
            elevation_step: 0.1,
            scatter_step: 0.01,
            low_elevation: -2.0,
            day_elevation: 2.0,
            moon_elevation: 7.0,
            sun_azimuth: 180.0,
            moon_azimuth: -45.0,
            tween_duration_ms: 3000,
            camera_day: [0.0, 30.0, 100.0],
            camera_night: [100.0, 50.0, -100.0],
            light_day: [0.0, 100.0, 0.0],
            light_night: [0.0, 28.0, 0.0],
            initial_elevation: -2.0,
            initial_azimuth: 180.0,
            initial_scatter: 2.0,
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            mie_coefficient: 0.005,
            moon_mie_coefficient: 0.00001,
            mie_directional_g: 0.8,
            environment_map_size: 16,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x1075,
            star_count: 100,
            star_spread: 200.0,
            star_height: 7.0,
            upper_layer_height: 70.0,
            upper_layer_scale: 2.0,
            camera_start: [0.0, 5.0, 50.0],
            light_start: [0.0, 100.0, 0.0],
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            timer_step_ms: 5,
            seconds: 12.0,
            toggle_at_ms: vec![4000, 5500],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload / Validate ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values that would stall or divide by zero at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.transition;
        if t.primary_period_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transition.primary_period_ms",
                reason: "must be greater than zero",
            });
        }
        if t.secondary_period_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transition.secondary_period_ms",
                reason: "must be greater than zero",
            });
        }
        if t.elevation_step <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "transition.elevation_step",
                reason: "must be positive",
            });
        }
        if t.low_elevation >= t.day_elevation || t.low_elevation >= t.moon_elevation {
            return Err(ConfigError::InvalidValue {
                field: "transition.low_elevation",
                reason: "must lie below both the day and moon elevation",
            });
        }
        if self.simulation.frame_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "simulation.frame_rate",
                reason: "must be greater than zero",
            });
        }
        let seconds = self.simulation.seconds;
        if !(0.0..=MAX_SESSION_SECONDS).contains(&seconds) {
            return Err(ConfigError::InvalidValue {
                field: "simulation.seconds",
                reason: "must be a finite number of seconds between 0 and one week",
            });
        }
        if self.simulation.timer_step_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "simulation.timer_step_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}
