//! The shared scalar parameters that describe the sky and water appearance.

use lotus_config::TransitionConfig;

/// Sun/moon placement and scattering strength.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentParameters {
    /// Angle above the horizon in degrees.
    pub elevation: f32,
    /// Compass angle in degrees.
    pub azimuth: f32,
    /// Atmospheric scattering coefficient, non-negative.
    pub scatter_count: f32,
}

impl Default for EnvironmentParameters {
    fn default() -> Self {
        Self {
            elevation: -2.0,
            azimuth: 180.0,
            scatter_count: 2.0,
        }
    }
}

impl EnvironmentParameters {
    /// Start-up values taken from the transition config.
    pub fn from_config(config: &TransitionConfig) -> Self {
        Self {
            elevation: config.initial_elevation,
            azimuth: config.initial_azimuth,
            scatter_count: config.initial_scatter,
        }
    }
}

/// A partial write: `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParameterUpdate {
    pub elevation: Option<f32>,
    pub azimuth: Option<f32>,
    pub scatter_count: Option<f32>,
}

impl ParameterUpdate {
    pub fn elevation(value: f32) -> Self {
        Self {
            elevation: Some(value),
            ..Self::default()
        }
    }

    pub fn azimuth(value: f32) -> Self {
        Self {
            azimuth: Some(value),
            ..Self::default()
        }
    }

    pub fn with_azimuth(mut self, value: f32) -> Self {
        self.azimuth = Some(value);
        self
    }

    pub fn with_scatter(mut self, value: f32) -> Self {
        self.scatter_count = Some(value);
        self
    }

    fn is_empty(&self) -> bool {
        self.elevation.is_none() && self.azimuth.is_none() && self.scatter_count.is_none()
    }
}

/// Single shared instance of [`EnvironmentParameters`].
///
/// No validation happens here; callers write domain-appropriate values.
#[derive(Debug, Default)]
pub struct ParameterStore {
    current: EnvironmentParameters,
    revision: u64,
}

impl ParameterStore {
    pub fn new(initial: EnvironmentParameters) -> Self {
        Self {
            current: initial,
            revision: 0,
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> &EnvironmentParameters {
        &self.current
    }

    /// Apply a partial write. Empty updates do not bump the revision.
    pub fn set(&mut self, update: ParameterUpdate) {
        if update.is_empty() {
            return;
        }
        if let Some(elevation) = update.elevation {
            self.current.elevation = elevation;
        }
        if let Some(azimuth) = update.azimuth {
            self.current.azimuth = azimuth;
        }
        if let Some(scatter) = update.scatter_count {
            self.current.scatter_count = scatter;
        }
        self.revision += 1;
    }

    /// Number of non-empty writes applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
