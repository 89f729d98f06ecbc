use lotus_config::SkyConfig;
use lotus_environment::{EnvironmentBinding, EnvironmentParameters};
use tracing::trace;

use crate::{
    EnvironmentMap, EnvironmentMapSlot, SkyUniform, SkyUniforms, WaterUniform, WaterUniforms,
    sun_position,
};

/// Sky, water, and reflection state kept in step with the parameters.
#[derive(Debug)]
pub struct SkyEnvironment {
    config: SkyConfig,
    sky: SkyUniforms,
    water: WaterUniforms,
    environment: EnvironmentMapSlot,
    recomputes: u64,
}

impl SkyEnvironment {
    pub fn new(config: SkyConfig) -> Self {
        let sky = SkyUniforms {
            turbidity: config.turbidity,
            mie_coefficient: config.mie_coefficient,
            mie_directional_g: config.mie_directional_g,
            ..SkyUniforms::default()
        };
        Self {
            config,
            sky,
            water: WaterUniforms::default(),
            environment: EnvironmentMapSlot::new(),
            recomputes: 0,
        }
    }

    pub fn sky(&self) -> &SkyUniforms {
        &self.sky
    }

    pub fn water(&self) -> &WaterUniforms {
        &self.water
    }

    pub fn sky_uniform(&self) -> SkyUniform {
        self.sky.to_uniform()
    }

    pub fn water_uniform(&self) -> WaterUniform {
        self.water.to_uniform()
    }

    /// The current reflection map, once the first recompute has run.
    pub fn environment_map(&self) -> Option<&EnvironmentMap> {
        self.environment.current()
    }

    pub fn live_maps(&self) -> u64 {
        self.environment.live_maps()
    }

    pub fn generation(&self) -> u64 {
        self.environment.generation()
    }

    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Advance the water animation clock.
    pub fn advance_time(&mut self, seconds: f32) {
        self.water.time += seconds;
    }
}

impl EnvironmentBinding for SkyEnvironment {
    fn recompute_environment(&mut self, params: &EnvironmentParameters, moon_phase: bool) {
        let sun = sun_position(params.elevation, params.azimuth);

        self.sky.turbidity = self.config.turbidity;
        self.sky.mie_directional_g = self.config.mie_directional_g;
        if moon_phase {
            self.sky.rayleigh = 0.0;
            self.sky.mie_coefficient = self.config.moon_mie_coefficient;
        } else {
            self.sky.rayleigh = params.scatter_count;
            self.sky.mie_coefficient = self.config.mie_coefficient;
        }
        self.sky.sun_position = sun;
        self.water.sun_direction = sun.normalize_or_zero();

        let map = self
            .environment
            .rebake(&self.sky, self.config.environment_map_size);
        trace!(
            generation = map.generation(),
            luminance = map.average_luminance(),
            "environment map baked"
        );
        self.recomputes += 1;

        trace!(
            elevation = params.elevation,
            azimuth = params.azimuth,
            rayleigh = self.sky.rayleigh,
            moon_phase,
            "sky recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn environment() -> SkyEnvironment {
        SkyEnvironment::new(SkyConfig::default())
    }

    fn params(elevation: f32, azimuth: f32, scatter_count: f32) -> EnvironmentParameters {
        EnvironmentParameters {
            elevation,
            azimuth,
            scatter_count,
        }
    }

    #[test]
    fn test_no_map_before_first_recompute() {
        let env = environment();
        assert!(env.environment_map().is_none());
        assert_eq!(env.live_maps(), 0);
        assert_eq!(env.generation(), 0);
    }

    #[test]
    fn test_sun_phase_uses_scatter_count() {
        let mut env = environment();
        env.recompute_environment(&params(1.0, 180.0, 1.75), false);
        let sky = env.sky();
        assert_eq!(sky.turbidity, 10.0);
        assert_eq!(sky.rayleigh, 1.75);
        assert_eq!(sky.mie_coefficient, 0.005);
        assert_eq!(sky.mie_directional_g, 0.8);
    }

    #[test]
    fn test_moon_phase_drops_scattering() {
        let mut env = environment();
        env.recompute_environment(&params(3.0, -45.0, 1.8), true);
        assert_eq!(env.sky().rayleigh, 0.0);
        assert_eq!(env.sky().mie_coefficient, 0.00001);

        env.recompute_environment(&params(0.0, 180.0, 1.8), false);
        assert_eq!(env.sky().rayleigh, 1.8);
        assert_eq!(env.sky().mie_coefficient, 0.005);
    }

    #[test]
    fn test_water_faces_the_sun() {
        let mut env = environment();
        env.recompute_environment(&params(0.0, 90.0, 2.0), false);
        assert!((env.sky().sun_position - Vec3::X).length() < 1e-5);
        assert!((env.water().sun_direction - Vec3::X).length() < 1e-5);
        assert!((env.water().sun_direction.length() - 1.0).abs() < 1e-5);
        assert_eq!(env.sky_uniform().scattering[1], 2.0);
    }

    #[test]
    fn test_recomputes_never_accumulate_maps() {
        let mut env = environment();
        for i in 0..40 {
            env.recompute_environment(&params(-2.0 + i as f32 * 0.1, 180.0, 2.0), i % 2 == 0);
            assert_eq!(env.live_maps(), 1);
        }
        assert_eq!(env.generation(), 40);
        assert_eq!(env.recomputes(), 40);
        assert_eq!(env.environment_map().map(EnvironmentMap::generation), Some(40));
    }

    #[test]
    fn test_map_size_follows_config() {
        let mut env = SkyEnvironment::new(SkyConfig {
            environment_map_size: 4,
            ..SkyConfig::default()
        });
        env.recompute_environment(&params(2.0, 180.0, 2.0), false);
        assert_eq!(env.environment_map().map(EnvironmentMap::face_size), Some(4));
    }

    #[test]
    fn test_water_time_accumulates() {
        let mut env = environment();
        for _ in 0..60 {
            env.advance_time(1.0 / 60.0);
        }
        assert!((env.water().time - 1.0).abs() < 1e-4);
        assert!((env.water_uniform().sun_direction_time[3] - 1.0).abs() < 1e-4);
    }
}
