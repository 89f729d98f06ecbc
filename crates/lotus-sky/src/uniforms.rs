//! Sky and water shader inputs.
//!
//! [`SkyUniforms`] and [`WaterUniforms`] are the CPU-side values the binding
//! updates; [`SkyUniform`] and [`WaterUniform`] are the packed forms written
//! to uniform buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::sun_position;

/// Atmospheric scattering inputs of the sky shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyUniforms {
    pub turbidity: f32,
    /// Rayleigh scattering strength; zero while the moon is up.
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    /// Mie directional anisotropy in `[0, 1)`.
    pub mie_directional_g: f32,
    /// Unit vector toward the sun (or moon).
    pub sun_position: Vec3,
}

impl Default for SkyUniforms {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.8,
            sun_position: sun_position(-2.0, 180.0),
        }
    }
}

impl SkyUniforms {
    pub fn to_uniform(&self) -> SkyUniform {
        SkyUniform {
            sun_position_padding: [
                self.sun_position.x,
                self.sun_position.y,
                self.sun_position.z,
                0.0,
            ],
            scattering: [
                self.turbidity,
                self.rayleigh,
                self.mie_coefficient,
                self.mie_directional_g,
            ],
        }
    }
}

/// GPU-side sky parameters, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkyUniform {
    /// xyz = sun position, w = padding.
    pub sun_position_padding: [f32; 4],
    /// x = turbidity, y = rayleigh, z = mie coefficient, w = mie directional g.
    pub scattering: [f32; 4],
}

/// Inputs of the water surface shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterUniforms {
    /// Normalised direction toward the sun.
    pub sun_direction: Vec3,
    /// Seconds of wave animation.
    pub time: f32,
    pub sun_color: Vec3,
    pub water_color: Vec3,
    pub distortion_scale: f32,
}

impl Default for WaterUniforms {
    fn default() -> Self {
        Self {
            sun_direction: sun_position(-2.0, 180.0),
            time: 0.0,
            sun_color: Vec3::ONE,
            // #336600
            water_color: Vec3::new(0.2, 0.4, 0.0),
            distortion_scale: 3.7,
        }
    }
}

impl WaterUniforms {
    pub fn to_uniform(&self) -> WaterUniform {
        WaterUniform {
            sun_direction_time: [
                self.sun_direction.x,
                self.sun_direction.y,
                self.sun_direction.z,
                self.time,
            ],
            sun_color_distortion: [
                self.sun_color.x,
                self.sun_color.y,
                self.sun_color.z,
                self.distortion_scale,
            ],
            water_color_padding: [self.water_color.x, self.water_color.y, self.water_color.z, 0.0],
        }
    }
}

/// GPU-side water parameters, 48 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct WaterUniform {
    /// xyz = sun direction, w = time in seconds.
    pub sun_direction_time: [f32; 4],
    /// xyz = sun color, w = distortion scale.
    pub sun_color_distortion: [f32; 4],
    /// xyz = water color, w = padding.
    pub water_color_padding: [f32; 4],
}
