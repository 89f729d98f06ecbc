//! Cube-map bake of the sky used as the scene's reflection environment.
//!
//! The bake is a cheap single-scatter approximation evaluated per texel; it
//! only has to track the sky's brightness and sun glow, not match the sky
//! shader exactly.

use std::f32::consts::PI;

use glam::Vec3;

use crate::SkyUniforms;

/// Sky color looking straight up at full daylight.
const ZENITH: Vec3 = Vec3::new(0.25, 0.45, 0.85);
/// Sky color along the horizon at full daylight.
const HORIZON: Vec3 = Vec3::new(0.85, 0.7, 0.5);
const GROUND: Vec3 = Vec3::new(0.02, 0.025, 0.03);

/// Unit direction through a cube face at UV coordinates in [0, 1].
///
/// Face indices: 0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z.
pub fn cube_face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    let a = u * 2.0 - 1.0;
    let b = v * 2.0 - 1.0;
    let dir = match face {
        0 => Vec3::new(1.0, -b, -a),
        1 => Vec3::new(-1.0, -b, a),
        2 => Vec3::new(a, 1.0, b),
        3 => Vec3::new(a, -1.0, -b),
        4 => Vec3::new(a, -b, 1.0),
        _ => Vec3::new(-a, -b, -1.0),
    };
    dir.normalize()
}

/// Henyey-Greenstein phase function.
fn mie_phase(cos_theta: f32, g: f32) -> f32 {
    let g2 = g * g;
    let denom = (1.0 + g2 - 2.0 * g * cos_theta).max(1e-4);
    (1.0 - g2) / (4.0 * PI * denom.powf(1.5))
}

fn sky_radiance(dir: Vec3, sky: &SkyUniforms) -> Vec3 {
    let sun = sky.sun_position.normalize_or_zero();
    // Fades the whole sky out as the light source drops below the horizon.
    let daylight = ((sun.y + 0.1) / 0.3).clamp(0.0, 1.0);

    if dir.y < 0.0 {
        return GROUND * daylight;
    }

    let rayleigh = sky.rayleigh.max(0.0) / (1.0 + sky.rayleigh.max(0.0));
    let haze = (sky.turbidity / 20.0).clamp(0.0, 1.0) * (1.0 - dir.y);
    let base = HORIZON.lerp(ZENITH, dir.y) * rayleigh;
    let hazy = base.lerp(Vec3::splat(base.length() / 3.0_f32.sqrt()), haze);

    let glow = sky.mie_coefficient * 100.0 * mie_phase(dir.dot(sun), sky.mie_directional_g);
    (hazy + Vec3::splat(glow)) * daylight
}

/// Six baked cube faces of linear RGBA texels.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    face_size: u32,
    generation: u64,
    faces: [Vec<[f32; 4]>; 6],
}

impl EnvironmentMap {
    /// Evaluate the sky for every texel center of a `face_size`² cube.
    pub fn bake(sky: &SkyUniforms, face_size: u32, generation: u64) -> Self {
        let face_size = face_size.max(1);
        let texels = (face_size * face_size) as usize;
        let faces = std::array::from_fn(|face| {
            let mut pixels = Vec::with_capacity(texels);
            for y in 0..face_size {
                for x in 0..face_size {
                    let u = (x as f32 + 0.5) / face_size as f32;
                    let v = (y as f32 + 0.5) / face_size as f32;
                    let c = sky_radiance(cube_face_direction(face, u, v), sky);
                    pixels.push([c.x, c.y, c.z, 1.0]);
                }
            }
            pixels
        });
        Self {
            face_size,
            generation,
            faces,
        }
    }

    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    /// Bake counter value this map was produced at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn face(&self, face: usize) -> &[[f32; 4]] {
        &self.faces[face]
    }

    /// Mean luminance over all faces.
    pub fn average_luminance(&self) -> f32 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for face in &self.faces {
            for p in face {
                sum += 0.2126 * p[0] + 0.7152 * p[1] + 0.0722 * p[2];
                count += 1;
            }
        }
        if count == 0 { 0.0 } else { sum / count as f32 }
    }
}

/// Holds the one live environment map.
///
/// Re-baking drops the previous map before the new one is produced, so
/// repeated recomputes never accumulate maps.
#[derive(Debug, Default)]
pub struct EnvironmentMapSlot {
    current: Option<EnvironmentMap>,
    created: u64,
    disposed: u64,
}

impl EnvironmentMapSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebake(&mut self, sky: &SkyUniforms, face_size: u32) -> &EnvironmentMap {
        if let Some(previous) = self.current.take() {
            drop(previous);
            self.disposed += 1;
        }
        self.created += 1;
        self.current
            .insert(EnvironmentMap::bake(sky, face_size, self.created))
    }

    pub fn current(&self) -> Option<&EnvironmentMap> {
        self.current.as_ref()
    }

    /// Maps created and not yet disposed.
    pub fn live_maps(&self) -> u64 {
        self.created - self.disposed
    }

    /// Total bakes so far.
    pub fn generation(&self) -> u64 {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sun_position;

    fn day_sky() -> SkyUniforms {
        SkyUniforms {
            sun_position: sun_position(30.0, 180.0),
            ..SkyUniforms::default()
        }
    }

    #[test]
    fn test_face_centers_hit_axes() {
        let axes = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
        for (face, axis) in axes.iter().enumerate() {
            let dir = cube_face_direction(face, 0.5, 0.5);
            assert!((dir - *axis).length() < 1e-6, "face {face}: {dir:?}");
        }
    }

    #[test]
    fn test_face_directions_are_unit_and_on_their_face() {
        for face in 0..6 {
            for &(u, v) in &[(0.0, 0.0), (1.0, 0.0), (0.3, 0.8), (1.0, 1.0)] {
                let dir = cube_face_direction(face, u, v);
                assert!((dir.length() - 1.0).abs() < 1e-5);
                let major = dir.abs().max_element();
                let axis = match face / 2 {
                    0 => dir.x,
                    1 => dir.y,
                    _ => dir.z,
                };
                assert!((axis.abs() - major).abs() < 1e-6);
                assert_eq!(axis > 0.0, face % 2 == 0);
            }
        }
    }

    #[test]
    fn test_bake_produces_full_faces() {
        let map = EnvironmentMap::bake(&day_sky(), 8, 1);
        assert_eq!(map.face_size(), 8);
        for face in 0..6 {
            assert_eq!(map.face(face).len(), 64);
            assert!(map.face(face).iter().all(|p| p[3] == 1.0 && p[0] >= 0.0));
        }
    }

    #[test]
    fn test_zero_face_size_is_clamped() {
        let map = EnvironmentMap::bake(&day_sky(), 0, 1);
        assert_eq!(map.face_size(), 1);
        assert_eq!(map.face(2).len(), 1);
    }

    #[test]
    fn test_moon_sky_is_darker_than_day_sky() {
        let day = EnvironmentMap::bake(&day_sky(), 8, 1);
        let moon = EnvironmentMap::bake(
            &SkyUniforms {
                rayleigh: 0.0,
                mie_coefficient: 0.00001,
                sun_position: sun_position(7.0, -45.0),
                ..SkyUniforms::default()
            },
            8,
            2,
        );
        assert!(moon.average_luminance() < day.average_luminance());
    }

    #[test]
    fn test_sun_side_glows() {
        // Sun toward -Z: the -Z face outshines the +Z face.
        let map = EnvironmentMap::bake(&day_sky(), 8, 1);
        let lum = |face: usize| -> f32 { map.face(face).iter().map(|p| p[0] + p[1] + p[2]).sum() };
        assert!(lum(5) > lum(4));
    }

    #[test]
    fn test_slot_keeps_one_live_map() {
        let mut slot = EnvironmentMapSlot::new();
        assert_eq!(slot.live_maps(), 0);
        assert!(slot.current().is_none());
        for _ in 0..50 {
            slot.rebake(&day_sky(), 2);
            assert_eq!(slot.live_maps(), 1);
        }
        assert_eq!(slot.generation(), 50);
        assert_eq!(slot.current().map(EnvironmentMap::generation), Some(50));
    }
}
