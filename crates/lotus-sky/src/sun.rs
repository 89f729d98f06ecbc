use glam::Vec3;

/// Unit vector toward the sun for an elevation above the horizon and a
/// compass azimuth, both in degrees.
///
/// Azimuth 0 looks down +Z and 90 down +X; elevation 90 is straight up.
pub fn sun_position(elevation: f32, azimuth: f32) -> Vec3 {
    let phi = (90.0 - elevation).to_radians();
    let theta = azimuth.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
}
