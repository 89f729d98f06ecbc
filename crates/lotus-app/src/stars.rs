//! Seeded placement of the star sprite layers.

use glam::Vec3;
use lotus_config::SceneConfig;
use lotus_environment::DecorativeLayer;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Points scattered over a `spread` x `spread` square at `height`,
/// centred on the origin. Deterministic for a given seed.
pub fn scatter_points(seed: u64, count: u32, spread: f32, height: f32) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let half = spread * 0.5;
    (0..count)
        .map(|_| {
            let x = rng.random::<f32>() * spread - half;
            let z = rng.random::<f32>() * spread - half;
            Vec3::new(x, height, z)
        })
        .collect()
}

/// The low star layer and its lifted, enlarged copy.
pub fn star_layers(config: &SceneConfig) -> [DecorativeLayer; 2] {
    let points = scatter_points(
        config.seed,
        config.star_count,
        config.star_spread,
        config.star_height,
    );
    let low = DecorativeLayer::new("stars", points);

    let mut high = low.clone();
    high.name = "stars-high".to_owned();
    high.transform.position.y = config.upper_layer_height;
    high.transform.scale = config.upper_layer_scale;

    [low, high]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_stay_inside_square() {
        let points = scatter_points(7, 100, 200.0, 7.0);
        assert_eq!(points.len(), 100);
        for p in &points {
            assert!((-100.0..=100.0).contains(&p.x));
            assert!((-100.0..=100.0).contains(&p.z));
            assert_eq!(p.y, 7.0);
        }
    }

    #[test]
    fn test_same_seed_same_points() {
        assert_eq!(scatter_points(42, 50, 200.0, 7.0), scatter_points(42, 50, 200.0, 7.0));
    }

    #[test]
    fn test_different_seed_different_points() {
        assert_ne!(scatter_points(1, 50, 200.0, 7.0), scatter_points(2, 50, 200.0, 7.0));
    }

    #[test]
    fn test_upper_layer_is_lifted_copy() {
        let config = SceneConfig::default();
        let [low, high] = star_layers(&config);
        assert_eq!(low.points, high.points);
        assert_eq!(high.transform.position.y, 70.0);
        assert_eq!(high.transform.scale, 2.0);
        assert_eq!(low.transform.scale, 1.0);

        let first = high.world_points().next().unwrap();
        assert!((first.y - (70.0 + 2.0 * 7.0)).abs() < 1e-4);
    }
}
