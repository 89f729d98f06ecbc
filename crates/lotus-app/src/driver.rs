//! The per-frame render callback.
//!
//! Each frame runs in a fixed order: prop animation, tween advance, water
//! time, then draw. Drawing goes through a [`FrameSink`]; the headless
//! session only counts frames.

use std::time::Duration;

use glam::Vec3;
use lotus_environment::{Orchestrator, SceneContext, SceneTransform};
use lotus_sky::SkyEnvironment;

/// Water animation advance per rendered frame.
pub const WATER_TIME_STEP: f32 = 1.0 / 60.0;
/// Star layer spin per rendered frame, radians.
const STAR_SPIN: f32 = 0.001;
const PLAYER_SPIN: f32 = 0.0005;
/// Bobbing phase per millisecond of session time.
const BOB_RATE: f32 = 0.005;
const BOB_AMPLITUDE: f32 = 0.2;
const PLAYER_REST_HEIGHT: f32 = 9.9;

/// Props that bob on the water independent of the transition.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingProps {
    pub player: SceneTransform,
    pub pads: Vec<SceneTransform>,
}

impl FloatingProps {
    /// The bird and ten lotus pads of increasing size.
    pub fn lotus_pond() -> Self {
        let rotations = [10.0, 1.0, 5.0, 45.0, 95.0, 82.0, 13.0, 91.0, 69.0, 96.0];
        let pads = rotations
            .iter()
            .enumerate()
            .map(|(i, &rotation_y)| SceneTransform {
                position: Vec3::ZERO,
                scale: 12.0 + 2.0 * i as f32,
                rotation_y,
            })
            .collect();
        Self {
            player: SceneTransform {
                position: Vec3::new(-60.0, PLAYER_REST_HEIGHT, -1500.0),
                scale: 10.0,
                rotation_y: 0.0,
            },
            pads,
        }
    }

    fn animate(&mut self, elapsed: Duration) {
        let bob = (elapsed.as_secs_f32() * 1000.0 * BOB_RATE).sin() * BOB_AMPLITUDE;
        self.player.position.y = PLAYER_REST_HEIGHT + bob;
        self.player.rotation_y += PLAYER_SPIN;
        for pad in &mut self.pads {
            pad.position.y = bob;
        }
    }
}

/// Everything a frame can see when it is drawn.
pub struct FrameView<'a> {
    pub index: u64,
    pub scene: &'a SceneContext,
    pub sky: &'a SkyEnvironment,
    pub props: &'a FloatingProps,
}

/// Presents a finished frame.
pub trait FrameSink {
    fn draw(&mut self, frame: &FrameView<'_>);
}

/// Sink that remembers what the last frame looked like.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub frames: u64,
    pub last_camera: Option<Vec3>,
    pub last_visible_layers: usize,
    /// Star sprites that would have been drawn.
    pub last_visible_points: usize,
    /// Sun height as uploaded to the sky shader.
    pub last_sun_height: f32,
    pub last_water_time: f32,
    /// Texels of the reflection map bound for the frame.
    pub last_environment_texels: usize,
}

impl FrameSink for CountingSink {
    fn draw(&mut self, frame: &FrameView<'_>) {
        let sky = frame.sky.sky_uniform();
        let water = frame.sky.water_uniform();

        self.frames += 1;
        self.last_camera = frame.scene.camera.map(|camera| camera.position);
        self.last_visible_layers = frame.scene.visible_layers();
        self.last_visible_points = frame
            .scene
            .decorative_layers
            .iter()
            .filter(|layer| layer.visible)
            .map(|layer| layer.world_points().count())
            .sum();
        self.last_sun_height = sky.sun_position_padding[1];
        self.last_water_time = water.sun_direction_time[3];
        self.last_environment_texels = frame
            .sky
            .environment_map()
            .map_or(0, |map| (0..6).map(|face| map.face(face).len()).sum());
    }
}

pub struct FrameDriver<S = CountingSink> {
    props: FloatingProps,
    sink: S,
    frames: u64,
    elapsed: Duration,
}

impl<S: FrameSink> FrameDriver<S> {
    pub fn new(props: FloatingProps, sink: S) -> Self {
        Self {
            props,
            sink,
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Render one frame `dt` after the previous one.
    pub fn frame(&mut self, dt: Duration, orchestrator: &mut Orchestrator<SkyEnvironment>) {
        self.elapsed += dt;
        self.props.animate(self.elapsed);
        if let Some(stars) = orchestrator.scene_mut().decorative_layers.first_mut() {
            stars.transform.rotation_y += STAR_SPIN;
        }

        orchestrator.advance_tweens(dt);
        orchestrator.binding_mut().advance_time(WATER_TIME_STEP);

        let view = FrameView {
            index: self.frames,
            scene: orchestrator.scene(),
            sky: orchestrator.binding(),
            props: &self.props,
        };
        self.sink.draw(&view);
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn props(&self) -> &FloatingProps {
        &self.props
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
