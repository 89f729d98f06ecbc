//! Handles to the scene objects a transition is allowed to touch.
//!
//! Loading and placing meshes happens elsewhere; this context only carries
//! what the orchestrator writes: camera and secondary light positions,
//! decorative layer visibility, and the displayed day/night indicator.

use glam::Vec3;

use crate::TransitionState;
use crate::tween::TweenTarget;

/// Placement of a scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTransform {
    pub position: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// Rotation around the Y axis in radians.
    pub rotation_y: f32,
}

impl SceneTransform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: 1.0,
            rotation_y: 0.0,
        }
    }
}

/// A particle layer shown or hidden as a whole (the star sprites).
#[derive(Clone, Debug, PartialEq)]
pub struct DecorativeLayer {
    pub name: String,
    pub visible: bool,
    /// Point positions in layer space.
    pub points: Vec<Vec3>,
    pub transform: SceneTransform,
}

impl DecorativeLayer {
    pub fn new(name: impl Into<String>, points: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            points,
            transform: SceneTransform::at(Vec3::ZERO),
        }
    }

    /// Point positions with the layer transform applied.
    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        let (sin, cos) = self.transform.rotation_y.sin_cos();
        self.points.iter().map(move |p| {
            let scaled = *p * self.transform.scale;
            let rotated = Vec3::new(
                scaled.x * cos + scaled.z * sin,
                scaled.y,
                -scaled.x * sin + scaled.z * cos,
            );
            rotated + self.transform.position
        })
    }
}

/// The UI control that shows which mode is displayed.
pub trait ModeIndicator {
    fn show_mode(&mut self, mode: TransitionState);
}

/// Scene objects owned by the orchestrator for the lifetime of the scene.
///
/// `None` means the object has not finished loading; writes to it are
/// skipped until it appears.
#[derive(Default)]
pub struct SceneContext {
    pub camera: Option<SceneTransform>,
    pub secondary_light: Option<SceneTransform>,
    pub decorative_layers: Vec<DecorativeLayer>,
    indicator: Option<Box<dyn ModeIndicator>>,
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, position: Vec3) -> Self {
        self.camera = Some(SceneTransform::at(position));
        self
    }

    pub fn with_secondary_light(mut self, position: Vec3) -> Self {
        self.secondary_light = Some(SceneTransform::at(position));
        self
    }

    pub fn with_layer(mut self, layer: DecorativeLayer) -> Self {
        self.decorative_layers.push(layer);
        self
    }

    pub fn with_indicator(mut self, indicator: impl ModeIndicator + 'static) -> Self {
        self.indicator = Some(Box::new(indicator));
        self
    }

    pub fn transform_mut(&mut self, target: TweenTarget) -> Option<&mut SceneTransform> {
        match target {
            TweenTarget::Camera => self.camera.as_mut(),
            TweenTarget::SecondaryLight => self.secondary_light.as_mut(),
        }
    }

    /// Show or hide every decorative layer at once.
    pub fn set_layers_visible(&mut self, visible: bool) {
        for layer in &mut self.decorative_layers {
            layer.visible = visible;
        }
    }

    pub fn visible_layers(&self) -> usize {
        self.decorative_layers
            .iter()
            .filter(|layer| layer.visible)
            .count()
    }

    pub(crate) fn indicate(&mut self, mode: TransitionState) {
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.show_mode(mode);
        }
    }
}
