//! Eased, time-bounded position tweens for the camera and secondary light.
//!
//! Tweens are advanced once per render frame. Starting a tween on a target
//! that already has one cancels the old tween, so two tweens never write the
//! same field.

use std::time::Duration;

use glam::Vec3;

use crate::SceneContext;

/// Easing curves for tweens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed, no acceleration.
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Slow start, fast middle, slow end.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map a linear progress value (0.0..=1.0) to an eased value.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Scene objects whose position can be tweened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    Camera,
    SecondaryLight,
}

/// Identifies one started tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenHandle {
    id: u64,
    target: TweenTarget,
}

impl TweenHandle {
    pub fn target(&self) -> TweenTarget {
        self.target
    }
}

#[derive(Clone, Debug)]
struct Tween {
    id: u64,
    target: TweenTarget,
    /// Captured on the first advance that finds the target.
    from: Option<Vec3>,
    to: Vec3,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// All running tweens.
#[derive(Debug, Default)]
pub struct TweenSet {
    tweens: Vec<Tween>,
    next_id: u64,
}

impl TweenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving `target` toward `to` over `duration`.
    ///
    /// Any tween already bound to `target` is cancelled.
    pub fn start(
        &mut self,
        target: TweenTarget,
        to: Vec3,
        duration: Duration,
        easing: Easing,
    ) -> TweenHandle {
        self.cancel_target(target);
        let id = self.next_id;
        self.next_id += 1;
        self.tweens.push(Tween {
            id,
            target,
            from: None,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        });
        TweenHandle { id, target }
    }

    /// Stop a tween where it is. Returns `false` if it already ended.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|tween| tween.id != handle.id);
        self.tweens.len() != before
    }

    pub fn cancel_target(&mut self, target: TweenTarget) {
        self.tweens.retain(|tween| tween.target != target);
    }

    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.tweens.iter().any(|tween| tween.id == handle.id)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Advance every tween by `dt` and write the bound positions.
    ///
    /// A tween whose target is not in the scene yet does not advance; it
    /// starts once the target shows up. Finished tweens leave their target
    /// exactly at `to` and are dropped.
    pub fn advance(&mut self, dt: Duration, scene: &mut SceneContext) {
        for tween in &mut self.tweens {
            let Some(transform) = scene.transform_mut(tween.target) else {
                continue;
            };
            let from = *tween.from.get_or_insert(transform.position);

            tween.elapsed = (tween.elapsed + dt).min(tween.duration);
            transform.position = if tween.is_complete() {
                tween.to
            } else {
                from.lerp(tween.to, tween.easing.apply(tween.progress()))
            };
        }

        self.tweens
            .retain(|tween| !(tween.from.is_some() && tween.is_complete()));
    }
}
