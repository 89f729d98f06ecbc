//! Day/night transition state machine.
//!
//! Every toggle cancels whatever pair of discrete interpolators is still
//! running, launches a fresh pair with a closed hand-off gate, and restarts
//! the camera and light tweens toward the new mode's targets.

use std::time::Duration;

use glam::Vec3;
use lotus_config::TransitionConfig;
use tracing::{debug, info};

use crate::interval::{IntervalHandle, IntervalScheduler, TickContext};
use crate::phase::{HandoffGate, Phase, PhaseKind, PhaseLimits};
use crate::tween::{Easing, TweenSet, TweenTarget};
use crate::{EnvironmentBinding, EnvironmentParameters, ParameterStore, SceneContext};

/// The two environment modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionState {
    Day,
    Night,
}

impl TransitionState {
    pub fn flipped(self) -> Self {
        match self {
            TransitionState::Day => TransitionState::Night,
            TransitionState::Night => TransitionState::Day,
        }
    }

    pub fn is_night(self) -> bool {
        self == TransitionState::Night
    }
}

/// The interpolator pair of one transition.
#[derive(Clone, Debug)]
pub struct TransitionHandles {
    /// Sun phase on the primary timer.
    pub primary: IntervalHandle,
    /// Moon phase on the secondary timer.
    pub secondary: IntervalHandle,
}

impl TransitionHandles {
    pub fn cancel(&self) {
        self.primary.cancel();
        self.secondary.cancel();
    }

    pub fn active(&self) -> usize {
        usize::from(self.primary.is_active()) + usize::from(self.secondary.is_active())
    }

    /// Stepping ticks across both interpolators.
    pub fn steps(&self) -> u32 {
        self.primary.steps() + self.secondary.steps()
    }
}

/// Drives day/night transitions over a shared [`ParameterStore`].
pub struct Orchestrator<B> {
    config: TransitionConfig,
    limits: PhaseLimits,
    scheduler: IntervalScheduler,
    params: ParameterStore,
    gate: HandoffGate,
    tweens: TweenSet,
    scene: SceneContext,
    binding: B,
    displayed: TransitionState,
    last_settled: Option<TransitionState>,
    settled: bool,
    handles: Option<TransitionHandles>,
    transitions: u64,
}

impl<B: EnvironmentBinding> Orchestrator<B> {
    /// Nothing runs until [`enter`](Self::enter) or [`toggle`](Self::toggle).
    pub fn new(config: TransitionConfig, scene: SceneContext, binding: B) -> Self {
        Self {
            limits: PhaseLimits::from_config(&config),
            params: ParameterStore::new(EnvironmentParameters::from_config(&config)),
            config,
            scheduler: IntervalScheduler::new(),
            gate: HandoffGate::new(),
            tweens: TweenSet::new(),
            scene,
            binding,
            displayed: TransitionState::Day,
            last_settled: None,
            settled: false,
            handles: None,
            transitions: 0,
        }
    }

    /// Flip the displayed mode and transition toward it.
    pub fn toggle(&mut self) -> TransitionState {
        let next = self.displayed.flipped();
        self.enter(next);
        next
    }

    /// Start a transition toward `mode`, cancelling any transition in flight.
    pub fn enter(&mut self, mode: TransitionState) {
        let interrupted = self.cancel_interpolators();
        info!(
            from = ?self.displayed,
            to = ?mode,
            interrupted,
            elevation = self.params.get().elevation,
            "environment transition"
        );

        // Star layers show at night only.
        self.scene.set_layers_visible(mode.is_night());

        self.gate = HandoffGate::new();

        // The descending phase is scheduled first so it wins ticks that tie.
        let handles = match mode {
            TransitionState::Night => {
                let primary = self.launch(PhaseKind::Sunset);
                let secondary = self.launch(PhaseKind::Moonrise);
                TransitionHandles { primary, secondary }
            }
            TransitionState::Day => {
                let secondary = self.launch(PhaseKind::Moonset);
                let primary = self.launch(PhaseKind::Sunrise);
                TransitionHandles { primary, secondary }
            }
        };
        self.handles = Some(handles);

        let (camera_to, light_to) = match mode {
            TransitionState::Day => (self.config.camera_day, self.config.light_day),
            TransitionState::Night => (self.config.camera_night, self.config.light_night),
        };
        let duration = Duration::from_millis(self.config.tween_duration_ms);
        self.tweens.start(
            TweenTarget::Camera,
            Vec3::from_array(camera_to),
            duration,
            Easing::EaseInOut,
        );
        self.tweens.start(
            TweenTarget::SecondaryLight,
            Vec3::from_array(light_to),
            duration,
            Easing::EaseInOut,
        );

        self.displayed = mode;
        self.settled = false;
        self.scene.indicate(mode);
        self.transitions += 1;
    }

    fn launch(&mut self, kind: PhaseKind) -> IntervalHandle {
        let period_ms = if kind.is_primary() {
            self.config.primary_period_ms
        } else {
            self.config.secondary_period_ms
        };
        let period = Duration::from_millis(period_ms);
        self.scheduler
            .schedule(period, Box::new(Phase::new(kind, self.limits)))
    }

    /// Stop the running interpolator pair and tweens where they are.
    ///
    /// The displayed mode is kept; the environment is left unsettled until
    /// the next transition completes.
    pub fn cancel(&mut self) {
        self.cancel_interpolators();
        self.tweens.cancel_all();
    }

    /// Returns whether a pair was still running.
    fn cancel_interpolators(&mut self) -> bool {
        let interrupted = self.handles.as_ref().is_some_and(|handles| {
            handles.cancel();
            handles.primary.is_cancelled() || handles.secondary.is_cancelled()
        });
        // The scheduler only ever holds the current pair.
        self.scheduler.cancel_all();
        interrupted
    }

    /// Timer driver: advance the discrete interpolators by `dt`.
    pub fn update_timers(&mut self, dt: Duration) {
        let gate_was_open = self.gate.is_open();
        let mut ctx = TickContext {
            params: &mut self.params,
            gate: &mut self.gate,
            binding: &mut self.binding,
        };
        self.scheduler.advance(dt, &mut ctx);

        if !gate_was_open && self.gate.is_open() {
            debug!(
                to = ?self.displayed,
                elevation = self.params.get().elevation,
                "hand-off gate opened"
            );
        }

        let finished = self
            .handles
            .as_ref()
            .is_some_and(|h| h.primary.is_finished() && h.secondary.is_finished());
        if finished && !self.settled {
            self.settled = true;
            self.last_settled = Some(self.displayed);
            debug!(
                state = ?self.displayed,
                elevation = self.params.get().elevation,
                azimuth = self.params.get().azimuth,
                scatter = self.params.get().scatter_count,
                "environment settled"
            );
        }
    }

    /// Render-loop driver: advance the camera and light tweens by `dt`.
    pub fn advance_tweens(&mut self, dt: Duration) {
        self.tweens.advance(dt, &mut self.scene);
    }

    /// Live discrete interpolators: 2 right after a toggle, 0 once settled.
    pub fn active_handles(&self) -> usize {
        self.handles.as_ref().map_or(0, TransitionHandles::active)
    }

    /// Handles of the most recently launched pair.
    pub fn handles(&self) -> Option<&TransitionHandles> {
        self.handles.as_ref()
    }

    /// The mode the UI shows; flips synchronously on toggle.
    pub fn displayed_mode(&self) -> TransitionState {
        self.displayed
    }

    /// `Some` only once the last launched transition ran to completion;
    /// `None` while it runs or after it was cancelled.
    pub fn settled_state(&self) -> Option<TransitionState> {
        if self.settled { self.last_settled } else { None }
    }

    /// Mode of the most recent transition that completed, if any.
    pub fn last_settled(&self) -> Option<TransitionState> {
        self.last_settled
    }

    pub fn is_transitioning(&self) -> bool {
        self.active_handles() > 0
    }

    pub fn parameters(&self) -> &EnvironmentParameters {
        self.params.get()
    }

    pub fn parameter_revision(&self) -> u64 {
        self.params.revision()
    }

    pub fn gate_open(&self) -> bool {
        self.gate.is_open()
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.active_count()
    }

    /// Transitions started since creation.
    pub fn transitions_started(&self) -> u64 {
        self.transitions
    }

    pub fn scene(&self) -> &SceneContext {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneContext {
        &mut self.scene
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }
}
