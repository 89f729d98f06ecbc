//! Day/night environment transitions.
//!
//! An [`Orchestrator`] owns the shared [`ParameterStore`], a pair of
//! fixed-period discrete interpolators running on an [`IntervalScheduler`],
//! and the eased camera/light [`TweenSet`]. Everything runs on one logical
//! thread: the host calls [`Orchestrator::update_timers`] from its timer
//! driver and [`Orchestrator::advance_tweens`] from its render loop.

mod binding;
mod interval;
mod orchestrator;
mod params;
mod phase;
mod scene;
mod tween;

pub use binding::EnvironmentBinding;
#[cfg(test)]
pub(crate) use binding::RecordingBinding;
pub use interval::{IntervalHandle, IntervalScheduler, IntervalTask, TickContext, TickOutcome};
pub use orchestrator::{Orchestrator, TransitionHandles, TransitionState};
pub use params::{EnvironmentParameters, ParameterStore, ParameterUpdate};
pub use phase::{HandoffGate, Phase, PhaseKind, PhaseLimits};
pub use scene::{DecorativeLayer, ModeIndicator, SceneContext, SceneTransform};
pub use tween::{Easing, TweenHandle, TweenSet, TweenTarget};
