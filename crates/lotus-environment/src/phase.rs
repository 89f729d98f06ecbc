//! The four discrete elevation phases and the gate that sequences them.
//!
//! Entering night runs a sunset on the primary timer and a moonrise on the
//! secondary timer; entering day runs a moonset on the secondary timer and a
//! sunrise on the primary timer. In both directions the phase that goes
//! down opens the [`HandoffGate`] when it reaches the low bound, and the
//! phase that goes up stays idle until then.

use lotus_config::TransitionConfig;

use crate::interval::{IntervalTask, TickContext, TickOutcome};
use crate::ParameterUpdate;

/// One-way flag: closed at the start of a transition, opened by the
/// descending phase. A fresh gate is created for every transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandoffGate {
    open: bool,
}

impl HandoffGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }
}

/// Step sizes, bounds, and azimuths shared by all phases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseLimits {
    pub elevation_step: f32,
    pub scatter_step: f32,
    pub low_elevation: f32,
    pub day_elevation: f32,
    pub moon_elevation: f32,
    pub sun_azimuth: f32,
    pub moon_azimuth: f32,
}

impl PhaseLimits {
    pub fn from_config(config: &TransitionConfig) -> Self {
        Self {
            elevation_step: config.elevation_step,
            scatter_step: config.scatter_step,
            low_elevation: config.low_elevation,
            day_elevation: config.day_elevation,
            moon_elevation: config.moon_elevation,
            sun_azimuth: config.sun_azimuth,
            moon_azimuth: config.moon_azimuth,
        }
    }
}

impl Default for PhaseLimits {
    fn default() -> Self {
        Self::from_config(&TransitionConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    /// Night, primary timer: sun goes down, scattering fades.
    Sunset,
    /// Night, secondary timer: moon climbs once the sun is down.
    Moonrise,
    /// Day, secondary timer: moon goes down.
    Moonset,
    /// Day, primary timer: sun climbs once the moon is down, scattering returns.
    Sunrise,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Sunset => "sunset",
            PhaseKind::Moonrise => "moonrise",
            PhaseKind::Moonset => "moonset",
            PhaseKind::Sunrise => "sunrise",
        }
    }

    /// Runs on the primary (slower) timer.
    pub fn is_primary(self) -> bool {
        matches!(self, PhaseKind::Sunset | PhaseKind::Sunrise)
    }

    /// Recomputes the environment with the moon flag set.
    pub fn is_moon_phase(self) -> bool {
        matches!(self, PhaseKind::Moonrise | PhaseKind::Moonset)
    }
}

/// A discrete interpolator task: one [`PhaseKind`] with its limits.
#[derive(Clone, Copy, Debug)]
pub struct Phase {
    kind: PhaseKind,
    limits: PhaseLimits,
}

impl Phase {
    pub fn new(kind: PhaseKind, limits: PhaseLimits) -> Self {
        Self { kind, limits }
    }

    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    fn recompute(&self, ctx: &mut TickContext<'_>) -> TickOutcome {
        ctx.binding
            .recompute_environment(ctx.params.get(), self.kind.is_moon_phase());
        TickOutcome::Stepped
    }
}

impl IntervalTask for Phase {
    fn name(&self) -> &'static str {
        self.kind.label()
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> TickOutcome {
        let l = self.limits;
        let current = *ctx.params.get();

        match self.kind {
            PhaseKind::Sunset => {
                if current.elevation <= l.low_elevation {
                    ctx.gate.open();
                    return TickOutcome::Finished;
                }
                let elevation = (current.elevation - l.elevation_step).max(l.low_elevation);
                let scatter = (current.scatter_count - l.scatter_step).max(0.0);
                ctx.params
                    .set(ParameterUpdate::elevation(elevation).with_scatter(scatter));
                self.recompute(ctx)
            }
            PhaseKind::Moonrise => {
                // A moon still up from a previous night must set first.
                if !ctx.gate.is_open() {
                    return TickOutcome::Idle;
                }
                if current.elevation >= l.moon_elevation {
                    return TickOutcome::Finished;
                }
                let elevation = (current.elevation + l.elevation_step).min(l.moon_elevation);
                ctx.params
                    .set(ParameterUpdate::elevation(elevation).with_azimuth(l.moon_azimuth));
                self.recompute(ctx)
            }
            PhaseKind::Moonset => {
                if current.elevation <= l.low_elevation {
                    ctx.params.set(ParameterUpdate::azimuth(l.sun_azimuth));
                    ctx.gate.open();
                    return TickOutcome::Finished;
                }
                let elevation = (current.elevation - l.elevation_step).max(l.low_elevation);
                ctx.params.set(ParameterUpdate::elevation(elevation));
                self.recompute(ctx)
            }
            PhaseKind::Sunrise => {
                if !ctx.gate.is_open() {
                    return TickOutcome::Idle;
                }
                if current.elevation >= l.day_elevation {
                    return TickOutcome::Finished;
                }
                let elevation = (current.elevation + l.elevation_step).min(l.day_elevation);
                let scatter = current.scatter_count + l.scatter_step;
                ctx.params
                    .set(ParameterUpdate::elevation(elevation).with_scatter(scatter));
                self.recompute(ctx)
            }
        }
    }
}
