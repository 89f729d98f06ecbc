//! A scripted headless session: the scene, its clocks, and the switch presses.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec3;
use lotus_config::Config;
use lotus_environment::{
    EnvironmentParameters, ModeIndicator, Orchestrator, SceneContext, TransitionState,
};
use lotus_sky::SkyEnvironment;
use tracing::{debug, info};

use crate::driver::{CountingSink, FloatingProps, FrameDriver};
use crate::frame_clock::FrameClock;
use crate::script::ToggleScript;
use crate::stars::star_layers;

/// The on-screen switch; remembers the last mode it was set to.
#[derive(Clone, Debug, Default)]
pub struct SwitchIndicator {
    shown: Rc<Cell<Option<TransitionState>>>,
}

impl SwitchIndicator {
    pub fn shown(&self) -> Option<TransitionState> {
        self.shown.get()
    }
}

impl ModeIndicator for SwitchIndicator {
    fn show_mode(&mut self, mode: TransitionState) {
        debug!(?mode, "switch updated");
        self.shown.set(Some(mode));
    }
}

/// Where a session ended up.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub elapsed: Duration,
    pub frames: u64,
    pub timer_steps: u64,
    pub toggles: usize,
    /// Scripted presses that fell after the end of the session.
    pub unplayed_toggles: usize,
    pub transitions: u64,
    /// Frames in which the environment parameters changed.
    pub environment_changes: u64,
    pub displayed: TransitionState,
    pub settled: Option<TransitionState>,
    pub indicator: Option<TransitionState>,
    pub parameters: EnvironmentParameters,
    pub camera: Option<Vec3>,
    pub environment_bakes: u64,
    pub live_maps: u64,
}

pub struct Session {
    orchestrator: Orchestrator<SkyEnvironment>,
    driver: FrameDriver<CountingSink>,
    clock: FrameClock,
    script: ToggleScript,
    indicator: SwitchIndicator,
    frame_time: Duration,
    length: Duration,
    elapsed: Duration,
    toggles: usize,
    seen_revision: u64,
    environment_changes: u64,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let indicator = SwitchIndicator::default();
        let [low, high] = star_layers(&config.scene);
        let scene = SceneContext::new()
            .with_camera(Vec3::from_array(config.scene.camera_start))
            .with_secondary_light(Vec3::from_array(config.scene.light_start))
            .with_layer(low)
            .with_layer(high)
            .with_indicator(indicator.clone());

        let orchestrator = Orchestrator::new(
            config.transition.clone(),
            scene,
            SkyEnvironment::new(config.sky.clone()),
        );

        let frame_rate = config.simulation.frame_rate.max(1);
        Self {
            orchestrator,
            driver: FrameDriver::new(FloatingProps::lotus_pond(), CountingSink::default()),
            clock: FrameClock::new(Duration::from_millis(config.simulation.timer_step_ms)),
            script: ToggleScript::from_millis(&config.simulation.toggle_at_ms),
            indicator,
            frame_time: Duration::from_secs_f64(1.0 / f64::from(frame_rate)),
            // Unvalidated lengths that do not fit a Duration play nothing.
            length: Duration::try_from_secs_f32(config.simulation.seconds)
                .unwrap_or(Duration::ZERO),
            elapsed: Duration::ZERO,
            toggles: 0,
            seen_revision: 0,
            environment_changes: 0,
        }
    }

    /// Play the intro sunrise, then run frames until the session length is
    /// covered.
    pub fn run(&mut self) -> SessionSummary {
        info!(
            seconds = self.length.as_secs_f32(),
            toggles = self.script.len(),
            "session started"
        );
        self.orchestrator.enter(TransitionState::Day);

        while self.elapsed < self.length {
            self.frame(self.frame_time);
        }

        let summary = self.summary();
        info!(
            frames = summary.frames,
            transitions = summary.transitions,
            unplayed_toggles = summary.unplayed_toggles,
            displayed = ?summary.displayed,
            settled = ?summary.settled,
            elevation = summary.parameters.elevation,
            still_moving = self.orchestrator.is_transitioning()
                || self.orchestrator.active_tweens() > 0,
            "session finished"
        );
        summary
    }

    /// Timer steps first, each preceded by any switch presses due at its
    /// start, then one render.
    pub fn frame(&mut self, frame_time: Duration) {
        let tick = self.clock.advance(frame_time);
        let mut timer_now = self.clock.total_sim_time() - tick.step * tick.updates;
        for _ in 0..tick.updates {
            for _ in 0..self.script.take_due(timer_now) {
                let mode = self.orchestrator.toggle();
                self.toggles += 1;
                info!(at_ms = timer_now.as_millis() as u64, ?mode, "switch pressed");
            }
            self.orchestrator.update_timers(tick.step);
            timer_now += tick.step;
        }

        let revision = self.orchestrator.parameter_revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.environment_changes += 1;
            let params = self.orchestrator.parameters();
            debug!(
                revision,
                gate_open = self.orchestrator.gate_open(),
                elevation = params.elevation,
                azimuth = params.azimuth,
                scatter = params.scatter_count,
                "environment changed"
            );
        }
        self.driver.frame(tick.frame_time, &mut self.orchestrator);
        self.elapsed += tick.frame_time;
    }

    pub fn orchestrator(&self) -> &Orchestrator<SkyEnvironment> {
        &self.orchestrator
    }

    pub fn summary(&self) -> SessionSummary {
        let sky = self.orchestrator.binding();
        SessionSummary {
            elapsed: self.elapsed,
            frames: self.driver.frames(),
            timer_steps: self.clock.update_count(),
            toggles: self.toggles,
            unplayed_toggles: self.script.remaining(),
            transitions: self.orchestrator.transitions_started(),
            environment_changes: self.environment_changes,
            displayed: self.orchestrator.displayed_mode(),
            settled: self.orchestrator.settled_state(),
            indicator: self.indicator.shown(),
            parameters: *self.orchestrator.parameters(),
            camera: self.driver.sink().last_camera,
            environment_bakes: sky.generation(),
            live_maps: sky.live_maps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seconds: f32, toggles: &[u64]) -> Config {
        let mut config = Config::default();
        config.simulation.seconds = seconds;
        config.simulation.toggle_at_ms = toggles.to_vec();
        config
    }

    #[test]
    fn test_intro_sunrise_settles_on_day() {
        let summary = Session::new(&config(6.0, &[])).run();
        assert_eq!(summary.displayed, TransitionState::Day);
        assert_eq!(summary.settled, Some(TransitionState::Day));
        assert_eq!(summary.indicator, Some(TransitionState::Day));
        assert!((summary.parameters.elevation - 2.0).abs() < 1e-5);
        assert_eq!(summary.camera, Some(Vec3::new(0.0, 30.0, 100.0)));
        assert_eq!(summary.transitions, 1);
        assert_eq!(summary.live_maps, 1);
    }

    #[test]
    fn test_night_toggle_brings_up_the_moon() {
        let summary = Session::new(&config(12.0, &[3000])).run();
        assert_eq!(summary.toggles, 1);
        assert_eq!(summary.displayed, TransitionState::Night);
        assert_eq!(summary.settled, Some(TransitionState::Night));
        assert!((summary.parameters.elevation - 7.0).abs() < 1e-5);
        assert_eq!(summary.parameters.azimuth, -45.0);
        assert_eq!(summary.camera, Some(Vec3::new(100.0, 50.0, -100.0)));
        assert_eq!(summary.indicator, Some(TransitionState::Night));
    }

    #[test]
    fn test_stars_follow_the_switch() {
        let mut session = Session::new(&config(0.0, &[100]));
        session.run();
        // Intro sunrise hides the stars.
        assert_eq!(session.orchestrator().scene().visible_layers(), 0);
        for _ in 0..20 {
            session.frame(Duration::from_millis(16));
        }
        assert_eq!(session.orchestrator().scene().visible_layers(), 2);
    }

    #[test]
    fn test_rapid_double_press_returns_to_day() {
        let summary = Session::new(&config(10.0, &[3000, 3100])).run();
        assert_eq!(summary.toggles, 2);
        assert_eq!(summary.displayed, TransitionState::Day);
        assert_eq!(summary.settled, Some(TransitionState::Day));
        assert!((summary.parameters.elevation - 2.0).abs() < 1e-5);
        assert_eq!(summary.live_maps, 1);
    }

    #[test]
    fn test_environment_changes_stop_once_settled() {
        let mut session = Session::new(&config(6.0, &[]));
        let summary = session.run();
        assert!(summary.environment_changes > 0);
        assert!(summary.environment_changes <= summary.frames);

        for _ in 0..60 {
            session.frame(Duration::from_millis(16));
        }
        assert_eq!(session.summary().environment_changes, summary.environment_changes);
    }

    #[test]
    fn test_presses_after_the_end_are_reported() {
        let summary = Session::new(&config(1.0, &[500, 5000, 9000])).run();
        assert_eq!(summary.toggles, 1);
        assert_eq!(summary.unplayed_toggles, 2);
    }

    #[test]
    fn test_unrepresentable_length_plays_nothing() {
        for seconds in [f32::INFINITY, f32::NAN, 1.0e30] {
            let config = config(seconds, &[]);
            assert!(config.validate().is_err());
            let summary = Session::new(&config).run();
            assert_eq!(summary.frames, 0);
            assert_eq!(summary.transitions, 1);
        }
    }

    #[test]
    fn test_frame_and_timer_counts() {
        let mut config = config(1.0, &[]);
        config.simulation.frame_rate = 50;
        config.simulation.timer_step_ms = 5;
        let summary = Session::new(&config).run();
        assert_eq!(summary.frames, 50);
        assert_eq!(summary.timer_steps, 200);
        assert!(summary.elapsed >= Duration::from_secs(1));
    }
}
