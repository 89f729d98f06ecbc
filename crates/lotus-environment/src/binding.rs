//! The seam between the transition core and whatever renders the sky.

use crate::EnvironmentParameters;

/// Recomputes derived shader/environment state from the parameters.
///
/// Called once per stepping tick of a discrete interpolator, after the
/// parameter write, at up to 50 calls per second. Implementations must not
/// grow resources per call.
pub trait EnvironmentBinding {
    fn recompute_environment(&mut self, params: &EnvironmentParameters, moon_phase: bool);
}

impl<T: EnvironmentBinding + ?Sized> EnvironmentBinding for Box<T> {
    fn recompute_environment(&mut self, params: &EnvironmentParameters, moon_phase: bool) {
        (**self).recompute_environment(params, moon_phase);
    }
}

/// Binding that only remembers what it was asked to recompute.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingBinding {
    /// Every call in order: the parameters seen and the moon flag.
    pub calls: Vec<(EnvironmentParameters, bool)>,
}

#[cfg(test)]
impl RecordingBinding {
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Calls made with the moon flag set.
    pub fn moon_calls(&self) -> usize {
        self.calls.iter().filter(|(_, moon)| *moon).count()
    }

    pub fn last(&self) -> Option<&EnvironmentParameters> {
        self.calls.last().map(|(params, _)| params)
    }
}

#[cfg(test)]
impl EnvironmentBinding for RecordingBinding {
    fn recompute_environment(&mut self, params: &EnvironmentParameters, moon_phase: bool) {
        self.calls.push((*params, moon_phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_binding_keeps_order() {
        let mut binding = RecordingBinding::default();
        let mut params = EnvironmentParameters::default();
        binding.recompute_environment(&params, false);
        params.elevation = 0.5;
        binding.recompute_environment(&params, true);

        assert_eq!(binding.len(), 2);
        assert_eq!(binding.moon_calls(), 1);
        assert_eq!(binding.last().unwrap().elevation, 0.5);
    }

    #[test]
    fn test_boxed_binding_forwards() {
        fn drive(binding: &mut impl EnvironmentBinding) {
            binding.recompute_environment(&EnvironmentParameters::default(), true);
        }
        let mut boxed = Box::new(RecordingBinding::default());
        drive(&mut boxed);
        assert_eq!(boxed.moon_calls(), 1);
    }
}
