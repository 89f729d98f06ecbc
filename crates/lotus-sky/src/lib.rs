//! Sky and water state derived from the environment parameters.
//!
//! [`SkyEnvironment`] is the renderer-side [`EnvironmentBinding`]: every
//! recompute refreshes the sky uniforms, points the water at the sun, and
//! re-bakes the environment map used for scene reflections.
//!
//! [`EnvironmentBinding`]: lotus_environment::EnvironmentBinding

mod environment;
mod environment_map;
mod sun;
mod uniforms;

pub use environment::SkyEnvironment;
pub use environment_map::{EnvironmentMap, EnvironmentMapSlot, cube_face_direction};
pub use sun::sun_position;
pub use uniforms::{SkyUniform, SkyUniforms, WaterUniform, WaterUniforms};
