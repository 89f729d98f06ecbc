use lotus_config::ConfigError;

use crate::platform::PlatformError;

/// Anything that stops the session from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_is_transparent() {
        let err = AppError::from(PlatformError::NoConfigDir);
        assert_eq!(err.to_string(), PlatformError::NoConfigDir.to_string());
    }

    #[test]
    fn test_config_error_is_prefixed() {
        let err = AppError::from(ConfigError::InvalidValue {
            field: "simulation.frame_rate",
            reason: "must be positive",
        });
        assert!(err.to_string().starts_with("invalid configuration: "));
    }
}
