//! Error types for configuration loading.
//!
//! The per-tick pipeline never fails; numeric edge cases are handled by
//! clamps and floors inside each model. Errors only arise while turning a
//! parameter bundle into a vehicle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a [`crate::VehicleConfig`].
    #[error("failed to parse vehicle config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("torque curve needs at least {required} control points, got {found}")]
    TooFewTorquePoints { required: usize, found: usize },
    #[error("torque curve rpm must be strictly increasing (point {index}: {rpm} rpm)")]
    NonIncreasingRpm { index: usize, rpm: f32 },
    #[error("torque curve rpm must be positive (point {index}: {rpm} rpm)")]
    NonPositiveRpm { index: usize, rpm: f32 },
    #[error("vehicle mass must be positive, got {0}")]
    InvalidMass(f32),
    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f32),
    #[error("steering high speed must be positive, got {0}")]
    InvalidSteeringSpeed(f32),
}

/// Convenient Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
