//! Global configuration constants and the vehicle parameter bundle.

use serde::{Deserialize, Serialize};

use crate::{
    core::params::ChassisParams,
    dynamics::{
        aero::AeroParams, brakes::BrakeParams, steering::SteeringParams,
        suspension::SuspensionParams,
    },
    error::{ConfigError, Result},
    powertrain::{drivetrain::DrivetrainParams, engine::EngineParams, gearbox::GearboxParams},
};

/// Magnitude of gravitational acceleration (m/s²).
pub const DEFAULT_GRAVITY: f32 = 9.81;

/// Default fixed simulation tick (in seconds), 120 Hz.
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 120.0;

/// Throttle above which the clutch holds the engine at its lock RPM.
pub const CLUTCH_THROTTLE_DEADZONE: f32 = 0.01;

/// Throttle above which engine torque reaches the drivetrain.
pub const THROTTLE_DRIVE_THRESHOLD: f32 = 0.2;

/// Pedal value at or above which no braking is requested.
pub const BRAKE_RELEASE_THRESHOLD: f32 = 0.05;

/// Steering input magnitude treated as "no input".
pub const STEER_DEADZONE: f32 = 0.03;

/// Reverse request above which an automatic gearbox engages reverse.
pub const REVERSE_REQUEST_THRESHOLD: f32 = 0.1;

/// Handbrake input above which the rear brakes are overridden.
pub const HANDBRAKE_THRESHOLD: f32 = 0.1;

/// Substitute for a zero wheel RPM in the gear selector.
pub const GEAR_SELECT_MIN_WHEEL_RPM: f32 = 0.1;

/// Substitute for a zero no-slip wheel RPM.
pub const NO_SLIP_MIN_WHEEL_RPM: f32 = 0.01;

/// Margin applied on top of the engine-limited wheel RPM ceiling.
pub const WHEEL_RPM_LIMIT_MARGIN: f32 = 1.01;

/// Complete immutable parameter bundle for one vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub time_step: f32,
    pub gravity: f32,
    pub chassis: ChassisParams,
    pub engine: EngineParams,
    pub gearbox: GearboxParams,
    pub drivetrain: DrivetrainParams,
    pub suspension: SuspensionParams,
    pub steering: SteeringParams,
    pub aero: AeroParams,
    pub brakes: BrakeParams,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            gravity: DEFAULT_GRAVITY,
            chassis: ChassisParams::default(),
            engine: EngineParams::default(),
            gearbox: GearboxParams::default(),
            drivetrain: DrivetrainParams::default(),
            suspension: SuspensionParams::default(),
            steering: SteeringParams::default(),
            aero: AeroParams::default(),
            brakes: BrakeParams::default(),
        }
    }
}

impl VehicleConfig {
    /// Parses a TOML document. Missing tables and keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: VehicleConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects bundles the core cannot build from. Degenerate values the
    /// models tolerate (unordered gear tables, zero slip limits) pass.
    pub fn validate(&self) -> Result<()> {
        if !(self.time_step > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        if !(self.chassis.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.chassis.mass));
        }
        if !(self.steering.high_speed > 0.0) {
            return Err(ConfigError::InvalidSteeringSpeed(self.steering.high_speed));
        }
        self.engine.torque_curve().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = VehicleConfig::from_toml_str("").expect("defaults are valid");
        assert_eq!(config.gearbox.number_of_gears, 5);
        assert!((config.time_step - DEFAULT_TIME_STEP).abs() < 1e-9);
    }

    #[test]
    fn partial_tables_override_selected_fields() {
        let source = r#"
            time_step = 0.01

            [chassis]
            mass = 1500.0

            [gearbox]
            number_of_gears = 6
            ratios = [3.5]
        "#;
        let config = VehicleConfig::from_toml_str(source).expect("valid config");
        assert!((config.chassis.mass - 1500.0).abs() < 1e-6);
        assert_eq!(config.gearbox.number_of_gears, 6);
        assert_eq!(config.gearbox.ratios, vec![3.5]);
        assert!((config.engine.max_rpm - 6000.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_positive_mass() {
        let err = VehicleConfig::from_toml_str("[chassis]\nmass = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMass(_)));
    }

    #[test]
    fn rejects_non_positive_steering_high_speed() {
        let err = VehicleConfig::from_toml_str("[steering]\nhigh_speed = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSteeringSpeed(_)));

        let mut config = VehicleConfig::default();
        config.steering.high_speed = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSteeringSpeed(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = VehicleConfig::from_toml_str("time_step = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
