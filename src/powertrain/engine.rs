use serde::{Deserialize, Serialize};

use crate::{
    config::CLUTCH_THROTTLE_DEADZONE,
    core::state::EngineState,
    error::{ConfigError, Result},
};

/// Converts horsepower at a given RPM into torque in N·m.
pub const HP_TO_TORQUE: f32 = 7120.54;

/// Minimum number of control points a [`TorqueCurve`] accepts.
pub const MIN_TORQUE_POINTS: usize = 4;

/// Piecewise-linear torque-versus-RPM curve.
#[derive(Debug, Clone, PartialEq)]
pub struct TorqueCurve {
    points: Vec<(f32, f32)>,
}

impl TorqueCurve {
    /// Builds a curve from `(rpm, torque)` control points.
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self> {
        if points.len() < MIN_TORQUE_POINTS {
            return Err(ConfigError::TooFewTorquePoints {
                required: MIN_TORQUE_POINTS,
                found: points.len(),
            });
        }
        for (index, &(rpm, _)) in points.iter().enumerate() {
            if !(rpm > 0.0) {
                return Err(ConfigError::NonPositiveRpm { index, rpm });
            }
            if index > 0 && rpm <= points[index - 1].0 {
                return Err(ConfigError::NonIncreasingRpm { index, rpm });
            }
        }
        Ok(Self { points })
    }

    /// Builds a curve from `(rpm, horsepower)` design points.
    pub fn from_power_points(points: &[(f32, f32)]) -> Result<Self> {
        let torque_points = points
            .iter()
            .map(|&(rpm, power)| (rpm, power_to_torque(power, rpm)))
            .collect();
        Self::new(torque_points)
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Zero below the first point, linear between points, flat at the last
    /// point's torque from there on.
    pub fn torque_at(&self, rpm: f32) -> f32 {
        let (first_rpm, _) = self.points[0];
        if rpm < first_rpm {
            return 0.0;
        }

        for window in self.points.windows(2) {
            let (rpm_a, torque_a) = window[0];
            let (rpm_b, torque_b) = window[1];
            if rpm < rpm_b {
                let t = (rpm - rpm_a) / (rpm_b - rpm_a);
                return torque_a + (torque_b - torque_a) * t;
            }
        }

        self.points[self.points.len() - 1].1
    }
}

pub fn power_to_torque(power: f32, rpm: f32) -> f32 {
    power * HP_TO_TORQUE / rpm
}

/// Engine design points as configured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    pub idle_rpm: f32,
    pub idle_power: f32,
    pub low_power_band_rpm: f32,
    pub low_power_band_power: f32,
    pub max_power_rpm: f32,
    pub max_power: f32,
    pub max_rpm: f32,
    pub max_rpm_power: f32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            idle_rpm: 800.0,
            idle_power: 10.0,
            low_power_band_rpm: 2500.0,
            low_power_band_power: 50.0,
            max_power_rpm: 5500.0,
            max_power: 120.0,
            max_rpm: 6000.0,
            max_rpm_power: 100.0,
        }
    }
}

impl EngineParams {
    pub fn torque_curve(&self) -> Result<TorqueCurve> {
        TorqueCurve::from_power_points(&[
            (self.idle_rpm, self.idle_power),
            (self.low_power_band_rpm, self.low_power_band_power),
            (self.max_power_rpm, self.max_power),
            (self.max_rpm, self.max_rpm_power),
        ])
    }
}

/// Engine speed and torque model.
#[derive(Debug, Clone)]
pub struct EngineModel {
    curve: TorqueCurve,
    idle_rpm: f32,
    max_rpm: f32,
    max_power_rpm: f32,
}

impl EngineModel {
    pub fn new(params: &EngineParams) -> Result<Self> {
        Ok(Self {
            curve: params.torque_curve()?,
            idle_rpm: params.idle_rpm,
            max_rpm: params.max_rpm,
            max_power_rpm: params.max_power_rpm,
        })
    }

    pub fn curve(&self) -> &TorqueCurve {
        &self.curve
    }

    pub fn idle_rpm(&self) -> f32 {
        self.idle_rpm
    }

    pub fn max_rpm(&self) -> f32 {
        self.max_rpm
    }

    /// RPM at peak power, the target the automatic gearbox shifts around.
    pub fn max_power_rpm(&self) -> f32 {
        self.max_power_rpm
    }

    /// Derives engine RPM from wheel speed through the gearing.
    ///
    /// A reverse gear carries a negative ratio, so a wheel turning backwards
    /// still yields a non-negative engine speed. While the clutch is slipping
    /// under throttle the engine is held at `clutch_lock_rpm`, which may be
    /// below idle; otherwise the result is kept within idle and max RPM.
    pub fn update_rpm(
        &self,
        state: &mut EngineState,
        wheel_rpm: f32,
        throttle: f32,
        gear_ratio: f32,
        clutch_lock_rpm: f32,
    ) {
        let rpm = wheel_rpm * gear_ratio;
        state.rpm = if rpm < clutch_lock_rpm && throttle > CLUTCH_THROTTLE_DEADZONE {
            clutch_lock_rpm
        } else {
            rpm.clamp(self.idle_rpm, self.max_rpm.max(self.idle_rpm))
        };
    }

    /// Full-throttle torque available at the current RPM.
    pub fn max_torque(&self, state: &EngineState) -> f32 {
        self.curve.torque_at(state.rpm)
    }
}
