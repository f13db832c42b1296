use serde::{Deserialize, Serialize};

use crate::{
    config::BRAKE_RELEASE_THRESHOLD,
    core::types::{Axle, WheelIndex, WheelMap},
};

/// Handbrake torque as a multiple of the rear service-brake maximum.
pub const HANDBRAKE_MULTIPLIER: f32 = 2.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakeParams {
    /// Target deceleration at full pedal, in g.
    pub max_deceleration: f32,
    /// Share of braking force on the front axle.
    pub front_bias: f32,
}

impl Default for BrakeParams {
    fn default() -> Self {
        Self {
            max_deceleration: 0.9,
            front_bias: 0.6,
        }
    }
}

/// Front/rear service brakes and the rear handbrake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrakeModel {
    max_torque_front: f32,
    max_torque_rear: f32,
}

impl BrakeModel {
    pub fn new(
        params: &BrakeParams,
        mass: f32,
        gravity: f32,
        rolling_radius_front: f32,
        rolling_radius_rear: f32,
    ) -> Self {
        let max_force = params.max_deceleration * gravity * mass;
        let force_front = max_force * params.front_bias / 2.0;
        let force_rear = max_force * (1.0 - params.front_bias) / 2.0;
        Self {
            max_torque_front: force_front * rolling_radius_front,
            max_torque_rear: force_rear * rolling_radius_rear,
        }
    }

    /// Per-wheel maximum service-brake torque for `axle`.
    pub fn max_torque(&self, axle: Axle) -> f32 {
        match axle {
            Axle::Front => self.max_torque_front,
            Axle::Rear => self.max_torque_rear,
        }
    }

    /// Brake torque per wheel for the combined throttle/brake `pedal` axis.
    /// Braking is requested by values below the release threshold and
    /// scales with the pedal's magnitude.
    pub fn brake_torques(&self, pedal: f32) -> WheelMap<f32> {
        if pedal >= BRAKE_RELEASE_THRESHOLD {
            return WheelMap::splat(0.0);
        }
        WheelMap::from_fn(|wheel| self.max_torque(wheel.axle()) * pedal.abs())
    }

    /// Overrides both rear wheels with the handbrake torque.
    pub fn apply_handbrake(&self, mut torques: WheelMap<f32>) -> WheelMap<f32> {
        let handbrake = HANDBRAKE_MULTIPLIER * self.max_torque_rear;
        torques[WheelIndex::RearLeft] = handbrake;
        torques[WheelIndex::RearRight] = handbrake;
        torques
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> BrakeModel {
        BrakeModel::new(&BrakeParams::default(), 1200.0, 9.81, 0.325, 0.325)
    }

    #[test]
    fn maxima_follow_bias_and_radius() {
        let brakes = model();
        let force = 0.9 * 9.81 * 1200.0;
        assert_relative_eq!(brakes.max_torque(Axle::Front), force * 0.6 / 2.0 * 0.325, max_relative = 1e-5);
        assert_relative_eq!(brakes.max_torque(Axle::Rear), force * 0.4 / 2.0 * 0.325, max_relative = 1e-5);
    }

    #[test]
    fn no_braking_on_throttle() {
        let brakes = model();
        assert_eq!(brakes.brake_torques(0.05), WheelMap::splat(0.0));
        assert_eq!(brakes.brake_torques(1.0), WheelMap::splat(0.0));
    }

    #[test]
    fn full_pedal_reaches_maxima() {
        let brakes = model();
        let torques = brakes.brake_torques(-1.0);
        assert_eq!(torques[WheelIndex::FrontLeft], brakes.max_torque(Axle::Front));
        assert_eq!(torques[WheelIndex::FrontRight], brakes.max_torque(Axle::Front));
        assert_eq!(torques[WheelIndex::RearLeft], brakes.max_torque(Axle::Rear));
        assert_eq!(torques[WheelIndex::RearRight], brakes.max_torque(Axle::Rear));

        let half = brakes.brake_torques(-0.5);
        assert_relative_eq!(half[WheelIndex::FrontLeft], 0.5 * brakes.max_torque(Axle::Front));
    }

    #[test]
    fn handbrake_overrides_rear_only() {
        let brakes = model();
        let torques = brakes.apply_handbrake(brakes.brake_torques(-0.3));
        let rear = 2.0 * brakes.max_torque(Axle::Rear);
        assert_eq!(torques[WheelIndex::RearLeft], rear);
        assert_eq!(torques[WheelIndex::RearRight], rear);
        assert_relative_eq!(torques[WheelIndex::FrontLeft], 0.3 * brakes.max_torque(Axle::Front));

        let released = brakes.apply_handbrake(brakes.brake_torques(0.8));
        assert_eq!(released[WheelIndex::RearLeft], rear);
        assert_eq!(released[WheelIndex::FrontLeft], 0.0);
    }
}
