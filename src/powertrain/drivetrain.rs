use serde::{Deserialize, Serialize};

use crate::{
    core::types::{Axle, WheelContactSample, WheelIndex, WheelMap},
    powertrain::differential::DifferentialModel,
};

/// Which axles receive engine torque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DriveMode {
    Front,
    #[default]
    Rear,
    AllWheel,
}

impl DriveMode {
    pub fn drives(self, axle: Axle) -> bool {
        match self {
            DriveMode::Front => axle == Axle::Front,
            DriveMode::Rear => axle == Axle::Rear,
            DriveMode::AllWheel => true,
        }
    }

    /// Fraction of gearbox torque sent to `axle`.
    pub fn axle_share(self, axle: Axle, front_torque_bias: f32) -> f32 {
        match (self, axle) {
            (DriveMode::AllWheel, Axle::Front) => front_torque_bias,
            (DriveMode::AllWheel, Axle::Rear) => 1.0 - front_torque_bias,
            _ if self.drives(axle) => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainParams {
    pub drive_mode: DriveMode,
    /// Front share of torque in all-wheel drive.
    pub front_torque_bias: f32,
    pub front_differential: DifferentialModel,
    pub rear_differential: DifferentialModel,
}

impl Default for DrivetrainParams {
    fn default() -> Self {
        Self {
            drive_mode: DriveMode::Rear,
            front_torque_bias: 0.4,
            front_differential: DifferentialModel::default(),
            rear_differential: DifferentialModel::default(),
        }
    }
}

/// Routes gearbox output through the differentials to the driven wheels.
#[derive(Debug, Clone)]
pub struct DrivetrainModel {
    drive_mode: DriveMode,
    front_torque_bias: f32,
    front_differential: DifferentialModel,
    rear_differential: DifferentialModel,
    driven_wheels: Vec<WheelIndex>,
}

impl DrivetrainModel {
    pub fn new(params: &DrivetrainParams) -> Self {
        let driven_wheels = [Axle::Rear, Axle::Front]
            .into_iter()
            .filter(|&axle| params.drive_mode.drives(axle))
            .flat_map(|axle| {
                let (left, right) = axle.wheels();
                [left, right]
            })
            .collect();

        Self {
            drive_mode: params.drive_mode,
            front_torque_bias: params.front_torque_bias,
            front_differential: params.front_differential,
            rear_differential: params.rear_differential,
            driven_wheels,
        }
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    /// Driven wheels, rear axle first.
    pub fn driven_wheels(&self) -> &[WheelIndex] {
        &self.driven_wheels
    }

    pub fn differential(&self, axle: Axle) -> &DifferentialModel {
        match axle {
            Axle::Front => &self.front_differential,
            Axle::Rear => &self.rear_differential,
        }
    }

    /// Drive torque per wheel using the configured drive mode and bias.
    pub fn wheel_torques(
        &self,
        engine_torque: f32,
        total_ratio: f32,
        contacts: &WheelMap<WheelContactSample>,
    ) -> WheelMap<f32> {
        self.wheel_torques_with(
            engine_torque,
            total_ratio,
            contacts,
            self.drive_mode,
            self.front_torque_bias,
        )
    }

    /// Drive torque per wheel for an explicit drive mode and front bias.
    /// Non-driven wheels receive zero.
    pub fn wheel_torques_with(
        &self,
        engine_torque: f32,
        total_ratio: f32,
        contacts: &WheelMap<WheelContactSample>,
        drive_mode: DriveMode,
        front_torque_bias: f32,
    ) -> WheelMap<f32> {
        let gearbox_torque = engine_torque * total_ratio;
        let mut torques = WheelMap::splat(0.0);

        for axle in Axle::ALL {
            if !drive_mode.drives(axle) {
                continue;
            }
            let axle_torque = gearbox_torque * drive_mode.axle_share(axle, front_torque_bias);
            let (left_sample, right_sample) = contacts.axle(axle);
            let output = self.differential(axle).output(
                left_sample.forward_slip.abs(),
                right_sample.forward_slip.abs(),
                axle_torque,
            );

            let (left, right) = axle.wheels();
            torques[left] = output.left;
            torques[right] = output.right;
        }

        torques
    }
}
