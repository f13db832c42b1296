use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::{
    config::NO_SLIP_MIN_WHEEL_RPM,
    core::{
        params::VehicleParameters,
        types::{Axle, ChassisState, WheelMap},
    },
    dynamics::forces::{ChassisForces, ForceContext, ForceGenerator, ForceKind},
};

/// Suspension geometry and tuning as configured. Distances in metres,
/// stiffness in N/m, damping in N·s/m.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspensionParams {
    pub travel_range_front: f32,
    pub travel_range_rear: f32,
    pub stiffness_front: f32,
    pub stiffness_rear: f32,
    pub damper_front: f32,
    pub damper_rear: f32,
    /// Anti-roll bar effectiveness, scales the spring rate.
    pub anti_roll_front: f32,
    pub anti_roll_rear: f32,
    /// Spring target position as a fraction of travel.
    pub target_position_front: f32,
    pub target_position_rear: f32,
    pub front_bumper_to_front_axle: f32,
    pub front_bumper_to_rear_axle: f32,
    pub track_front: f32,
    pub track_rear: f32,
    pub rolling_radius_front: f32,
    pub rolling_radius_rear: f32,
    pub tyre_radius_front: f32,
    pub tyre_radius_rear: f32,
    pub unsprung_mass_front: f32,
    pub unsprung_mass_rear: f32,
}

impl Default for SuspensionParams {
    fn default() -> Self {
        Self {
            travel_range_front: 0.30,
            travel_range_rear: 0.30,
            stiffness_front: 50_000.0,
            stiffness_rear: 50_000.0,
            damper_front: 1600.0,
            damper_rear: 1600.0,
            anti_roll_front: 1.0,
            anti_roll_rear: 1.0,
            target_position_front: 0.5,
            target_position_rear: 0.5,
            front_bumper_to_front_axle: 1.0,
            front_bumper_to_rear_axle: 4.0,
            track_front: 1.6,
            track_rear: 1.6,
            rolling_radius_front: 0.325,
            rolling_radius_rear: 0.325,
            tyre_radius_front: 0.335,
            tyre_radius_rear: 0.335,
            unsprung_mass_front: 20.0,
            unsprung_mass_rear: 20.0,
        }
    }
}

impl SuspensionParams {
    pub fn wheelbase(&self) -> f32 {
        self.front_bumper_to_rear_axle - self.front_bumper_to_front_axle
    }
}

/// Spring setup for one axle, handed to the external wheel simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSetup {
    pub stiffness: f32,
    pub damper: f32,
    pub target_position: f32,
    pub travel_range: f32,
    pub unsprung_mass: f32,
    pub rolling_radius: f32,
    /// Vertical offset of the wheel centre so the spring rests at its target.
    pub center_offset: f32,
    /// Tyre radius minus rolling radius, the flat-spot correction.
    pub tyre_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxleTuning {
    anti_roll: f32,
    stiffness: f32,
    track: f32,
    spring: SpringSetup,
}

impl AxleTuning {
    fn front(params: &SuspensionParams) -> Self {
        Self {
            anti_roll: params.anti_roll_front,
            stiffness: params.stiffness_front,
            track: params.track_front,
            spring: SpringSetup {
                stiffness: params.stiffness_front,
                damper: params.damper_front,
                target_position: params.target_position_front,
                travel_range: params.travel_range_front,
                unsprung_mass: params.unsprung_mass_front,
                rolling_radius: params.rolling_radius_front,
                center_offset: params.travel_range_front * (1.0 - params.target_position_front),
                tyre_offset: params.tyre_radius_front - params.rolling_radius_front,
            },
        }
    }

    fn rear(params: &SuspensionParams) -> Self {
        Self {
            anti_roll: params.anti_roll_rear,
            stiffness: params.stiffness_rear,
            track: params.track_rear,
            spring: SpringSetup {
                stiffness: params.stiffness_rear,
                damper: params.damper_rear,
                target_position: params.target_position_rear,
                travel_range: params.travel_range_rear,
                unsprung_mass: params.unsprung_mass_rear,
                rolling_radius: params.rolling_radius_rear,
                center_offset: params.travel_range_rear * (1.0 - params.target_position_rear),
                tyre_offset: params.tyre_radius_rear - params.rolling_radius_rear,
            },
        }
    }
}

/// Static load distribution, wheel placement and anti-roll load transfer.
#[derive(Debug, Clone)]
pub struct SuspensionModel {
    front: AxleTuning,
    rear: AxleTuning,
    wheelbase: f32,
    static_loads: WheelMap<f32>,
    wheel_positions: WheelMap<Vec3>,
}

impl SuspensionModel {
    pub fn new(params: &SuspensionParams, vehicle: &VehicleParameters, gravity: f32) -> Self {
        let wheelbase = params.wheelbase();
        if wheelbase <= 0.0 {
            warn!("non-positive wheelbase {wheelbase}, static loads are undefined");
        }

        Self {
            front: AxleTuning::front(params),
            rear: AxleTuning::rear(params),
            wheelbase,
            static_loads: static_corner_loads(params, vehicle, gravity),
            wheel_positions: wheel_mount_positions(params),
        }
    }

    pub fn wheelbase(&self) -> f32 {
        self.wheelbase
    }

    pub fn track(&self, axle: Axle) -> f32 {
        self.tuning(axle).track
    }

    /// Corner loads in newtons, computed once at construction.
    pub fn static_loads(&self) -> &WheelMap<f32> {
        &self.static_loads
    }

    /// Wheel mount points in the body frame.
    pub fn wheel_positions(&self) -> &WheelMap<Vec3> {
        &self.wheel_positions
    }

    pub fn spring_setup(&self, axle: Axle) -> &SpringSetup {
        &self.tuning(axle).spring
    }

    pub fn rolling_radius(&self, axle: Axle) -> f32 {
        self.tuning(axle).spring.rolling_radius
    }

    /// Wheel RPM for rolling without slip at `velocity` (m/s) on the rear
    /// rolling radius. Never exactly zero.
    pub fn no_slip_wheel_rpm(&self, velocity: f32) -> f32 {
        let rpm = velocity / (TAU * self.rear.spring.rolling_radius) * 60.0;
        if rpm == 0.0 {
            NO_SLIP_MIN_WHEEL_RPM
        } else {
            rpm
        }
    }

    /// Anti-roll force for the `(left, right)` wheels of `axle`, signed along
    /// the body up axis. Each wheel is pushed with the sign of its own travel.
    pub fn anti_roll_forces(&self, travel_left: f32, travel_right: f32, axle: Axle) -> (f32, f32) {
        let tuning = self.tuning(axle);
        let displacement = (travel_left - travel_right).abs();
        let transfer = displacement * tuning.anti_roll * tuning.stiffness / 2.0;
        (
            transfer * travel_left.signum(),
            transfer * travel_right.signum(),
        )
    }

    fn tuning(&self, axle: Axle) -> &AxleTuning {
        match axle {
            Axle::Front => &self.front,
            Axle::Rear => &self.rear,
        }
    }
}

impl ForceGenerator for SuspensionModel {
    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut ChassisForces) {
        for axle in Axle::ALL {
            let (left, right) = ctx.contacts.axle(axle);
            let (force_left, force_right) =
                self.anti_roll_forces(left.suspension_travel, right.suspension_travel, axle);

            let (left_wheel, right_wheel) = axle.wheels();
            forces.push(
                ForceKind::AntiRoll,
                ChassisState::UP * force_left,
                Some(ctx.wheel_positions[left_wheel]),
            );
            forces.push(
                ForceKind::AntiRoll,
                ChassisState::UP * force_right,
                Some(ctx.wheel_positions[right_wheel]),
            );
        }
    }
}

/// Splits the vehicle weight over the corners from the centre of gravity's
/// distance behind the front axle.
fn static_corner_loads(
    params: &SuspensionParams,
    vehicle: &VehicleParameters,
    gravity: f32,
) -> WheelMap<f32> {
    let front_axle_to_cog = vehicle.center_of_gravity.z.abs() - params.front_bumper_to_front_axle;
    let rear_fraction = front_axle_to_cog / vehicle.wheelbase;
    let half_weight = vehicle.mass / 2.0 * gravity;

    WheelMap::from_fn(|wheel| {
        if wheel.is_front() {
            (1.0 - rear_fraction) * half_weight
        } else {
            rear_fraction * half_weight
        }
    })
}

fn wheel_mount_positions(params: &SuspensionParams) -> WheelMap<Vec3> {
    WheelMap::from_fn(|wheel| {
        let (track, radius, axle_distance) = match wheel.axle() {
            Axle::Front => (
                params.track_front,
                params.rolling_radius_front,
                params.front_bumper_to_front_axle,
            ),
            Axle::Rear => (
                params.track_rear,
                params.rolling_radius_rear,
                params.front_bumper_to_rear_axle,
            ),
        };
        let x = if wheel.is_left() { -track / 2.0 } else { track / 2.0 };
        Vec3::new(x, radius, -axle_distance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{params::ChassisParams, types::WheelIndex};
    use approx::assert_relative_eq;

    fn model() -> SuspensionModel {
        let params = SuspensionParams::default();
        let vehicle = VehicleParameters::new(&ChassisParams::default(), &params);
        SuspensionModel::new(&params, &vehicle, 9.81)
    }

    #[test]
    fn static_loads_split_by_cog_position() {
        let suspension = model();
        let loads = suspension.static_loads();
        // CoG 2.5 m behind the bumper, front axle at 1.0 m, wheelbase 3.0 m.
        let half_weight = 1200.0 / 2.0 * 9.81;
        assert_relative_eq!(loads[WheelIndex::FrontLeft], 0.5 * half_weight, max_relative = 1e-5);
        assert_relative_eq!(loads[WheelIndex::RearLeft], 0.5 * half_weight, max_relative = 1e-5);
        assert_eq!(loads[WheelIndex::FrontLeft], loads[WheelIndex::FrontRight]);
        assert_eq!(loads[WheelIndex::RearLeft], loads[WheelIndex::RearRight]);
    }

    #[test]
    fn rearward_cog_loads_rear_axle() {
        let params = SuspensionParams::default();
        let chassis = ChassisParams {
            center_of_gravity: Vec3::new(0.0, 0.4, -3.1),
            ..ChassisParams::default()
        };
        let vehicle = VehicleParameters::new(&chassis, &params);
        let suspension = SuspensionModel::new(&params, &vehicle, 9.81);
        let loads = suspension.static_loads();
        assert!(loads[WheelIndex::RearLeft] > loads[WheelIndex::FrontLeft]);
        let total: f32 = WheelIndex::ALL.iter().map(|&wheel| loads[wheel]).sum();
        assert_relative_eq!(total, 1200.0 * 9.81, max_relative = 1e-5);
    }

    #[test]
    fn anti_roll_pushes_each_wheel_with_its_travel_sign() {
        let suspension = model();
        let (left, right) = suspension.anti_roll_forces(0.04, -0.02, Axle::Front);
        let expected = 0.06 * 1.0 * 50_000.0 / 2.0;
        assert_relative_eq!(left, expected, max_relative = 1e-5);
        assert_relative_eq!(right, -expected, max_relative = 1e-5);

        let (left, right) = suspension.anti_roll_forces(0.03, 0.03, Axle::Rear);
        assert_eq!((left, right), (0.0, 0.0));
    }

    #[test]
    fn axles_use_their_own_tuning() {
        let params = SuspensionParams {
            anti_roll_front: 2.0,
            stiffness_rear: 10_000.0,
            ..SuspensionParams::default()
        };
        let vehicle = VehicleParameters::new(&ChassisParams::default(), &params);
        let suspension = SuspensionModel::new(&params, &vehicle, 9.81);
        let (front, _) = suspension.anti_roll_forces(0.1, 0.0, Axle::Front);
        let (rear, _) = suspension.anti_roll_forces(0.1, 0.0, Axle::Rear);
        assert_relative_eq!(front, 0.1 * 2.0 * 50_000.0 / 2.0, max_relative = 1e-5);
        assert_relative_eq!(rear, 0.1 * 1.0 * 10_000.0 / 2.0, max_relative = 1e-5);
    }

    #[test]
    fn wheel_positions_follow_geometry() {
        let suspension = model();
        let positions = suspension.wheel_positions();
        assert_eq!(positions[WheelIndex::RearLeft], Vec3::new(-0.8, 0.325, -4.0));
        assert_eq!(positions[WheelIndex::FrontRight], Vec3::new(0.8, 0.325, -1.0));
        assert_relative_eq!(suspension.spring_setup(Axle::Front).center_offset, 0.15);
        assert_relative_eq!(suspension.spring_setup(Axle::Rear).tyre_offset, 0.01, epsilon = 1e-6);
    }

    #[test]
    fn no_slip_rpm_never_zero() {
        let suspension = model();
        assert_eq!(suspension.no_slip_wheel_rpm(0.0), NO_SLIP_MIN_WHEEL_RPM);
        let rpm = suspension.no_slip_wheel_rpm(10.0);
        assert_relative_eq!(rpm, 10.0 / (TAU * 0.325) * 60.0, max_relative = 1e-5);
        assert!(suspension.no_slip_wheel_rpm(-10.0) < 0.0);
    }
}
