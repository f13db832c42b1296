use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::dynamics::suspension::SuspensionParams;

/// Rigid-body properties of the chassis as configured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChassisParams {
    /// Mass in kilograms.
    pub mass: f32,
    /// Centre of gravity in body coordinates. `z` is measured backwards from
    /// the front bumper, so it is normally negative.
    pub center_of_gravity: Vec3,
    /// Principal moments of inertia (kg·m²).
    pub inertia: Vec3,
}

impl Default for ChassisParams {
    fn default() -> Self {
        Self {
            mass: 1200.0,
            center_of_gravity: Vec3::new(0.0, 0.435, -2.5),
            inertia: Vec3::new(3600.0, 3900.0, 800.0),
        }
    }
}

/// Static per-vehicle quantities shared by several models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParameters {
    pub mass: f32,
    pub center_of_gravity: Vec3,
    pub inertia: Vec3,
    pub wheelbase: f32,
    pub track_front: f32,
    pub track_rear: f32,
}

impl VehicleParameters {
    pub fn new(chassis: &ChassisParams, suspension: &SuspensionParams) -> Self {
        Self {
            mass: chassis.mass,
            center_of_gravity: chassis.center_of_gravity,
            inertia: chassis.inertia,
            wheelbase: suspension.wheelbase(),
            track_front: suspension.track_front,
            track_rear: suspension.track_rear,
        }
    }
}
