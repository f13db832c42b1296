use serde::{Deserialize, Serialize};

use crate::{
    core::types::{ChassisState, WheelIndex},
    dynamics::forces::{ChassisForces, ForceContext, ForceGenerator, ForceKind},
};

/// Sea-level air density (kg/m³).
pub const DEFAULT_AIR_DENSITY: f32 = 1.292;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroParams {
    /// Frontal area (m²).
    pub frontal_area: f32,
    pub drag_coefficient: f32,
    /// Front lift coefficient, negative for downforce.
    pub lift_coefficient_front: f32,
    /// Rear lift coefficient, negative for downforce.
    pub lift_coefficient_rear: f32,
    pub air_density: f32,
}

impl Default for AeroParams {
    fn default() -> Self {
        Self {
            frontal_area: 0.7,
            drag_coefficient: 0.30,
            lift_coefficient_front: -0.05,
            lift_coefficient_rear: -0.05,
            air_density: DEFAULT_AIR_DENSITY,
        }
    }
}

/// Velocity-independent aero factors. Multiply by v² for a force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroCoefficients {
    pub drag: f32,
    /// Per wheel.
    pub lift_front: f32,
    /// Per wheel.
    pub lift_rear: f32,
}

impl AeroCoefficients {
    pub fn new(params: &AeroParams) -> Self {
        let dynamic_pressure = params.air_density * params.frontal_area * 0.5;
        Self {
            drag: params.drag_coefficient * dynamic_pressure,
            // Lift is spread over the four wheel mounts.
            lift_front: params.lift_coefficient_front * dynamic_pressure / 4.0,
            lift_rear: params.lift_coefficient_rear * dynamic_pressure / 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AeroModel {
    coefficients: AeroCoefficients,
}

impl AeroModel {
    pub fn new(params: &AeroParams) -> Self {
        Self {
            coefficients: AeroCoefficients::new(params),
        }
    }

    pub fn coefficients(&self) -> &AeroCoefficients {
        &self.coefficients
    }

    /// Signed drag along the body forward axis, always opposing `velocity`.
    pub fn drag_force(&self, velocity: f32) -> f32 {
        let drag = self.coefficients.drag * velocity * velocity;
        if velocity < 0.0 {
            drag
        } else {
            -drag
        }
    }

    /// `(front, rear)` lift per wheel along the body up axis. The coefficient
    /// sign decides lift or downforce regardless of travel direction.
    pub fn lift_forces(&self, velocity: f32) -> (f32, f32) {
        let velocity_sq = velocity * velocity;
        (
            self.coefficients.lift_front * velocity_sq,
            self.coefficients.lift_rear * velocity_sq,
        )
    }
}

impl ForceGenerator for AeroModel {
    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut ChassisForces) {
        let velocity = ctx.forward_velocity;
        forces.push(
            ForceKind::AeroDrag,
            ChassisState::FORWARD * self.drag_force(velocity),
            None,
        );

        let (front, rear) = self.lift_forces(velocity);
        for wheel in WheelIndex::ALL {
            let lift = if wheel.is_front() { front } else { rear };
            forces.push(
                ForceKind::AeroLift,
                ChassisState::UP * lift,
                Some(ctx.wheel_positions[wheel]),
            );
        }
    }
}

impl Default for AeroModel {
    fn default() -> Self {
        Self::new(&AeroParams::default())
    }
}
