//! Chassis-side models: aerodynamics, suspension load transfer, steering and
//! brakes, plus the force plumbing handed to the external rigid-body solver.

pub mod aero;
pub mod brakes;
pub mod forces;
pub mod steering;
pub mod suspension;

pub use aero::{AeroCoefficients, AeroModel, AeroParams};
pub use brakes::{BrakeModel, BrakeParams};
pub use forces::{
    ChassisForce, ChassisForces, ForceContext, ForceGenerator, ForceKind, ForceRegistry,
};
pub use steering::{ackermann_angle, SteeringModel, SteeringParams};
pub use suspension::{SpringSetup, SuspensionModel, SuspensionParams};
