//! Powertrain models: engine torque curve, gearbox, differentials and the
//! drivetrain that combines them into per-wheel drive torque.

pub mod differential;
pub mod drivetrain;
pub mod engine;
pub mod gearbox;

pub use differential::{DifferentialModel, DifferentialOutput};
pub use drivetrain::{DriveMode, DrivetrainModel, DrivetrainParams};
pub use engine::{EngineModel, EngineParams, TorqueCurve};
pub use gearbox::{GearboxModel, GearboxParams};
