//! Core types shared by every model: wheel addressing, external samples,
//! per-vehicle parameters and persistent state.

pub mod params;
pub mod state;
pub mod types;

pub use params::{ChassisParams, VehicleParameters};
pub use state::{EngineState, GearboxState, SteeringState, VehicleDynamicsState};
pub use types::{
    Axle, ChassisState, DriverInput, Transform, Velocity, WheelContactSample, WheelIndex,
    WheelMap,
};
