//! Vehicle Dynamics – drivetrain and chassis control for simulated cars.
//!
//! This crate turns driver input and per-wheel contact samples into wheel
//! actuator commands and body forces once per fixed tick. Tire friction,
//! contact generation and rigid-body integration stay with the host physics
//! engine; the crate only decides what the engine, gearbox, differentials,
//! brakes, steering, suspension and aerodynamics ask for.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod powertrain;
pub mod utils;
pub mod vehicle;
pub mod world;

pub use glam::{Quat, Vec3};

pub use config::VehicleConfig;
pub use core::{
    params::{ChassisParams, VehicleParameters},
    state::{EngineState, GearboxState, SteeringState, VehicleDynamicsState},
    types::{
        Axle, ChassisState, DriverInput, Transform, Velocity, WheelContactSample, WheelIndex,
        WheelMap,
    },
};
pub use dynamics::{
    aero::{AeroModel, AeroParams},
    brakes::{BrakeModel, BrakeParams},
    forces::{ChassisForce, ChassisForces, ForceContext, ForceGenerator, ForceKind, ForceRegistry},
    steering::{SteeringModel, SteeringParams},
    suspension::{SuspensionModel, SuspensionParams},
};
pub use error::{ConfigError, Result};
pub use powertrain::{
    differential::{DifferentialModel, DifferentialOutput},
    drivetrain::{DriveMode, DrivetrainModel, DrivetrainParams},
    engine::{EngineModel, EngineParams, TorqueCurve},
    gearbox::{GearboxModel, GearboxParams},
};
pub use utils::allocator::{Arena, VehicleId};
pub use vehicle::{Telemetry, TickOutput, Vehicle, WheelActuation};
pub use world::VehicleWorld;

/// High-level convenience wrapper that owns a [`VehicleWorld`].
pub struct DynamicsEngine {
    world: VehicleWorld,
}

impl DynamicsEngine {
    /// Creates a new engine with the provided fixed tick length.
    pub fn new(time_step: f32) -> Self {
        Self {
            world: VehicleWorld::new(time_step),
        }
    }

    /// Builds a vehicle from `config` and returns its [`VehicleId`].
    pub fn add_vehicle(&mut self, config: VehicleConfig) -> Result<VehicleId> {
        self.world.spawn(config)
    }

    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        self.world.remove_vehicle(id)
    }

    /// Stores this tick's samples for a vehicle. Returns false for a stale id.
    pub fn feed(
        &mut self,
        id: VehicleId,
        input: Option<DriverInput>,
        chassis: ChassisState,
        contacts: WheelMap<WheelContactSample>,
    ) -> bool {
        self.world.set_input(id, input)
            && self.world.set_chassis(id, chassis)
            && self.world.set_contacts(id, contacts)
    }

    /// Advances the simulation by the provided delta time.
    pub fn step(&mut self, dt: f32) -> usize {
        self.world.advance(dt)
    }

    /// Enables or disables parallel stepping of the fleet.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.world.set_parallel_enabled(enabled);
    }

    /// Returns whether the engine is currently using parallel execution.
    pub fn parallel_enabled(&self) -> bool {
        self.world.parallel_enabled()
    }

    /// Output of the vehicle's most recent tick.
    pub fn output(&self, id: VehicleId) -> Option<&TickOutput> {
        self.world.output(id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.world.vehicle(id)
    }

    pub fn world(&self) -> &VehicleWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut VehicleWorld {
        &mut self.world
    }
}
