use log::{debug, warn};

use crate::{
    config::{
        VehicleConfig, HANDBRAKE_THRESHOLD, REVERSE_REQUEST_THRESHOLD, THROTTLE_DRIVE_THRESHOLD,
        WHEEL_RPM_LIMIT_MARGIN,
    },
    core::{
        params::VehicleParameters,
        state::{EngineState, VehicleDynamicsState},
        types::{Axle, ChassisState, DriverInput, WheelContactSample, WheelIndex, WheelMap},
    },
    dynamics::{
        aero::AeroModel,
        brakes::BrakeModel,
        forces::{ChassisForces, ForceContext, ForceGenerator, ForceRegistry},
        steering::SteeringModel,
        suspension::SuspensionModel,
    },
    error::Result,
    powertrain::{drivetrain::DrivetrainModel, engine::EngineModel, gearbox::GearboxModel},
    utils::logging::ScopedTimer,
};

/// Commands for one wheel's actuator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelActuation {
    pub drive_torque: f32,
    /// Always non-negative.
    pub brake_torque: f32,
    /// Target steer angle in degrees, front wheels only.
    pub steer_angle: Option<f32>,
}

/// Values observed during a tick, for HUDs and logging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telemetry {
    pub forward_velocity: f32,
    pub engine_rpm: f32,
    /// Engine torque after the throttle gate.
    pub engine_torque: f32,
    pub gear: usize,
    pub total_ratio: f32,
    pub wheel_rpm_limit: f32,
    pub steer_angle: f32,
}

/// Everything a tick hands back to the simulation host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutput {
    pub wheels: WheelMap<WheelActuation>,
    /// Body-frame forces for the rigid-body solver.
    pub forces: ChassisForces,
    pub telemetry: Telemetry,
}

/// One vehicle: the models built from its configuration plus the state it
/// carries between ticks. Each [`Vehicle::tick`] runs the models in a fixed
/// order.
pub struct Vehicle {
    config: VehicleConfig,
    parameters: VehicleParameters,
    engine: EngineModel,
    gearbox: GearboxModel,
    drivetrain: DrivetrainModel,
    suspension: SuspensionModel,
    steering: SteeringModel,
    aero: AeroModel,
    brakes: BrakeModel,
    extra_forces: ForceRegistry,
    state: VehicleDynamicsState,
    shift_latch: ShiftLatch,
}

/// Shift flags seen on the previous tick. A shift fires on the rising edge.
#[derive(Debug, Clone, Copy, Default)]
struct ShiftLatch {
    up: bool,
    down: bool,
}

impl Vehicle {
    pub fn new(config: VehicleConfig) -> Result<Self> {
        config.validate()?;

        let parameters = VehicleParameters::new(&config.chassis, &config.suspension);
        let suspension = SuspensionModel::new(&config.suspension, &parameters, config.gravity);
        let brakes = BrakeModel::new(
            &config.brakes,
            parameters.mass,
            config.gravity,
            suspension.rolling_radius(Axle::Front),
            suspension.rolling_radius(Axle::Rear),
        );
        let engine = EngineModel::new(&config.engine)?;
        let gearbox = GearboxModel::new(&config.gearbox);

        let state = VehicleDynamicsState {
            engine: EngineState {
                rpm: engine.idle_rpm(),
            },
            ..VehicleDynamicsState::default()
        };

        debug!(
            "vehicle built: {} kg, wheelbase {:.3} m, {} gears",
            parameters.mass,
            parameters.wheelbase,
            gearbox.number_of_gears()
        );

        Ok(Self {
            parameters,
            engine,
            gearbox,
            drivetrain: DrivetrainModel::new(&config.drivetrain),
            suspension,
            steering: SteeringModel::new(&config.steering, config.time_step),
            aero: AeroModel::new(&config.aero),
            brakes,
            extra_forces: ForceRegistry::new(),
            state,
            shift_latch: ShiftLatch::default(),
            config,
        })
    }

    /// Re-derives every once-computed quantity from `config`, keeping the
    /// persistent state, registered forces and the tick length in use. The
    /// gear is clamped into the new gearbox.
    pub fn rebuild(&mut self, config: VehicleConfig) -> Result<()> {
        let mut rebuilt = Vehicle::new(config)?;
        rebuilt.set_time_step(self.config.time_step);
        rebuilt.shift_latch = self.shift_latch;
        rebuilt.state = self.state;
        rebuilt.state.gearbox.gear = self
            .state
            .gearbox
            .gear
            .min(rebuilt.gearbox.number_of_gears());
        rebuilt.extra_forces = std::mem::take(&mut self.extra_forces);
        *self = rebuilt;
        Ok(())
    }

    /// Changes the tick length. Per-tick steering rates follow.
    pub fn set_time_step(&mut self, time_step: f32) {
        if !(time_step > 0.0) {
            warn!("ignoring non-positive time step {time_step}");
            return;
        }
        self.config.time_step = time_step;
        self.steering.set_time_step(time_step);
    }

    pub fn time_step(&self) -> f32 {
        self.config.time_step
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn parameters(&self) -> &VehicleParameters {
        &self.parameters
    }

    pub fn state(&self) -> &VehicleDynamicsState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut VehicleDynamicsState {
        &mut self.state
    }

    pub fn engine(&self) -> &EngineModel {
        &self.engine
    }

    pub fn gearbox(&self) -> &GearboxModel {
        &self.gearbox
    }

    pub fn drivetrain(&self) -> &DrivetrainModel {
        &self.drivetrain
    }

    pub fn suspension(&self) -> &SuspensionModel {
        &self.suspension
    }

    pub fn steering(&self) -> &SteeringModel {
        &self.steering
    }

    pub fn aero(&self) -> &AeroModel {
        &self.aero
    }

    pub fn brakes(&self) -> &BrakeModel {
        &self.brakes
    }

    /// Registers an extra chassis force applied every tick after anti-roll.
    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.extra_forces.add_force(force);
    }

    /// Runs one fixed tick. `input` is `None` when no input source is active,
    /// which behaves like all controls at rest.
    pub fn tick(
        &mut self,
        input: Option<&DriverInput>,
        chassis: &ChassisState,
        contacts: &WheelMap<WheelContactSample>,
    ) -> TickOutput {
        let _timer = ScopedTimer::new("vehicle::tick");
        let input = input.copied().unwrap_or_default();

        // A held shift flag counts once, until it is released.
        let shift_up = input.shift_up && !self.shift_latch.up;
        let shift_down = input.shift_down && !self.shift_latch.down;
        self.shift_latch = ShiftLatch {
            up: input.shift_up,
            down: input.shift_down,
        };
        if !self.gearbox.is_automatic() {
            if shift_up {
                self.gearbox.shift_up(&mut self.state.gearbox);
            }
            if shift_down {
                self.gearbox.shift_down(&mut self.state.gearbox);
            }
        }

        let velocity = chassis.forward_velocity();
        let ctx = ForceContext {
            forward_velocity: velocity,
            contacts,
            wheel_positions: self.suspension.wheel_positions(),
        };
        let mut forces = ChassisForces::new();

        self.aero.apply(&ctx, &mut forces);

        let front_slip = [
            contacts[WheelIndex::FrontLeft].lateral_slip,
            contacts[WheelIndex::FrontRight].lateral_slip,
        ];
        let steer_angle =
            self.steering
                .update(&mut self.state.steering, velocity, input.steer, front_slip);
        let (steer_left, steer_right) = self.steering.wheel_angles(
            steer_angle,
            self.parameters.wheelbase,
            self.parameters.track_front,
        );

        self.suspension.apply(&ctx, &mut forces);
        self.extra_forces.apply_all(&ctx, &mut forces);

        let wheel_rpm = self.suspension.no_slip_wheel_rpm(velocity);
        if self.gearbox.is_automatic() {
            if input.reverse > REVERSE_REQUEST_THRESHOLD {
                self.gearbox.select_reverse(&mut self.state.gearbox);
            } else {
                self.gearbox.select_gear(
                    &mut self.state.gearbox,
                    wheel_rpm,
                    self.engine.max_power_rpm(),
                );
            }
        }

        let total_ratio = self.gearbox.current_ratio(&self.state.gearbox);
        self.engine.update_rpm(
            &mut self.state.engine,
            wheel_rpm,
            input.throttle,
            total_ratio,
            self.gearbox.clutch_lock_rpm(),
        );
        let engine_torque = if input.throttle > THROTTLE_DRIVE_THRESHOLD {
            self.engine.max_torque(&self.state.engine) * input.throttle
        } else {
            0.0
        };

        let mut drive = self
            .drivetrain
            .wheel_torques(engine_torque, total_ratio, contacts);

        let mut brake = self.brakes.brake_torques(input.throttle);
        if input.handbrake > HANDBRAKE_THRESHOLD {
            brake = self.brakes.apply_handbrake(brake);
        }

        // Cut drive to any wheel spinning past what the engine could turn it
        // at in this gear.
        let wheel_rpm_limit = (self.engine.max_rpm() / total_ratio).abs() * WHEEL_RPM_LIMIT_MARGIN;
        for &wheel in self.drivetrain.driven_wheels() {
            if contacts[wheel].rpm > wheel_rpm_limit {
                drive[wheel] = 0.0;
            }
        }

        let wheels = WheelMap::from_fn(|wheel| WheelActuation {
            drive_torque: drive[wheel],
            brake_torque: brake[wheel],
            steer_angle: match wheel {
                WheelIndex::FrontLeft => Some(steer_left),
                WheelIndex::FrontRight => Some(steer_right),
                _ => None,
            },
        });

        TickOutput {
            wheels,
            forces,
            telemetry: Telemetry {
                forward_velocity: velocity,
                engine_rpm: self.state.engine.rpm,
                engine_torque,
                gear: self.state.gearbox.gear,
                total_ratio,
                wheel_rpm_limit,
                steer_angle,
            },
        }
    }
}
