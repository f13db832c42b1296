use approx::assert_relative_eq;
use vehicle_dynamics::*;

fn at_rest() -> (ChassisState, WheelMap<WheelContactSample>) {
    let contacts = WheelMap::splat(WheelContactSample {
        grounded: true,
        ..WheelContactSample::default()
    });
    (ChassisState::default(), contacts)
}

fn moving_forward(speed: f32) -> ChassisState {
    let mut chassis = ChassisState::default();
    chassis.velocity.linear = Vec3::new(0.0, 0.0, speed);
    chassis
}

#[test]
fn half_throttle_from_rest_splits_evenly_over_open_rear_differential() {
    let mut config = VehicleConfig::default();
    config.drivetrain.drive_mode = DriveMode::Rear;
    config.drivetrain.rear_differential.slip_limit = 0.0;
    // No clutch hold, so the engine idles.
    config.gearbox.clutch_lock_rpm = 0.0;
    let mut vehicle = Vehicle::new(config).expect("valid config");

    let (chassis, contacts) = at_rest();
    let input = DriverInput {
        throttle: 0.5,
        ..DriverInput::default()
    };
    let output = vehicle.tick(Some(&input), &chassis, &contacts);

    assert_eq!(output.telemetry.gear, 1);
    assert_eq!(output.telemetry.engine_rpm, vehicle.engine().idle_rpm());

    let idle_torque = vehicle.engine().curve().torque_at(vehicle.engine().idle_rpm());
    let expected = 0.5 * idle_torque * vehicle.gearbox().ratio(1) / 2.0;
    let rear_left = output.wheels[WheelIndex::RearLeft].drive_torque;
    let rear_right = output.wheels[WheelIndex::RearRight].drive_torque;
    assert_relative_eq!(rear_left, rear_right);
    assert_relative_eq!(rear_left, expected, max_relative = 1e-5);
    assert_eq!(output.wheels[WheelIndex::FrontLeft].drive_torque, 0.0);
    assert_eq!(output.wheels[WheelIndex::FrontRight].drive_torque, 0.0);
}

#[test]
fn throttle_from_rest_holds_engine_at_clutch_lock() {
    let mut vehicle = Vehicle::new(VehicleConfig::default()).expect("valid config");
    let (chassis, contacts) = at_rest();
    let input = DriverInput {
        throttle: 1.0,
        ..DriverInput::default()
    };
    let output = vehicle.tick(Some(&input), &chassis, &contacts);

    assert_eq!(output.telemetry.engine_rpm, 3000.0);
    assert_relative_eq!(
        output.telemetry.engine_torque,
        vehicle.engine().curve().torque_at(3000.0),
        max_relative = 1e-6
    );
}

#[test]
fn full_brake_pedal_applies_maximum_brake_torque_without_drive() {
    let mut vehicle = Vehicle::new(VehicleConfig::default()).expect("valid config");
    let contacts = at_rest().1;
    let input = DriverInput {
        throttle: -1.0,
        ..DriverInput::default()
    };
    let output = vehicle.tick(Some(&input), &moving_forward(15.0), &contacts);

    let front = vehicle.brakes().max_torque(Axle::Front);
    let rear = vehicle.brakes().max_torque(Axle::Rear);
    for (wheel, actuation) in output.wheels.iter() {
        let expected = if wheel.is_front() { front } else { rear };
        assert_relative_eq!(actuation.brake_torque, expected);
        assert_eq!(actuation.drive_torque, 0.0);
    }
    assert_eq!(output.telemetry.engine_torque, 0.0);
}

#[test]
fn handbrake_overrides_rear_pedal_braking_while_moving() {
    let mut vehicle = Vehicle::new(VehicleConfig::default()).expect("valid config");
    let contacts = at_rest().1;
    let input = DriverInput {
        throttle: -0.4,
        handbrake: 1.0,
        ..DriverInput::default()
    };
    let output = vehicle.tick(Some(&input), &moving_forward(20.0), &contacts);

    let handbrake = 2.0 * vehicle.brakes().max_torque(Axle::Rear);
    assert_eq!(output.wheels[WheelIndex::RearLeft].brake_torque, handbrake);
    assert_eq!(output.wheels[WheelIndex::RearRight].brake_torque, handbrake);
    assert_relative_eq!(
        output.wheels[WheelIndex::FrontLeft].brake_torque,
        0.4 * vehicle.brakes().max_torque(Axle::Front)
    );
}

#[test]
fn automatic_gearbox_upshifts_with_speed() {
    let mut vehicle = Vehicle::new(VehicleConfig::default()).expect("valid config");
    let contacts = at_rest().1;
    let input = DriverInput {
        throttle: 1.0,
        ..DriverInput::default()
    };

    let slow = vehicle.tick(Some(&input), &moving_forward(2.0), &contacts);
    let fast = vehicle.tick(Some(&input), &moving_forward(40.0), &contacts);
    assert!(fast.telemetry.gear > slow.telemetry.gear);
    assert!(fast.telemetry.total_ratio < slow.telemetry.total_ratio);
}

#[test]
fn all_wheel_drive_sends_bias_to_front_axle() {
    let mut config = VehicleConfig::default();
    config.drivetrain.drive_mode = DriveMode::AllWheel;
    config.drivetrain.front_torque_bias = 0.4;
    let mut vehicle = Vehicle::new(config).expect("valid config");

    let (chassis, contacts) = at_rest();
    let input = DriverInput {
        throttle: 1.0,
        ..DriverInput::default()
    };
    let output = vehicle.tick(Some(&input), &chassis, &contacts);

    let front = output.wheels[WheelIndex::FrontLeft].drive_torque
        + output.wheels[WheelIndex::FrontRight].drive_torque;
    let rear = output.wheels[WheelIndex::RearLeft].drive_torque
        + output.wheels[WheelIndex::RearRight].drive_torque;
    assert_relative_eq!(front / (front + rear), 0.4, max_relative = 1e-5);
}

#[test]
fn chassis_forces_convert_to_world_frame() {
    let mut vehicle = Vehicle::new(VehicleConfig::default()).expect("valid config");
    // Body forward (+Z) turned a quarter about +Y points along world +X.
    let mut chassis = ChassisState::default();
    chassis.transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    chassis.velocity.linear = Vec3::new(30.0, 0.0, 0.0);
    let contacts = at_rest().1;

    let output = vehicle.tick(None, &chassis, &contacts);
    let drag = output
        .forces
        .of_kind(ForceKind::AeroDrag)
        .next()
        .expect("drag is always emitted");
    let world = drag.to_world(&chassis.transform);

    assert_relative_eq!(output.telemetry.forward_velocity, 30.0, max_relative = 1e-5);
    assert!(drag.force.z < 0.0);
    assert!(world.force.x < 0.0);
    assert_relative_eq!(world.force.length(), drag.force.length(), max_relative = 1e-5);
}

#[test]
fn engine_wrapper_feeds_and_steps_vehicles() {
    let mut engine = DynamicsEngine::new(1.0 / 60.0);
    let id = engine
        .add_vehicle(VehicleConfig::default())
        .expect("valid config");
    let (chassis, contacts) = at_rest();
    let input = DriverInput {
        steer: -1.0,
        ..DriverInput::default()
    };
    assert!(engine.feed(id, Some(input), chassis, contacts));

    assert_eq!(engine.step(1.0 / 30.0 + 1e-4), 2);
    let output = engine.output(id).expect("vehicle exists");
    assert!(output.telemetry.steer_angle < 0.0);
    assert!(engine.vehicle(id).unwrap().state().steering.angle < 0.0);

    assert!(engine.remove_vehicle(id).is_some());
    assert!(!engine.feed(id, None, chassis, contacts));
}
