use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Fixed wheel ordinal. The discriminants are the storage order of every
/// [`WheelMap`] and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelIndex {
    RearLeft = 0,
    RearRight = 1,
    FrontLeft = 2,
    FrontRight = 3,
}

impl WheelIndex {
    pub const ALL: [WheelIndex; 4] = [
        WheelIndex::RearLeft,
        WheelIndex::RearRight,
        WheelIndex::FrontLeft,
        WheelIndex::FrontRight,
    ];

    pub fn axle(self) -> Axle {
        match self {
            WheelIndex::RearLeft | WheelIndex::RearRight => Axle::Rear,
            WheelIndex::FrontLeft | WheelIndex::FrontRight => Axle::Front,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, WheelIndex::RearLeft | WheelIndex::FrontLeft)
    }

    pub fn is_front(self) -> bool {
        self.axle() == Axle::Front
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axle {
    Rear,
    Front,
}

impl Axle {
    pub const ALL: [Axle; 2] = [Axle::Rear, Axle::Front];

    /// The `(left, right)` wheels mounted on this axle.
    pub fn wheels(self) -> (WheelIndex, WheelIndex) {
        match self {
            Axle::Rear => (WheelIndex::RearLeft, WheelIndex::RearRight),
            Axle::Front => (WheelIndex::FrontLeft, WheelIndex::FrontRight),
        }
    }
}

/// Per-wheel storage addressed only through [`WheelIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelMap<T>([T; 4]);

impl<T> WheelMap<T> {
    pub fn from_fn(mut f: impl FnMut(WheelIndex) -> T) -> Self {
        Self(WheelIndex::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (WheelIndex, &T)> {
        WheelIndex::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (WheelIndex, &mut T)> {
        WheelIndex::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> WheelMap<U> {
        WheelMap(self.0.map(f))
    }

    /// Values of the `(left, right)` wheels of `axle`.
    pub fn axle(&self, axle: Axle) -> (&T, &T) {
        let (left, right) = axle.wheels();
        (&self[left], &self[right])
    }
}

impl<T: Copy> WheelMap<T> {
    pub fn splat(value: T) -> Self {
        Self([value; 4])
    }
}

impl<T> Index<WheelIndex> for WheelMap<T> {
    type Output = T;

    fn index(&self, wheel: WheelIndex) -> &T {
        &self.0[wheel as usize]
    }
}

impl<T> IndexMut<WheelIndex> for WheelMap<T> {
    fn index_mut(&mut self, wheel: WheelIndex) -> &mut T {
        &mut self.0[wheel as usize]
    }
}

/// Per-wheel contact measurement produced by the external tire simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelContactSample {
    /// Longitudinal slip ratio (signed).
    pub forward_slip: f32,
    /// Lateral slip angle in radians (signed).
    pub lateral_slip: f32,
    pub grounded: bool,
    /// Measured wheel angular speed in revolutions per minute.
    pub rpm: f32,
    /// Suspension travel from neutral in metres, positive when extended.
    pub suspension_travel: f32,
}

/// Driver controls for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriverInput {
    /// Steering axis in [-1, 1].
    pub steer: f32,
    /// Combined throttle/brake axis in [-1, 1], negative brakes.
    pub throttle: f32,
    /// Reverse request in [0, 1].
    pub reverse: f32,
    /// Handbrake in [0, 1].
    pub handbrake: f32,
    /// Manual gearbox up-shift request (edge triggered).
    pub shift_up: bool,
    /// Manual gearbox down-shift request (edge triggered).
    pub shift_down: bool,
}

/// Position and orientation of the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }
}

/// Linear and angular velocity of the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Chassis kinematics read from the external rigid-body solver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChassisState {
    pub transform: Transform,
    pub velocity: Velocity,
}

impl ChassisState {
    /// Body axes: +Z forward, +Y up, +X right.
    pub const FORWARD: Vec3 = Vec3::Z;
    pub const UP: Vec3 = Vec3::Y;

    /// World linear velocity projected onto the body forward axis.
    pub fn forward_velocity(&self) -> f32 {
        self.transform
            .inverse_transform_vector(self.velocity.linear)
            .dot(Self::FORWARD)
    }
}
