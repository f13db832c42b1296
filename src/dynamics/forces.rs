use glam::Vec3;

use crate::core::types::{Transform, WheelContactSample, WheelMap};

/// Origin of a chassis force, for consumers that treat sources differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceKind {
    AeroDrag,
    AeroLift,
    AntiRoll,
    External,
}

/// Force in the body frame, applied at `point` (body frame). A `None` point
/// acts at the centre of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisForce {
    pub kind: ForceKind,
    pub force: Vec3,
    pub point: Option<Vec3>,
}

impl ChassisForce {
    /// Converts into world coordinates using the chassis pose.
    pub fn to_world(&self, transform: &Transform) -> ChassisForce {
        ChassisForce {
            kind: self.kind,
            force: transform.transform_vector(self.force),
            point: self.point.map(|point| transform.transform_point(point)),
        }
    }
}

/// Forces produced during one tick for the external rigid-body solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChassisForces {
    forces: Vec<ChassisForce>,
}

impl ChassisForces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ForceKind, force: Vec3, point: Option<Vec3>) {
        self.forces.push(ChassisForce { kind, force, point });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChassisForce> {
        self.forces.iter()
    }

    pub fn of_kind(&self, kind: ForceKind) -> impl Iterator<Item = &ChassisForce> {
        self.forces.iter().filter(move |force| force.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Sum of all force vectors, ignoring application points.
    pub fn net_force(&self) -> Vec3 {
        self.forces.iter().map(|force| force.force).sum()
    }

    pub fn clear(&mut self) {
        self.forces.clear();
    }
}

/// Live data a force generator may read during a tick.
#[derive(Debug, Clone, Copy)]
pub struct ForceContext<'a> {
    /// Speed along the body forward axis (m/s).
    pub forward_velocity: f32,
    pub contacts: &'a WheelMap<WheelContactSample>,
    /// Wheel mount points in the body frame.
    pub wheel_positions: &'a WheelMap<Vec3>,
}

/// Anything that contributes chassis forces once per tick.
pub trait ForceGenerator: Send + Sync {
    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut ChassisForces);
}

/// Additional generators applied after the built-in aero and anti-roll forces.
#[derive(Default)]
pub struct ForceRegistry {
    generators: Vec<Box<dyn ForceGenerator>>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.generators.push(Box::new(force));
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn apply_all(&self, ctx: &ForceContext<'_>, forces: &mut ChassisForces) {
        for generator in &self.generators {
            generator.apply(ctx, forces);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    struct Constant(Vec3);

    impl ForceGenerator for Constant {
        fn apply(&self, _ctx: &ForceContext<'_>, forces: &mut ChassisForces) {
            forces.push(ForceKind::External, self.0, None);
        }
    }

    #[test]
    fn registry_applies_every_generator() {
        let mut registry = ForceRegistry::new();
        registry.add_force(Constant(Vec3::X));
        registry.add_force(Constant(Vec3::Y));

        let contacts = WheelMap::default();
        let positions = WheelMap::splat(Vec3::ZERO);
        let ctx = ForceContext {
            forward_velocity: 0.0,
            contacts: &contacts,
            wheel_positions: &positions,
        };
        let mut forces = ChassisForces::new();
        registry.apply_all(&ctx, &mut forces);

        assert_eq!(forces.len(), 2);
        assert_eq!(forces.net_force(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn world_conversion_rotates_force_and_point() {
        let transform = Transform {
            position: Vec3::new(0.0, 0.0, 5.0),
            rotation: Quat::from_rotation_y(std::f32::consts::PI),
        };
        let force = ChassisForce {
            kind: ForceKind::AeroDrag,
            force: Vec3::new(0.0, 0.0, -10.0),
            point: Some(Vec3::new(1.0, 0.0, 0.0)),
        };
        let world = force.to_world(&transform);
        assert!((world.force - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
        let point = world.point.expect("point kept");
        assert!((point - Vec3::new(-1.0, 0.0, 5.0)).length() < 1e-4);
    }
}
