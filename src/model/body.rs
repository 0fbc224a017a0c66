use glam::{Mat4, Quat, Vec3};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// The three kinds of body the demo knows about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f32 },
    Cube { edge: f32 },
    /// Infinite static plane: every point `x` with `normal . x == offset`.
    Plane { normal: Vec3, offset: f32 },
}

impl BodyShape {
    pub fn is_static(&self) -> bool {
        matches!(self, BodyShape::Plane { .. })
    }
}

/// Everything needed to register a body with the physics world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: BodyShape,
    /// Ignored for planes, which are fixed.
    pub mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub restitution: f32,
    pub friction: f32,
}

pub const DEFAULT_RESTITUTION: f32 = 1.0;
pub const DEFAULT_FRICTION: f32 = 0.0;

impl BodyDesc {
    pub fn sphere(radius: f32, mass: f32, position: Vec3, velocity: Vec3) -> Self {
        Self::dynamic(BodyShape::Sphere { radius }, mass, position, velocity)
    }

    pub fn cube(edge: f32, mass: f32, position: Vec3, velocity: Vec3) -> Self {
        Self::dynamic(BodyShape::Cube { edge }, mass, position, velocity)
    }

    /// `normal` does not need to be unit length, it is normalized here.
    pub fn plane(normal: Vec3, offset: f32) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            shape: BodyShape::Plane { normal, offset },
            mass: 0.0,
            position: normal * offset,
            velocity: Vec3::ZERO,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
        }
    }

    fn dynamic(shape: BodyShape, mass: f32, position: Vec3, velocity: Vec3) -> Self {
        Self {
            shape,
            mass,
            position,
            velocity,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }
}

/// Handle to a body owned by a `PhysicsWorld`. Only meaningful for the world
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub shape: BodyShape,
}

/// Position and orientation of a body at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_desc_is_normalized_and_placed_on_plane() {
        let desc = BodyDesc::plane(Vec3::new(0.0, 2.0, 0.0), -5.0);
        match desc.shape {
            BodyShape::Plane { normal, offset } => {
                assert_eq!(normal, Vec3::Y);
                assert_eq!(offset, -5.0);
            }
            other => panic!("expected a plane, got {other:?}"),
        }
        assert_eq!(desc.position, Vec3::new(0.0, -5.0, 0.0));
        assert!(desc.shape.is_static());
    }

    #[test]
    fn test_dynamic_desc_keeps_parameters() {
        let desc = BodyDesc::sphere(0.5, 1.0, Vec3::X, Vec3::new(-5.0, -4.0, -5.0))
            .with_restitution(0.3)
            .with_friction(0.7);
        assert_eq!(desc.shape, BodyShape::Sphere { radius: 0.5 });
        assert_eq!(desc.mass, 1.0);
        assert_eq!(desc.velocity, Vec3::new(-5.0, -4.0, -5.0));
        assert_eq!(desc.restitution, 0.3);
        assert_eq!(desc.friction, 0.7);
        assert!(!desc.shape.is_static());
    }

    #[test]
    fn test_pose_matrix_places_origin() {
        let pose = Pose { position: Vec3::new(1.0, 2.0, 3.0), rotation: Quat::from_rotation_y(1.0) };
        let origin = pose.to_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - pose.position).length() < 1e-6);
    }
}
