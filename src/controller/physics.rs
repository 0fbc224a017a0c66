use glam::{Quat, Vec3};
use rapier3d::na::Unit;
use rapier3d::prelude::*;
use tracing::debug;

use crate::model::{BodyDesc, BodyHandle, BodyShape, Pose};

/// Owns the rapier simulation and every body registered into it.
pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Gravity acts along the Y axis.
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Register a body. The returned handle stays valid as long as the world lives.
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let translation = to_vector(desc.position);

        let (rigid_body, collider) = match desc.shape {
            BodyShape::Sphere { radius } => (
                dynamic_body(translation, desc.velocity),
                ColliderBuilder::ball(radius).mass(desc.mass),
            ),
            BodyShape::Cube { edge } => {
                let h = edge / 2.0;
                (
                    dynamic_body(translation, desc.velocity),
                    ColliderBuilder::cuboid(h, h, h).mass(desc.mass),
                )
            }
            BodyShape::Plane { normal, .. } => (
                RigidBodyBuilder::fixed().translation(translation).build(),
                ColliderBuilder::halfspace(Unit::new_normalize(to_vector(normal))),
            ),
        };

        let collider = collider
            .restitution(desc.restitution)
            .friction(desc.friction)
            .build();

        let body = self.rigid_body_set.insert(rigid_body);
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);

        debug!(shape = ?desc.shape, position = ?desc.position, velocity = ?desc.velocity, "registered body");

        BodyHandle { body, collider, shape: desc.shape }
    }

    /// Advance every body by `dt` seconds and resolve all contacts.
    pub fn step_world(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    pub fn pose(&self, handle: &BodyHandle) -> Option<Pose> {
        let body = self.rigid_body_set.get(handle.body)?;
        let t = body.translation();
        let r = body.rotation();
        Some(Pose {
            position: Vec3::new(t.x, t.y, t.z),
            rotation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
        })
    }

    pub fn linear_velocity(&self, handle: &BodyHandle) -> Option<Vec3> {
        let v = self.rigid_body_set.get(handle.body)?.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

fn dynamic_body(translation: Vector<Real>, velocity: Vec3) -> RigidBody {
    RigidBodyBuilder::dynamic()
        .translation(translation)
        .linvel(to_vector(velocity))
        .ccd_enabled(true)
        .build()
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}
