use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::{EulerRot, Mat4, Vec3};
use tracing::{info, warn};

use crate::controller::PhysicsWorld;
use crate::model::{BodyDesc, BodyHandle};
use crate::utils::{create_cube_mesh, create_plane_mesh, create_sphere_mesh, Mesh};
use crate::view::render::{ObjectUniform, RenderMesh, UnshadedShader};

pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
pub const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
pub const BLUE: [f32; 3] = [0.0, 0.2, 1.0];
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

const SPHERE_SEGMENTS: u32 = 10;
const SPHERE_RINGS: u32 = 10;
const SPHERE_RADIUS: f32 = 0.5;
const CUBE_EDGE: f32 = 1.0;
const BODY_MASS: f32 = 1.0;

/// Where a scene object gets its model matrix from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformSource {
    /// Read from the body every frame.
    Body(BodyHandle),
    /// Static scenery: a fixed placement, tied to the body it stands in for.
    Fixed { body: BodyHandle, offset: Vec3, rotation: Vec3 },
}

impl TransformSource {
    pub fn body(&self) -> &BodyHandle {
        match self {
            TransformSource::Body(body) | TransformSource::Fixed { body, .. } => body,
        }
    }

    pub fn model_matrix(&self, world: &PhysicsWorld) -> Mat4 {
        match self {
            TransformSource::Body(body) => match world.pose(body) {
                Some(pose) => pose.to_matrix(),
                None => {
                    warn!(?body, "body missing from world, drawing at origin");
                    Mat4::IDENTITY
                }
            },
            TransformSource::Fixed { offset, rotation, .. } => {
                Mat4::from_translation(*offset)
                    * Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
            }
        }
    }
}

pub struct MeshSpec {
    pub mesh: Mesh,
    pub color: [f32; 3],
}

/// One object before upload: an index into `SceneBlueprint::meshes` plus its transform.
#[derive(Debug, Clone, Copy)]
pub struct ObjectSpec {
    pub mesh: usize,
    pub source: TransformSource,
}

/// CPU description of the scene. Bodies are already registered with the world.
pub struct SceneBlueprint {
    pub meshes: Vec<MeshSpec>,
    pub moving: Vec<ObjectSpec>,
    pub fixed: Vec<ObjectSpec>,
}

impl SceneBlueprint {
    /// Two spheres and a cube inside a closed box of six planes.
    pub fn demo(world: &mut PhysicsWorld, box_edge: f32) -> Self {
        let mut blueprint = Self { meshes: Vec::new(), moving: Vec::new(), fixed: Vec::new() };

        let red_sphere = blueprint.add_mesh(create_sphere_mesh(SPHERE_SEGMENTS, SPHERE_RINGS, SPHERE_RADIUS), RED);
        let body = world.add_body(BodyDesc::sphere(
            SPHERE_RADIUS,
            BODY_MASS,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-5.0, -4.0, -5.0),
        ));
        blueprint.moving.push(ObjectSpec { mesh: red_sphere, source: TransformSource::Body(body) });

        let blue_sphere = blueprint.add_mesh(create_sphere_mesh(SPHERE_SEGMENTS, SPHERE_RINGS, SPHERE_RADIUS), BLUE);
        let body = world.add_body(BodyDesc::sphere(
            SPHERE_RADIUS,
            BODY_MASS,
            Vec3::new(3.0, 3.0, 0.0),
            Vec3::new(-2.0, -2.0, -1.0),
        ));
        blueprint.moving.push(ObjectSpec { mesh: blue_sphere, source: TransformSource::Body(body) });

        let cube = blueprint.add_mesh(create_cube_mesh(CUBE_EDGE), YELLOW);
        let body = world.add_body(BodyDesc::cube(
            CUBE_EDGE,
            BODY_MASS,
            Vec3::new(-3.0, -3.0, 0.0),
            Vec3::new(5.0, 5.0, -1.0),
        ));
        blueprint.moving.push(ObjectSpec { mesh: cube, source: TransformSource::Body(body) });

        // every wall shares one plane mesh, drawn in the XY plane and rotated into place
        let plane = blueprint.add_mesh(create_plane_mesh(box_edge, box_edge), WHITE);
        let h = box_edge / 2.0;
        let walls = [
            // (inward normal, drawn offset, drawn rotation)
            (Vec3::Y, Vec3::new(0.0, -h, 0.0), Vec3::new(FRAC_PI_2, 0.0, 0.0)),
            (Vec3::X, Vec3::new(-h, 0.0, 0.0), Vec3::new(0.0, FRAC_PI_2, 0.0)),
            (Vec3::Z, Vec3::new(0.0, 0.0, -h), Vec3::ZERO),
            (Vec3::NEG_X, Vec3::new(h, 0.0, 0.0), Vec3::new(0.0, FRAC_PI_2, 0.0)),
            (Vec3::NEG_Z, Vec3::new(0.0, 0.0, h), Vec3::ZERO),
            (Vec3::NEG_Y, Vec3::new(0.0, h, 0.0), Vec3::new(FRAC_PI_2, 0.0, 0.0)),
        ];
        for (normal, offset, rotation) in walls {
            let body = world.add_body(BodyDesc::plane(normal, -h));
            blueprint.fixed.push(ObjectSpec {
                mesh: plane,
                source: TransformSource::Fixed { body, offset, rotation },
            });
        }

        info!(
            meshes = blueprint.meshes.len(),
            moving = blueprint.moving.len(),
            fixed = blueprint.fixed.len(),
            "scene built"
        );
        blueprint
    }

    fn add_mesh(&mut self, mesh: Mesh, color: [f32; 3]) -> usize {
        self.meshes.push(MeshSpec { mesh, color });
        self.meshes.len() - 1
    }

    /// Upload every mesh once and give each object its own uniform slot.
    pub fn upload(&self, device: &wgpu::Device, shader: &UnshadedShader) -> Scene {
        let meshes: Vec<Rc<RenderMesh>> = self
            .meshes
            .iter()
            .map(|spec| Rc::new(RenderMesh::new(device, &spec.mesh, spec.color)))
            .collect();

        let build = |spec: &ObjectSpec| SceneObject::new(device, shader, meshes[spec.mesh].clone(), spec.source);

        Scene {
            moving: self.moving.iter().map(&build).collect(),
            fixed: self.fixed.iter().map(&build).collect(),
        }
    }
}

/// A shared mesh paired with the transform it is drawn at.
pub struct SceneObject {
    pub mesh: Rc<RenderMesh>,
    pub source: TransformSource,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SceneObject {
    pub fn new(device: &wgpu::Device, shader: &UnshadedShader, mesh: Rc<RenderMesh>, source: TransformSource) -> Self {
        let (uniform_buffer, bind_group) = shader.create_object_binding(device);
        Self { mesh, source, uniform_buffer, bind_group }
    }

    /// Expects the shader pipeline to be bound already; only sets this object's uniforms.
    pub fn draw(
        &self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        view: Mat4,
        projection: Mat4,
        world: &PhysicsWorld,
    ) {
        let uniform = ObjectUniform::new(self.source.model_matrix(world), view, projection, self.mesh.color);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        pass.set_bind_group(0, &self.bind_group, &[]);
        self.mesh.draw(pass);
    }
}

/// The drawable scene: moving objects are drawn before the static ones.
pub struct Scene {
    pub moving: Vec<SceneObject>,
    pub fixed: Vec<SceneObject>,
}

impl Scene {
    pub fn draw(
        &self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        view: Mat4,
        projection: Mat4,
        world: &PhysicsWorld,
    ) {
        for object in self.moving.iter().chain(self.fixed.iter()) {
            object.draw(queue, pass, view, projection, world);
        }
    }
}
