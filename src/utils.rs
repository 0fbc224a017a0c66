use std::f32::consts::PI;

use wgpu::util::DeviceExt;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(pos: Vec3, normal: Vec3) -> Self {
        Self { pos: pos.to_array(), normal: normal.to_array() }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {

        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// UV sphere centred on the origin.
/// `segments` slices around the Y axis, `rings` bands from pole to pole.
pub fn create_sphere_mesh(segments: u32, rings: u32, radius: f32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for r in 0..=rings {
        let phi = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let theta = 2.0 * PI * s as f32 / segments as f32;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            vertices.push(Vertex::new(normal * radius, normal));
        }
    }

    // the seam column is duplicated so each ring has segments + 1 vertices
    let stride = segments + 1;
    let mut indices = Vec::with_capacity((6 * rings * segments) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, c, b, c, d, b]);
        }
    }

    Mesh { vertices, indices }
}

/// Axis aligned cube centred on the origin, one quad per face so every face
/// keeps its own normal.
pub fn create_cube_mesh(edge: f32) -> Mesh {
    let h = edge / 2.0;

    // (normal, u, v) with u x v == normal, so corners run counter-clockwise seen from outside
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        let center = normal * h;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.push(Vertex::new(center + u * (su * h) + v * (sv * h), normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

/// Flat rectangle in the XY plane centred on the origin, facing +Z.
pub fn create_plane_mesh(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let vertices = vec![
        Vertex::new(Vec3::new(-hw, -hh, 0.0), Vec3::Z),
        Vertex::new(Vec3::new(hw, -hh, 0.0), Vec3::Z),
        Vertex::new(Vec3::new(hw, hh, 0.0), Vec3::Z),
        Vertex::new(Vec3::new(-hw, hh, 0.0), Vec3::Z),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(mesh: &Mesh) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len())
    }

    #[test]
    fn test_sphere_mesh_shape() {
        let mesh = create_sphere_mesh(10, 10, 0.5);

        assert_eq!(mesh.vertices.len(), 11 * 11);
        assert_eq!(mesh.triangle_count(), 2 * 10 * 10);
        assert!(indices_in_range(&mesh), "sphere index out of range");

        for v in &mesh.vertices {
            let len = Vec3::from_array(v.pos).length();
            assert!((len - 0.5).abs() < 1e-5, "vertex off the sphere surface: {len}");
        }
    }

    #[test]
    fn test_sphere_triangles_face_outwards() {
        let mesh = create_sphere_mesh(12, 8, 1.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].pos));
            let n = (b - a).cross(c - a);
            // pole triangles collapse to a line
            if n.length_squared() < 1e-10 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0, "inward facing triangle {tri:?}");
        }
    }

    #[test]
    fn test_sphere_clamps_degenerate_parameters() {
        let mesh = create_sphere_mesh(0, 0, 1.0);
        assert!(!mesh.is_empty());
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn test_cube_mesh_shape() {
        let mesh = create_cube_mesh(1.0);

        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(indices_in_range(&mesh), "cube index out of range");

        for v in &mesh.vertices {
            for c in v.pos {
                assert!((c.abs() - 0.5).abs() < 1e-6, "cube corner not on the boundary: {:?}", v.pos);
            }
        }
    }

    #[test]
    fn test_cube_triangles_face_outwards() {
        let mesh = create_cube_mesh(2.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let n = (Vec3::from_array(b.pos) - Vec3::from_array(a.pos))
                .cross(Vec3::from_array(c.pos) - Vec3::from_array(a.pos));
            assert!(n.dot(Vec3::from_array(a.normal)) > 0.0, "winding disagrees with normal");
        }
    }

    #[test]
    fn test_plane_mesh_lies_in_xy() {
        let mesh = create_plane_mesh(10.0, 4.0);

        assert_eq!(mesh.triangle_count(), 2);
        assert!(indices_in_range(&mesh));
        for v in &mesh.vertices {
            assert_eq!(v.pos[2], 0.0);
            assert_eq!(v.pos[0].abs(), 5.0);
            assert_eq!(v.pos[1].abs(), 2.0);
        }
    }
}
