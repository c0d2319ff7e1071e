//! Subdivided plane mesh shared by both sheet panels.
//!
//! The grid is generated once at startup; everything that differs between
//! the panels (placement, tear deformation, shading) lives in the shader
//! parameters, so one vertex/index buffer pair serves both draws.

use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Row-major grid of `(x_segments + 1) × (y_segments + 1)` vertices centered
/// on the origin, UVs spanning [0, 1]², plus a triangle-list index buffer
/// with two triangles per cell and consistent winding. Pure; GPU upload
/// happens in [`Mesh::plane`].
pub fn plane_grid(
    width: f32,
    height: f32,
    x_segments: u32,
    y_segments: u32,
) -> (Vec<Vertex>, Vec<u16>) {
    let vx = x_segments + 1;
    let vy = y_segments + 1;

    let mut vertices = Vec::with_capacity((vx * vy) as usize);
    for y in 0..vy {
        let v = y as f32 / y_segments as f32;
        let py = (v - 0.5) * height;
        for x in 0..vx {
            let u = x as f32 / x_segments as f32;
            let px = (u - 0.5) * width;
            vertices.push(Vertex {
                position: [px, py, 0.0],
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((x_segments * y_segments * 6) as usize);
    for y in 0..y_segments {
        for x in 0..x_segments {
            let i0 = (y * vx + x) as u16;
            let i1 = (y * vx + x + 1) as u16;
            let i2 = ((y + 1) * vx + x) as u16;
            let i3 = ((y + 1) * vx + x + 1) as u16;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    (vertices, indices)
}

pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn plane(
        device: &wgpu::Device,
        width: f32,
        height: f32,
        x_segments: u32,
        y_segments: u32,
    ) -> Self {
        let (vertices, indices) = plane_grid(width, height, x_segments, y_segments);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sheet-vertex-buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sheet-index-buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}
