//! Per-panel shader parameter block and the ring buffer it is uploaded
//! through.
//!
//! [`SheetUniforms`] mirrors the WGSL uniform struct in
//! `shaders/tear.wgsl` field for field; the explicit tail padding keeps the
//! Rust size in agreement with WGSL struct rounding. [`RingLayout`] is the
//! pure offset arithmetic, split out so the rotation contract is testable
//! without a device.

use crate::math::{Mat4, IDENTITY};

/// wgpu's minimum uniform-buffer-offset alignment.
const UNIFORM_ALIGN: u32 = 256;

pub const FRAMES_IN_FLIGHT: u32 = 3;

/// Everything one panel's draw reads. Written fresh each frame; two of
/// these (left, right) go into one ring slice.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SheetUniforms {
    pub mvp: Mat4,

    pub tear_amount: f32,
    pub tear_width: f32,
    pub tear_offset: f32,
    pub uv_offset: f32,

    pub rip_side: f32,
    pub x_direction: f32,
    pub tear_x_angle: f32,
    pub tear_y_angle: f32,
    pub tear_z_angle: f32,
    pub tear_x_offset: f32,
    pub shade_amount: f32,
    pub white_threshold: f32,

    // vec3 in WGSL; must land on a 16-byte boundary.
    pub shade_color: [f32; 3],
    pub sheet_half_width: f32,

    pub sheet_full_width: f32,
    pub sheet_height: f32,
    pub z_offset: f32,
    pub group_y: f32,
    pub group_rot_z: f32,
    pub throw_progress: f32,
    pub throw_x: f32,
    pub throw_y: f32,
    pub throw_z: f32,
    pub throw_rot_z: f32,

    pub _pad: [f32; 2],
}

impl Default for SheetUniforms {
    fn default() -> Self {
        Self {
            mvp: IDENTITY,
            tear_amount: 0.0,
            tear_width: 0.0,
            tear_offset: 0.0,
            uv_offset: 0.0,
            rip_side: 0.0,
            x_direction: 1.0,
            tear_x_angle: 0.0,
            tear_y_angle: 0.0,
            tear_z_angle: 0.0,
            tear_x_offset: 0.0,
            shade_amount: 0.0,
            white_threshold: 0.5,
            shade_color: [1.0, 1.0, 1.0],
            sheet_half_width: 0.0,
            sheet_full_width: 0.0,
            sheet_height: 0.0,
            z_offset: 0.0,
            group_y: 0.0,
            group_rot_z: 0.0,
            throw_progress: 0.0,
            throw_x: 0.0,
            throw_y: 0.0,
            throw_z: 0.0,
            throw_rot_z: 0.0,
            _pad: [0.0; 2],
        }
    }
}

/// Offset arithmetic for a triple-buffered uniform region.
///
/// One slice of `items_per_frame` elements exists per frame in flight;
/// [`next_frame_offset`](Self::next_frame_offset) rotates through them so
/// the CPU never rewrites a slice the GPU may still be reading. That holds
/// as long as `frames_in_flight` is at least the swapchain's real in-flight
/// depth.
#[derive(Debug, Clone)]
pub struct RingLayout {
    stride: u32,
    items_per_frame: u32,
    frames_in_flight: u32,
    frame_index: u32,
}

impl RingLayout {
    pub fn new(element_size: usize, items_per_frame: u32, frames_in_flight: u32) -> Self {
        let stride = (element_size as u32 + UNIFORM_ALIGN - 1) & !(UNIFORM_ALIGN - 1);
        Self {
            stride,
            items_per_frame,
            frames_in_flight,
            frame_index: 0,
        }
    }

    /// Byte stride of one element, rounded up to the 256-byte offset
    /// alignment uniform bindings require.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn total_size(&self) -> u64 {
        self.stride as u64 * self.items_per_frame as u64 * self.frames_in_flight as u64
    }

    /// Advances to the next frame's slice and returns its base offset.
    pub fn next_frame_offset(&mut self) -> u64 {
        self.frame_index = (self.frame_index + 1) % self.frames_in_flight;
        self.frame_index as u64 * self.stride as u64 * self.items_per_frame as u64
    }
}

/// The GPU-side ring: one `UNIFORM | COPY_DST` buffer holding every
/// frame-in-flight's parameter slice.
pub struct UniformRing {
    layout: RingLayout,
    buffer: wgpu::Buffer,
}

impl UniformRing {
    pub fn new(device: &wgpu::Device, element_size: usize, items_per_frame: u32) -> Self {
        let layout = RingLayout::new(element_size, items_per_frame, FRAMES_IN_FLIGHT);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sheet-uniform-ring"),
            size: layout.total_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { layout, buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn stride(&self) -> u32 {
        self.layout.stride()
    }

    pub fn next_frame_offset(&mut self) -> u64 {
        self.layout.next_frame_offset()
    }

    pub fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, offset: u64, value: &T) {
        queue.write_buffer(&self.buffer, offset, bytemuck::bytes_of(value));
    }
}
