//! The shader-parameter pipeline: turns a [`RenderState`] snapshot into two
//! per-panel uniform blocks, uploads them through the ring buffer, and
//! issues the two indexed draws.
//!
//! Parameter computation is a pure function of the snapshot plus static
//! config ([`panel_uniforms`]); identical inputs produce bit-identical
//! uniforms, which is what makes redraw-skipping sound.

use std::sync::Arc;

use crate::config::SheetConfig;
use crate::context::GpuContext;
use crate::ease::clamp;
use crate::math::{self, Mat4};
use crate::model::{RenderState, ThrowSide};
use crate::rng::{TearRng, UniformRandom};
use crate::texture_cache::GpuTexture;
use crate::uniforms::{SheetUniforms, UniformRing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Left,
    Right,
}

struct PanelStyle {
    uv_offset: f32,
    rip_side: f32,
    x_direction: f32,
    tear_x_angle: f32,
    tear_y_angle: f32,
    tear_z_angle: f32,
    shade_color: [f32; 3],
    shade_amount: f32,
    wobble: f32,
    z_offset: f32,
    throw: ThrowSide,
}

/// Per-panel shader parameters for one frame. Pure: no GPU access, no
/// randomness; the tear-start jitter comes in through `tear_offset`.
pub fn panel_uniforms(
    state: &RenderState,
    panel: Panel,
    tear_offset: f32,
    mvp: Mat4,
    sheet: &SheetConfig,
) -> SheetUniforms {
    let tear_t = clamp(state.tear_amount / 1.5, 0.0, 1.0);
    let wobble_fade = (1.0 - state.throw_progress).max(0.0);
    let wobble_strength = 0.035 * tear_t * wobble_fade;
    let wobble_seed = tear_offset * 10.0;
    let shade_lift = tear_t * 0.2;
    let front_boost = tear_t * 0.1;

    let half_width = sheet.full_width / 2.0;
    let right_uv_offset = ((sheet.full_width - sheet.tear_width) / sheet.full_width) * 0.5;

    // The tear edge never wobbles in lockstep on both halves; each panel
    // sums two sines of the tear amount at its own frequencies, phased by
    // the per-tear offset.
    let style = match panel {
        Panel::Left => PanelStyle {
            uv_offset: 0.0,
            rip_side: 0.0,
            x_direction: -1.0,
            tear_x_angle: -0.01,
            tear_y_angle: -0.1,
            tear_z_angle: 0.05,
            shade_color: [1.0, 1.0, 1.0],
            shade_amount: (sheet.left_shade_base + shade_lift * 0.6).min(1.0),
            wobble: ((state.tear_amount * 4.2 + wobble_seed).sin()
                + (state.tear_amount * 7.4 + wobble_seed * 1.7).sin())
                * 0.5,
            z_offset: 0.0,
            throw: state.throw_left,
        },
        Panel::Right => PanelStyle {
            uv_offset: right_uv_offset,
            rip_side: 1.0,
            x_direction: 1.0,
            tear_x_angle: 0.2,
            tear_y_angle: 0.1,
            tear_z_angle: -0.1,
            shade_color: [0.0, 0.0, 0.0],
            shade_amount: (sheet.right_shade_base + shade_lift * 0.7 + front_boost * 0.5).min(1.0),
            wobble: ((state.tear_amount * 4.0 + wobble_seed * 1.3).sin()
                + (state.tear_amount * 6.8 + wobble_seed * 1.9).sin())
                * 0.5,
            // Drawn fractionally in front so the halves are never coplanar.
            z_offset: 0.0001,
            throw: state.throw_right,
        },
    };

    SheetUniforms {
        mvp,
        tear_amount: state.tear_amount,
        tear_width: sheet.tear_width,
        tear_offset,
        uv_offset: style.uv_offset,
        rip_side: style.rip_side,
        x_direction: style.x_direction,
        tear_x_angle: style.tear_x_angle,
        tear_y_angle: style.tear_y_angle,
        tear_z_angle: style.tear_z_angle,
        tear_x_offset: style.wobble * wobble_strength,
        shade_amount: style.shade_amount,
        white_threshold: 0.5,
        shade_color: style.shade_color,
        sheet_half_width: half_width,
        sheet_full_width: sheet.full_width,
        sheet_height: sheet.sheet_height,
        z_offset: style.z_offset,
        group_y: state.group_y,
        group_rot_z: state.group_rot_z,
        throw_progress: state.throw_progress,
        throw_x: style.throw.x,
        throw_y: style.throw.y,
        throw_z: style.throw.z,
        throw_rot_z: style.throw.rot_z,
        _pad: [0.0; 2],
    }
}

pub struct SheetRenderer {
    context: Arc<GpuContext>,
    ring: UniformRing,
    uniform_bind_group: wgpu::BindGroup,

    state: RenderState,
    tear_offset: f32,
    rng: TearRng,
    mvp: Mat4,

    photo_texture: Option<Arc<GpuTexture>>,
    rip_texture: Option<Arc<GpuTexture>>,
    loaded_photo_name: String,
    loaded_rip_name: String,
    texture_bind_group: Option<wgpu::BindGroup>,
}

impl SheetRenderer {
    pub fn new(context: Arc<GpuContext>) -> Self {
        Self::with_rng(context, TearRng::from_entropy())
    }

    /// Test seam: the rng only feeds the per-tear `tear_offset` jitter.
    pub fn with_rng(context: Arc<GpuContext>, mut rng: TearRng) -> Self {
        let ring = UniformRing::new(&context.device, std::mem::size_of::<SheetUniforms>(), 2);

        let uniform_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sheet-uniform-bg"),
            layout: &context.uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: ring.buffer(),
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<SheetUniforms>() as _),
                }),
            }],
        });

        let tear_offset = rng.uniform(0.0, 1.0);
        Self {
            context,
            ring,
            uniform_bind_group,
            state: RenderState {
                tear_amount: 0.0,
                throw_progress: 0.0,
                throw_left: ThrowSide::ZERO,
                throw_right: ThrowSide::ZERO,
                group_y: 0.0,
                group_rot_z: 0.0,
                photo_name: String::new(),
                rip_name: String::new(),
            },
            tear_offset,
            rng,
            mvp: math::IDENTITY,
            photo_texture: None,
            rip_texture: None,
            loaded_photo_name: String::new(),
            loaded_rip_name: String::new(),
            texture_bind_group: None,
        }
    }

    /// Adopts a new snapshot. Returns true when a redraw is warranted:
    /// the snapshot differs from the previous one or a texture binding
    /// changed. The tear-edge jitter re-rolls exactly when the tear leaves
    /// zero, so every tear looks different but stays stable within one.
    pub fn update(&mut self, new_state: RenderState) -> bool {
        let previous = std::mem::replace(&mut self.state, new_state);

        if previous.tear_amount == 0.0 && self.state.tear_amount > 0.0 {
            self.tear_offset = self.rng.uniform(0.0, 1.0);
        }

        let texture_changed = self.update_textures();
        previous != self.state || texture_changed
    }

    /// Retries texture lookups after a prewarm pass finished; true when a
    /// binding changed and a redraw is needed.
    pub fn refresh_textures(&mut self) -> bool {
        self.update_textures()
    }

    /// Recomputes the projection for a new drawable size. The camera pulls
    /// in closer below the 800 px width breakpoint for mobile framing.
    pub fn resize(&mut self, width: u32, height: u32) {
        let w = width as f32;
        let h = height as f32;
        let aspect = (w / h.max(0.001)).max(0.001);
        let camera_z = if w < 800.0 { 10.0 } else { 6.0 };
        let proj = math::perspective_rh(math::radians(30.0), aspect, 0.1, 100.0);
        let view = math::translation(0.0, 0.0, -camera_z);
        self.mvp = math::multiply(&proj, &view);
    }

    /// Writes both panels' parameters into this frame's ring slice and
    /// draws them. While either texture is still missing the pass only
    /// clears, so a half-loaded frame never shows garbage.
    pub fn render(&mut self, view: &wgpu::TextureView) {
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("sheet-encoder"),
                });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sheet-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(texture_bind_group) = &self.texture_bind_group {
                let left = panel_uniforms(
                    &self.state,
                    Panel::Left,
                    self.tear_offset,
                    self.mvp,
                    &self.context.sheet,
                );
                let right = panel_uniforms(
                    &self.state,
                    Panel::Right,
                    self.tear_offset,
                    self.mvp,
                    &self.context.sheet,
                );

                let base = self.ring.next_frame_offset();
                let stride = self.ring.stride() as u64;
                self.ring.write(&self.context.queue, base, &left);
                self.ring.write(&self.context.queue, base + stride, &right);

                rpass.set_pipeline(&self.context.pipeline);
                rpass.set_bind_group(0, texture_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.context.mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(
                    self.context.mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint16,
                );

                rpass.set_bind_group(1, &self.uniform_bind_group, &[base as u32]);
                rpass.draw_indexed(0..self.context.mesh.index_count, 0, 0..1);

                rpass.set_bind_group(1, &self.uniform_bind_group, &[(base + stride) as u32]);
                rpass.draw_indexed(0..self.context.mesh.index_count, 0, 0..1);
            }
        }

        self.context.queue.submit(Some(encoder.finish()));
    }

    fn update_textures(&mut self) -> bool {
        let mut changed = false;

        if self.loaded_photo_name != self.state.photo_name || self.photo_texture.is_none() {
            self.photo_texture = self.context.textures.texture(&self.state.photo_name);
            self.loaded_photo_name = self.state.photo_name.clone();
            changed = true;
        }

        if self.loaded_rip_name != self.state.rip_name || self.rip_texture.is_none() {
            self.rip_texture = self.context.textures.texture(&self.state.rip_name);
            self.loaded_rip_name = self.state.rip_name.clone();
            changed = true;
        }

        if changed {
            self.texture_bind_group = match (&self.photo_texture, &self.rip_texture) {
                (Some(photo), Some(rip)) => Some(self.context.device.create_bind_group(
                    &wgpu::BindGroupDescriptor {
                        label: Some("sheet-texture-bg"),
                        layout: &self.context.texture_bind_group_layout,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: wgpu::BindingResource::TextureView(&photo.view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::TextureView(&rip.view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 2,
                                resource: wgpu::BindingResource::Sampler(&self.context.sampler),
                            },
                        ],
                    },
                )),
                _ => None,
            };
        }

        changed
    }
}
