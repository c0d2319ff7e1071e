//! Headless snapshot tool: drives a seeded model through a scripted
//! drag → throw → intro timeline and writes one PNG per frame, so shader
//! or timing changes can be eyeballed (or diffed) without a window.
//!
//! Usage: `snapshots [textures_dir] [out_dir]` (defaults: `assets`,
//! `snapshots`). Frames render as clear-only while textures are missing.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use tearsheet::renderer::SheetRenderer;
use tearsheet::texture_cache::FileSource;
use tearsheet::{Assets, GpuContext, SheetConfig, TearConfig, TearModel, TearRng};

const WIDTH: u32 = 900;
const HEIGHT: u32 = 700;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let textures_dir = PathBuf::from(args.next().unwrap_or_else(|| "assets".to_string()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "snapshots".to_string()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let source = Arc::new(FileSource::new(textures_dir));
    let context = Arc::new(GpuContext::request(
        &instance,
        None,
        source,
        SheetConfig::default(),
        FORMAT,
    )?);

    let target = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("snapshot-target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[FORMAT],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut model = TearModel::new(
        TearConfig::default(),
        Assets::default(),
        TearRng::with_seed(0xBAD_5EED),
    );
    let mut renderer = SheetRenderer::with_rng(context.clone(), TearRng::with_seed(7));
    renderer.resize(WIDTH, HEIGHT);

    // Block until every texture has been attempted so the first frame is
    // not a clear-only pass.
    let (tx, rx) = std::sync::mpsc::channel();
    context.prewarm_textures(&Assets::default().texture_names(), move || {
        tx.send(()).ok();
    });
    rx.recv().ok();

    let t0 = Instant::now();
    let ms = Duration::from_millis;
    let mut frame = 0u32;

    // Intro.
    model.on_appear_at(t0);
    for dt in [200, 600, 900, 1300] {
        model.tick_at(t0 + ms(dt));
        shoot(&context, &target, &view, &out_dir, &mut renderer, &model, frame, "intro");
        frame += 1;
    }

    // Drag past the complete threshold, then release into the throw.
    for (dt, dy) in [(1400, 60.0), (1500, 140.0), (1600, 250.0)] {
        model.drag_changed_at(dy, t0 + ms(dt));
        shoot(&context, &target, &view, &out_dir, &mut renderer, &model, frame, "drag");
        frame += 1;
    }
    model.drag_ended_at(t0 + ms(1650));
    for dt in [1700, 1850, 2000, 2200, 2360] {
        model.tick_at(t0 + ms(dt));
        shoot(&context, &target, &view, &out_dir, &mut renderer, &model, frame, "throw");
        frame += 1;
    }

    // The finishing tick above chains into the next intro with the new photo.
    for dt in [2500, 3000, 3560] {
        model.tick_at(t0 + ms(dt));
        shoot(&context, &target, &view, &out_dir, &mut renderer, &model, frame, "next");
        frame += 1;
    }

    println!("wrote {} frames to {}", frame, out_dir.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn shoot(
    context: &GpuContext,
    target: &wgpu::Texture,
    view: &wgpu::TextureView,
    out_dir: &Path,
    renderer: &mut SheetRenderer,
    model: &TearModel,
    frame: u32,
    tag: &str,
) {
    renderer.update(model.render_state().clone());
    renderer.render(view);
    let path = out_dir.join(format!("{frame:03}_{tag}.png"));
    if let Err(err) = save_target_png(context, target, &path) {
        log::warn!("snapshot write failed: {err:#}");
    }
}

/// 256-padded buffer readback of the render target, written out as PNG.
fn save_target_png(
    context: &GpuContext,
    target: &wgpu::Texture,
    path: &Path,
) -> anyhow::Result<()> {
    let size = target.size();
    let bytes_per_row = ((size.width * 4 + 255) / 256) * 256;
    let output = context.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("snapshot-readback"),
        size: bytes_per_row as u64 * size.height as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = context
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("snapshot-readback-encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture: target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &output,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(size.height),
            },
        },
        wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
    );
    context.queue.submit(Some(encoder.finish()));

    let slice = output.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    context.device.poll(wgpu::Maintain::Wait);
    rx.recv()??;

    let mapped = slice.get_mapped_range();
    let mut rgba = Vec::with_capacity((size.width * size.height * 4) as usize);
    for row in mapped.chunks(bytes_per_row as usize) {
        rgba.extend_from_slice(&row[..(size.width * 4) as usize]);
    }
    drop(mapped);
    output.unmap();

    let img = image::RgbaImage::from_raw(size.width, size.height, rgba)
        .context("snapshot buffer size mismatch")?;
    img.save(path)?;
    Ok(())
}
