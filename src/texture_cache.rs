//! Name-keyed, memoized GPU texture loads.
//!
//! Lookups hit a lock-guarded map; misses decode through a pluggable
//! [`TextureSource`] and upload once. Load failures are logged and left
//! uncached so a later lookup retries. [`TextureCache::prewarm`] walks a
//! name set on a background thread so first paint is not blocked on
//! decode I/O.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use image::RgbaImage;
use wgpu::util::DeviceExt;

/// Resolves an opaque asset name to decoded RGBA pixels.
pub trait TextureSource: Send + Sync {
    fn load_rgba(&self, name: &str) -> anyhow::Result<RgbaImage>;
}

/// Loads `{base_dir}/{name}.{extension}` with the `image` crate.
pub struct FileSource {
    base_dir: PathBuf,
    extension: String,
}

impl FileSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension: "png".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

impl TextureSource for FileSource {
    fn load_rgba(&self, name: &str) -> anyhow::Result<RgbaImage> {
        let path = self.base_dir.join(format!("{}.{}", name, self.extension));
        let img = image::open(&path).with_context(|| format!("loading {}", path.display()))?;
        Ok(img.to_rgba8())
    }
}

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

pub struct TextureCache {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    source: Arc<dyn TextureSource>,
    cache: Mutex<HashMap<String, Arc<GpuTexture>>>,
}

impl TextureCache {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        source: Arc<dyn TextureSource>,
    ) -> Self {
        Self {
            device,
            queue,
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached texture for `name`, loading and memoizing it on a
    /// miss. `None` means the name was empty or the load failed; failures
    /// are not remembered, so the next call tries again.
    pub fn texture(&self, name: &str) -> Option<Arc<GpuTexture>> {
        if name.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.lock().ok()?.get(name) {
            return Some(cached.clone());
        }

        let image = match self.source.load_rgba(name) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("texture load failed for '{}': {:#}", name, err);
                return None;
            }
        };

        let texture = Arc::new(upload_rgba(&self.device, &self.queue, name, &image));
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(name.to_string(), texture.clone());
        }
        Some(texture)
    }

    /// Loads a set of names on a background thread, then invokes `on_done`
    /// once (from that thread). The host typically forwards the callback
    /// into its event loop to trigger a redraw.
    pub fn prewarm(self: &Arc<Self>, names: &[String], on_done: impl FnOnce() + Send + 'static) {
        let unique: Vec<String> = names
            .iter()
            .filter(|n| !n.is_empty())
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if unique.is_empty() {
            return;
        }

        let cache = Arc::clone(self);
        std::thread::spawn(move || {
            for name in &unique {
                let _ = cache.texture(name);
            }
            on_done();
        });
    }
}

/// Uploads decoded pixels into an sRGB texture via a row-padded staging
/// buffer (copy rows must be 256-byte aligned).
fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    name: &str,
    image: &RgbaImage,
) -> GpuTexture {
    let (width, height) = image.dimensions();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(name),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[wgpu::TextureFormat::Rgba8UnormSrgb],
    });

    let unpadded_bytes_per_row = width as usize * 4;
    const COPY_BYTES_PER_ROW_ALIGNMENT: usize = 256;
    let padded_bytes_per_row = (unpadded_bytes_per_row + COPY_BYTES_PER_ROW_ALIGNMENT - 1)
        / COPY_BYTES_PER_ROW_ALIGNMENT
        * COPY_BYTES_PER_ROW_ALIGNMENT;

    let mut padded_buffer = vec![0u8; padded_bytes_per_row * height as usize];
    for y in 0..height as usize {
        let dst_start = y * padded_bytes_per_row;
        let src_start = y * unpadded_bytes_per_row;
        padded_buffer[dst_start..dst_start + unpadded_bytes_per_row]
            .copy_from_slice(&image.as_raw()[src_start..src_start + unpadded_bytes_per_row]);
    }

    let staging = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("texture-staging"),
        contents: &padded_buffer,
        usage: wgpu::BufferUsages::COPY_SRC,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("texture-upload"),
    });
    encoder.copy_buffer_to_texture(
        wgpu::ImageCopyBuffer {
            buffer: &staging,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row as u32),
                rows_per_image: Some(height),
            },
        },
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        texture,
        view,
        width,
        height,
    }
}
