//! winit glue: window and surface lifecycle, mouse-drag gesture mapping,
//! the per-frame tick loop, and the prewarm-completion hop back onto the
//! event-loop thread.

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::config::{Assets, SheetConfig, TearConfig};
use crate::context::GpuContext;
use crate::model::TearModel;
use crate::renderer::SheetRenderer;
use crate::rng::TearRng;
use crate::texture_cache::FileSource;

const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

/// Events the background texture loader posts back to the event loop.
#[derive(Debug, Clone, Copy)]
pub enum TearEvent {
    TexturesReady,
}

struct Gfx {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    context: Arc<GpuContext>,
    renderer: SheetRenderer,
}

pub struct TearApp {
    sheet: SheetConfig,
    assets: Assets,
    textures_dir: PathBuf,
    proxy: EventLoopProxy<TearEvent>,

    model: TearModel,
    gfx: Option<Gfx>,

    cursor_y: f64,
    drag_origin_y: Option<f64>,
}

impl TearApp {
    pub fn new(
        tear: TearConfig,
        sheet: SheetConfig,
        assets: Assets,
        textures_dir: PathBuf,
        proxy: EventLoopProxy<TearEvent>,
    ) -> Self {
        let model = TearModel::new(tear, assets.clone(), TearRng::from_entropy());
        Self {
            sheet,
            assets,
            textures_dir,
            proxy,
            model,
            gfx: None,
            cursor_y: 0.0,
            drag_origin_y: None,
        }
    }

    fn configure_surface(gfx: &mut Gfx, size: PhysicalSize<u32>) {
        gfx.surface_config.width = size.width.max(1);
        gfx.surface_config.height = size.height.max(1);
        gfx.surface.configure(&gfx.context.device, &gfx.surface_config);
        gfx.renderer.resize(gfx.surface_config.width, gfx.surface_config.height);
    }

    fn redraw(&mut self) {
        if self.model.is_animating() {
            self.model.tick();
        }

        let Some(gfx) = &mut self.gfx else { return };
        let changed = gfx.renderer.update(self.model.render_state().clone());

        if changed {
            let frame = match gfx.surface.get_current_texture() {
                Ok(frame) => frame,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = gfx.window.inner_size();
                    Self::configure_surface(gfx, size);
                    return;
                }
                Err(err) => {
                    log::warn!("dropped frame: {err}");
                    return;
                }
            };
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            gfx.renderer.render(&view);
            frame.present();
        }

        if self.model.is_animating() {
            gfx.window.request_redraw();
        }
    }
}

impl ApplicationHandler<TearEvent> for TearApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("tearsheet")
            .with_inner_size(PhysicalSize::new(900u32, 700u32));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("window creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = match instance.create_surface(window.clone()) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("surface creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let source = Arc::new(FileSource::new(self.textures_dir.clone()));
        let context = match GpuContext::request(
            &instance,
            Some(&surface),
            source,
            self.sheet.clone(),
            SURFACE_FORMAT,
        ) {
            Ok(context) => Arc::new(context),
            Err(err) => {
                // Fatal for the effect; the host falls back to plain UI.
                log::error!("GPU setup failed, disabling tear effect: {err:#}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: SURFACE_FORMAT,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![SURFACE_FORMAT],
        };
        surface.configure(&context.device, &surface_config);

        let mut renderer = SheetRenderer::new(context.clone());
        renderer.resize(surface_config.width, surface_config.height);

        let proxy = self.proxy.clone();
        context.prewarm_textures(&self.assets.texture_names(), move || {
            let _ = proxy.send_event(TearEvent::TexturesReady);
        });

        self.model.on_appear();
        window.request_redraw();

        self.gfx = Some(Gfx {
            window,
            surface,
            surface_config,
            context,
            renderer,
        });
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: TearEvent) {
        match event {
            TearEvent::TexturesReady => {
                if let Some(gfx) = &mut self.gfx {
                    if gfx.renderer.refresh_textures() {
                        gfx.window.request_redraw();
                    }
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(new_size) => {
                if let Some(gfx) = &mut self.gfx {
                    Self::configure_surface(gfx, new_size);
                    gfx.window.request_redraw();
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.drag_origin_y = Some(self.cursor_y);
                }
                ElementState::Released => {
                    if self.drag_origin_y.take().is_some() {
                        self.model.drag_ended();
                        if let Some(gfx) = &self.gfx {
                            gfx.window.request_redraw();
                        }
                    }
                }
            },

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_y = position.y;
                if let Some(origin) = self.drag_origin_y {
                    let delta_y = (position.y - origin) as f32;
                    self.model.drag_changed(delta_y);
                    if let Some(gfx) = &self.gfx {
                        gfx.window.request_redraw();
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }
}

/// Builds the event loop and runs the effect until the window closes.
pub fn run(
    tear: TearConfig,
    sheet: SheetConfig,
    assets: Assets,
    textures_dir: PathBuf,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::<TearEvent>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();
    let mut app = TearApp::new(tear, sheet, assets, textures_dir, proxy);
    event_loop.run_app(&mut app)?;
    Ok(())
}
