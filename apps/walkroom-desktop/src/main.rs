mod state;
mod swap;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use walkroom_input::Action;
use walkroom_render_wgpu::WgpuRenderer;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "walkroom-desktop", about = "Walk around a textured room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the floor, wall, image and video textures
    #[arg(long, default_value = "./assets")]
    assets: PathBuf,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    height: u32,
}

/// Window plus everything created against it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(assets: PathBuf, width: u32, height: u32) -> Self {
        Self {
            state: AppState::new(assets),
            size: PhysicalSize::new(width, height),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Walkroom")
            .with_inner_size(self.size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("walkroom_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.camera.set_aspect(config.width, config.height);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &self.state.scene,
            &self.state.textures,
            self.state.elapsed(),
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Move { .. } => {
                action.apply(&mut self.state.intent);
            }
            Action::Pick { ndc } => self.pick(ndc),
            Action::LockAndPick { ndc } => {
                self.set_pointer_locked(true);
                self.pick(ndc);
            }
            Action::UnlockPointer => self.set_pointer_locked(false),
            Action::ToggleHud => self.state.show_hud = !self.state.show_hud,
            Action::Noop => {}
        }
    }

    fn pick(&mut self, ndc: Vec2) {
        let Some(target) = self.state.target_at(ndc) else {
            return;
        };
        // The dialog is modal: free the pointer and drop held keys, their
        // releases would land in the dialog.
        self.set_pointer_locked(false);
        self.state.release_all();
        match swap::choose_file(target.kind, &self.state.assets_dir) {
            Some(path) => self.state.request_swap(target, path),
            None => tracing::debug!("file dialog cancelled"),
        }
    }

    fn set_pointer_locked(&mut self, locked: bool) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let window = &gpu.window;
        if locked {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("pointer lock unavailable: {e}");
                return;
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("failed to release pointer: {e}");
        }
        window.set_cursor_visible(!locked);
        self.state.mapper.set_pointer_locked(locked);
    }

    fn redraw(&mut self) {
        let dt = self.state.frame_delta();
        let events = self.state.update(dt);
        let elapsed = self.state.elapsed();

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        gpu.renderer.sync(
            &gpu.device,
            &gpu.queue,
            &self.state.scene,
            &events,
            &self.state.textures,
            elapsed,
        );

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &self.state.camera, elapsed);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    self.state
                        .camera
                        .set_aspect(gpu.config.width, gpu.config.height);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                }
                self.size = new_size;
            }
            WindowEvent::Focused(false) => {
                self.state.release_all();
                self.set_pointer_locked(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let action = self
                    .state
                    .mapper
                    .key(key, key_state == ElementState::Pressed);
                self.handle_action(action);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.cursor = None;
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                let viewport = Vec2::new(self.size.width as f32, self.size.height as f32);
                let action = self.state.mapper.click(self.state.cursor, viewport);
                self.handle_action(action);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mapper.pointer_locked() {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("walkroom-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.assets, cli.width, cli.height);
    event_loop.run_app(&mut app)?;

    Ok(())
}
