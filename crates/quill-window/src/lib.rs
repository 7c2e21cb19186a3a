//! quill-window: minimal winit + wgpu window wrapper for the signature pad.
//!
//! Responsibilities:
//! - Create window + surface + device/queue.
//! - Manage surface configuration and resizing.
//! - Deliver pointer events (down/move/up/cancel) with positions in window
//!   coordinates and monotonic timestamps in seconds.
//!
//! The primary mouse button stands in for the single touch; only one stroke
//! gesture is ever in flight.

use std::time::Instant;

use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::Key;
use winit::window::{Window, WindowBuilder};

/// Choose an sRGB surface format when available; otherwise, pick the first format.
pub fn choose_srgb_surface_format(
    adapter: &wgpu::Adapter,
    surface: &wgpu::Surface,
) -> wgpu::TextureFormat {
    let caps = surface.get_capabilities(adapter);
    caps.formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .unwrap_or(caps.formats[0])
}

/// Create a surface configuration for the given size, favoring FIFO present mode.
pub fn make_surface_config(
    adapter: &wgpu::Adapter,
    surface: &wgpu::Surface,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    let caps = surface.get_capabilities(adapter);
    let format = choose_srgb_surface_format(adapter, surface);
    let present_mode = caps
        .present_modes
        .iter()
        .copied()
        .find(|m| *m == wgpu::PresentMode::Fifo)
        .unwrap_or(caps.present_modes[0]);
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode,
        alpha_mode: caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 1,
    }
}

pub struct QuillWindow {
    event_loop: EventLoop<()>,
    // We must leak the window to satisfy wgpu surface lifetime requirements.
    window: &'static Window,
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,
    device: std::sync::Arc<wgpu::Device>,
    queue: std::sync::Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    scale_factor: f64,
    start: Instant,
}

pub struct WindowCtx<'a> {
    window: &'a Window,
    device: &'a std::sync::Arc<wgpu::Device>,
    queue: &'a std::sync::Arc<wgpu::Queue>,
    surface: &'a wgpu::Surface<'static>,
    config: &'a wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    scale_factor: f64,
    now: f64,
}

impl<'a> WindowCtx<'a> {
    pub fn device_arc(&self) -> std::sync::Arc<wgpu::Device> {
        self.device.clone()
    }
    pub fn queue_arc(&self) -> std::sync::Arc<wgpu::Queue> {
        self.queue.clone()
    }
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
    /// Monotonic seconds since window creation, on the same clock as the
    /// pointer event timestamps. Lets handlers run time-driven logic (long
    /// presses) from events that carry no timestamp of their own.
    pub fn now(&self) -> f64 {
        self.now
    }
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
    pub fn acquire_current_frame(&self) -> Result<wgpu::SurfaceTexture> {
        Ok(self.surface.get_current_texture()?)
    }
}

/// Host callbacks. Pointer positions are window-local physical pixels;
/// timestamps are monotonic seconds since window creation.
pub trait EventHandler {
    fn init(&mut self, _ctx: &mut WindowCtx) -> Result<()> {
        Ok(())
    }
    fn on_resize(&mut self, _ctx: &mut WindowCtx, _size: PhysicalSize<u32>) -> Result<()> {
        Ok(())
    }
    fn on_pointer_down(&mut self, _ctx: &mut WindowCtx, _pos: [f32; 2], _t: f64) -> Result<()> {
        Ok(())
    }
    fn on_pointer_move(&mut self, _ctx: &mut WindowCtx, _pos: [f32; 2], _t: f64) -> Result<()> {
        Ok(())
    }
    fn on_pointer_up(&mut self, _ctx: &mut WindowCtx, _pos: [f32; 2], _t: f64) -> Result<()> {
        Ok(())
    }
    fn on_pointer_cancel(&mut self, _ctx: &mut WindowCtx) -> Result<()> {
        Ok(())
    }
    fn on_key(&mut self, _ctx: &mut WindowCtx, _key: &Key, _state: ElementState) -> Result<()> {
        Ok(())
    }
    fn on_redraw(&mut self, _ctx: &mut WindowCtx) -> Result<()> {
        Ok(())
    }
}

impl QuillWindow {
    pub fn new(title: &str) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new().with_title(title).build(&event_loop)?;
        let window: &'static Window = Box::leak(Box::new(window));

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .expect("No suitable GPU adapters found");
        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))?;

        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let config = make_surface_config(&adapter, &surface, size.width, size.height);
        surface.configure(&device, &config);
        log::info!(
            "window surface configured: {}x{} {:?}",
            size.width,
            size.height,
            config.format
        );

        Ok(Self {
            event_loop,
            window,
            _instance: instance,
            surface,
            _adapter: adapter,
            device: std::sync::Arc::new(device),
            queue: std::sync::Arc::new(queue),
            config,
            size,
            scale_factor,
            start: Instant::now(),
        })
    }

    pub fn run(mut self, mut handler: impl EventHandler + 'static) -> Result<()> {
        let mut last_cursor_pos: [f32; 2] = [0.0, 0.0];
        let mut pointer_pressed = false;
        let mut needs_init = true;
        let start = self.start;

        Ok(self.event_loop.run(move |event, elwt| {
            let now = || start.elapsed().as_secs_f64();
            match event {
                Event::Resumed => {
                    if needs_init {
                        let mut ctx = WindowCtx {
                            window: self.window,
                            device: &self.device,
                            queue: &self.queue,
                            surface: &self.surface,
                            config: &self.config,
                            size: self.size,
                            scale_factor: self.scale_factor,
                            now: now(),
                        };
                        let _ = handler.init(&mut ctx);
                        needs_init = false;
                    }
                }
                Event::WindowEvent { window_id, event } if window_id == self.window.id() => {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(new_size) => {
                            self.size = new_size;
                            if new_size.width > 0 && new_size.height > 0 {
                                self.config.width = new_size.width;
                                self.config.height = new_size.height;
                                self.surface.configure(&self.device, &self.config);
                            }
                            let mut ctx = WindowCtx {
                                window: self.window,
                                device: &self.device,
                                queue: &self.queue,
                                surface: &self.surface,
                                config: &self.config,
                                size: self.size,
                                scale_factor: self.scale_factor,
                                now: now(),
                            };
                            let _ = handler.on_resize(&mut ctx, new_size);
                        }
                        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                            self.scale_factor = scale_factor;
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            last_cursor_pos = [position.x as f32, position.y as f32];
                            let mut ctx = WindowCtx {
                                window: self.window,
                                device: &self.device,
                                queue: &self.queue,
                                surface: &self.surface,
                                config: &self.config,
                                size: self.size,
                                scale_factor: self.scale_factor,
                                now: now(),
                            };
                            let _ = handler.on_pointer_move(&mut ctx, last_cursor_pos, now());
                        }
                        WindowEvent::MouseInput {
                            state,
                            button: MouseButton::Left,
                            ..
                        } => {
                            let mut ctx = WindowCtx {
                                window: self.window,
                                device: &self.device,
                                queue: &self.queue,
                                surface: &self.surface,
                                config: &self.config,
                                size: self.size,
                                scale_factor: self.scale_factor,
                                now: now(),
                            };
                            match state {
                                ElementState::Pressed => {
                                    pointer_pressed = true;
                                    let _ =
                                        handler.on_pointer_down(&mut ctx, last_cursor_pos, now());
                                }
                                ElementState::Released => {
                                    pointer_pressed = false;
                                    let _ = handler.on_pointer_up(&mut ctx, last_cursor_pos, now());
                                }
                            }
                        }
                        WindowEvent::Focused(false) => {
                            // Focus loss mid-press cancels the gesture; the
                            // release will never be delivered to us.
                            if pointer_pressed {
                                pointer_pressed = false;
                                let mut ctx = WindowCtx {
                                    window: self.window,
                                    device: &self.device,
                                    queue: &self.queue,
                                    surface: &self.surface,
                                    config: &self.config,
                                    size: self.size,
                                    scale_factor: self.scale_factor,
                                    now: now(),
                                };
                                let _ = handler.on_pointer_cancel(&mut ctx);
                            }
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            let mut ctx = WindowCtx {
                                window: self.window,
                                device: &self.device,
                                queue: &self.queue,
                                surface: &self.surface,
                                config: &self.config,
                                size: self.size,
                                scale_factor: self.scale_factor,
                                now: now(),
                            };
                            let _ = handler.on_key(&mut ctx, &event.logical_key, event.state);
                        }
                        WindowEvent::RedrawRequested => {
                            let mut ctx = WindowCtx {
                                window: self.window,
                                device: &self.device,
                                queue: &self.queue,
                                surface: &self.surface,
                                config: &self.config,
                                size: self.size,
                                scale_factor: self.scale_factor,
                                now: now(),
                            };
                            let _ = handler.on_redraw(&mut ctx);
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    self.window.request_redraw();
                }
                _ => {}
            }
        })?)
    }

    pub fn window(&self) -> &Window {
        self.window
    }
}
