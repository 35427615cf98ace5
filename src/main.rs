use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use flipdot_maze::display::{DotLut, blit_dots, build_dot_lut};
use flipdot_maze::{Color, Config, Grid, Key, Keyboard, Renderer, Viewpoint};

/// Longest step fed to the simulation after a stall.
const MAX_STEP: Duration = Duration::from_millis(100);

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    grid: Grid,
    viewpoint: Viewpoint,
    renderer: Renderer,
    keyboard: Keyboard,

    // Dot buffer, one Color per dot
    dots: Vec<Color>,
    lut: DotLut,

    tick_interval: Duration,
    last_tick: Instant,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // First fatal error raised inside an event callback
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        let viewpoint = Viewpoint {
            speeds: config.speeds,
            ..Viewpoint::default()
        };
        let renderer = Renderer::new(config.dots_width, config.dots_height, config.palette);
        let grid = Grid::maze();

        // First frame is drawn before any tick.
        let mut dots = vec![Color::default(); config.dots_width * config.dots_height];
        renderer.cast_and_draw(&mut dots, &grid, &viewpoint);

        Self {
            tick_interval: config.tick_interval(),
            config,
            window: None,
            surface: None,
            grid,
            viewpoint,
            renderer,
            keyboard: Keyboard::new(),
            dots,
            lut: DotLut::empty(),
            last_tick: Instant::now(),
            frame_counter: 0,
            last_fps_print: Instant::now(),
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.config.window_size();
        let attributes = Window::default_attributes()
            .with_title(self.config.title)
            .with_inner_size(PhysicalSize::new(w, h));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        log::info!(
            "Window {}x{} for {}x{} dots",
            size.width,
            size.height,
            self.config.dots_width,
            self.config.dots_height
        );
        self.rebuild_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        window.request_redraw();
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    /// Advance and re-cast once the tick interval has passed.
    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        if elapsed <= self.tick_interval {
            return;
        }
        self.last_tick = now;

        let elapsed_ms = elapsed.min(MAX_STEP).as_millis() as u32;
        self.viewpoint.advance(elapsed_ms, &self.keyboard, &self.grid);
        self.renderer.cast_and_draw(&mut self.dots, &self.grid, &self.viewpoint);
        log::trace!(
            "tick {elapsed_ms}ms pos={:?} dir={:?}",
            self.viewpoint.pos,
            self.viewpoint.dir
        );
    }

    fn present(&mut self, id: WindowId) -> Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);
        if self.lut.dst_width() != dw || self.lut.dst_height() != dh {
            self.lut = build_dot_lut(dw, dh, self.config.dots_width, self.config.dots_height);
        }

        surface
            .resize(nw, nh)
            .map_err(|e| anyhow!("resize surface: {e}"))?;
        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("surface buffer: {e}"))?;
        blit_dots(&mut buf, dw, &self.dots, self.config.dots_width, &self.lut);
        buf.present().map_err(|e| anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let since = now.duration_since(self.last_fps_print).as_secs_f32();
        if since >= 1.0 {
            log::debug!("FPS: {:.1}", self.frame_counter as f32 / since);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
        Ok(())
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.lut = build_dot_lut(dst_w, dst_h, self.config.dots_width, self.config.dots_height);
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, state: ElementState) {
        if code == KeyCode::Escape {
            log::info!("Escape pressed; stopping");
            event_loop.exit();
            return;
        }
        let Some(key) = Key::from_key_code(code) else {
            return; // unused key
        };
        match state {
            ElementState::Pressed => self.keyboard.press(key),
            ElementState::Released => self.keyboard.release(key),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err.context("window setup failed"));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code, state),

            WindowEvent::Focused(false) => self.keyboard.release_all(),

            WindowEvent::RedrawRequested => {
                self.tick();
                if let Err(err) = self.present(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                log::info!("Resized to {}x{}", new_size.width, new_size.height);
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let deadline = self.last_tick + self.tick_interval;
        if Instant::now() > deadline {
            window.request_redraw();
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.tick_interval));
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline + Duration::from_millis(1)));
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!(
        "{} starting: {}x{} dots, {} px/dot, {} renders/s",
        config.title,
        config.dots_width,
        config.dots_height,
        config.pixels_per_dot,
        config.renders_per_second
    );

    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;
    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop: {e}"))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
