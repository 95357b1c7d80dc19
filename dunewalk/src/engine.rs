use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::input::InputState;

/// Configuration values for the engine window and runtime behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Length of one simulation tick.
    pub tick_rate: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Dunewalk".into(),
            width: 1024,
            height: 768,
            tick_rate: Duration::from_secs_f64(1.0 / 60.0),
        }
    }
}

/// Main entrypoint for hosting a game in a window.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Override the initial window size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Override the simulation tick length.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.config.tick_rate = tick_rate;
        self
    }

    /// Run the provided game until the window is closed or the game requests exit.
    pub fn run<G: Game + 'static>(self, game: G) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut host = Host {
            ctx: EngineContext::new(&self.config),
            config: self.config,
            game,
            last_frame: Instant::now(),
            error: None,
        };
        event_loop.run_app(&mut host)?;

        match host.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

struct Host<G> {
    config: EngineConfig,
    ctx: EngineContext,
    game: G,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl<G: Game> Host<G> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("stopping: {err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl<G: Game> ApplicationHandler for Host<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        let size = window.inner_size();
        self.ctx.surface_size = (size.width, size.height);
        self.ctx.window = Some(window);

        if let Err(err) = self.game.init(&mut self.ctx) {
            self.fail(event_loop, err);
        }
        self.last_frame = Instant::now();
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: StartCause) {
        self.ctx.begin_frame();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.ctx.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } if is_escape_pressed(&event) => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.ctx.surface_size = (size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.game.draw(&mut self.ctx) {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        self.ctx.update_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.game.update(&mut self.ctx) {
            return self.fail(event_loop, err);
        }

        if self.ctx.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.ctx.window {
            window.request_redraw();
        }
    }
}

fn is_escape_pressed(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape))
}

/// Shared context provided to game code each frame.
pub struct EngineContext {
    window: Option<Arc<Window>>,
    surface_size: (u32, u32),
    delta_time: Duration,
    elapsed_time: Duration,
    tick_rate: Duration,
    tick_accumulator: Duration,
    ticked_since_input: bool,
    exit_requested: bool,
    input: InputState,
}

impl EngineContext {
    fn new(config: &EngineConfig) -> Self {
        Self {
            window: None,
            surface_size: (config.width, config.height),
            delta_time: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            tick_rate: config.tick_rate,
            tick_accumulator: Duration::ZERO,
            ticked_since_input: false,
            exit_requested: false,
            input: InputState::new(),
        }
    }

    fn begin_frame(&mut self) {
        // Keep press edges until a tick has seen them.
        if self.ticked_since_input {
            self.input.begin_frame();
            self.ticked_since_input = false;
        }
    }

    fn update_time(&mut self, delta: Duration) {
        self.delta_time = delta;
        self.elapsed_time += delta;
        // Cap the backlog after a long stall.
        self.tick_accumulator = (self.tick_accumulator + delta).min(self.tick_rate * 8);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.input.handle_key(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_moved(position.x, position.y)
            }
            _ => {}
        }
    }

    /// Duration between the current and previous frames.
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Total time elapsed since the engine started running.
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }

    /// Check if a simulation tick is due and consume its time.
    ///
    /// Call this in a loop until it returns `false`:
    ///
    /// ```rust,no_run
    /// # use dunewalk::{EngineContext, FrameClock, Session};
    /// # fn example(ctx: &mut EngineContext, clock: &mut FrameClock, session: &mut Session) {
    /// while ctx.should_tick() {
    ///     clock.tick(session, ctx.input());
    /// }
    /// # }
    /// ```
    pub fn should_tick(&mut self) -> bool {
        if self.tick_accumulator >= self.tick_rate {
            self.tick_accumulator -= self.tick_rate;
            self.ticked_since_input = true;
            true
        } else {
            false
        }
    }

    /// Access the window, once created.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }

    /// Current drawable size in physical pixels, updated on resize.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Access the current input state.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Request that the engine exit after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}

/// Trait implemented by user code to hook into the engine lifecycle.
pub trait Game {
    /// Called once after the window is created but before the first frame.
    fn init(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Update game state. Called once per frame before drawing.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Present the current frame. Called when a redraw is requested.
    fn draw(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }
}
