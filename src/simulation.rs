//! Simulation builder and runner

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::chain::{ColumnChain, InitialCondition, Integrator, UpdateOrder};
use crate::driver::DriverConfig;
use crate::error::{ConfigError, SimulationError};
use crate::gpu::GpuState;
use crate::params::{Coefficients, Preset, TICK_RATE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::render::{self, Layout, Renderer};
use crate::schedule::{Pacer, Scheduler, StopToken};
use crate::time::{Ticker, Time};
use crate::visuals::ColorScheme;

/// A ripple simulation builder.
///
/// Start from a [`Preset`], adjust with the `with_*` methods, then call
/// [`run`](Ripples::run) to open a window, or
/// [`run_headless`](Ripples::run_headless) to drive any [`Renderer`].
#[derive(Debug, Clone)]
pub struct Ripples {
    title: String,
    layout: Layout,
    tick_rate: u32,
    coefficients: Coefficients,
    driver: Option<DriverConfig>,
    initial: InitialCondition,
    colors: ColorScheme,
    update_order: UpdateOrder,
    integrator: Integrator,
    stop: StopToken,
}

impl Ripples {
    /// Create a simulation with the default [`Preset::Pulse`] settings.
    pub fn new() -> Self {
        Self::preset(Preset::default())
    }

    /// Create a simulation from one of the built-in parameterizations.
    pub fn preset(preset: Preset) -> Self {
        Self {
            title: preset.title().to_string(),
            layout: Layout::new(WINDOW_WIDTH, WINDOW_HEIGHT, preset.column_width()),
            tick_rate: TICK_RATE,
            coefficients: preset.coefficients(),
            driver: preset.driver(),
            initial: preset.initial(),
            colors: preset.colors(),
            update_order: UpdateOrder::default(),
            integrator: Integrator::default(),
            stop: StopToken::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the window size in pixels. The column count follows from it.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.layout.width = width;
        self.layout.height = height;
        self
    }

    /// Set the bar width in pixels.
    pub fn with_column_width(mut self, column_width: u32) -> Self {
        self.layout.column_width = column_width;
        self
    }

    /// Set the target number of ticks per second.
    pub fn with_tick_rate(mut self, rate: u32) -> Self {
        self.tick_rate = rate;
        self
    }

    pub fn with_coefficients(mut self, coefficients: Coefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Attach a driver to the right edge, or remove it with `None`.
    pub fn with_driver(mut self, driver: Option<DriverConfig>) -> Self {
        self.driver = driver;
        self
    }

    pub fn with_initial(mut self, initial: InitialCondition) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_update_order(mut self, order: UpdateOrder) -> Self {
        self.update_order = order;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Use an existing token to stop the run from elsewhere.
    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    /// Check the startup parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.column_width == 0 {
            return Err(ConfigError::ZeroColumnWidth);
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if let InitialCondition::Scattered { min, max, .. } = self.initial {
            if min > max {
                return Err(ConfigError::EmptyScatterRange { min, max });
            }
        }
        if let Some(driver) = &self.driver {
            if driver.omega.is_nan() || driver.omega <= 0.0 {
                return Err(ConfigError::NonPositiveOmega(driver.omega));
            }
        }
        Ok(())
    }

    /// Build the column chain these settings describe.
    pub fn build_chain(&self) -> Result<ColumnChain, ConfigError> {
        self.validate()?;
        let chain = ColumnChain::build(
            self.layout.column_count(),
            self.coefficients,
            self.initial,
            self.driver,
        )
        .with_update_order(self.update_order)
        .with_integrator(self.integrator);
        Ok(chain)
    }

    /// Run without a window, drawing each tick into `renderer`.
    ///
    /// Stops when the stop token fires or after `limit` ticks. Returns the
    /// number of ticks run.
    pub fn run_headless<R, P>(
        &self,
        renderer: &mut R,
        pacer: &mut P,
        limit: Option<u64>,
    ) -> Result<u64, ConfigError>
    where
        R: Renderer + ?Sized,
        P: Pacer + ?Sized,
    {
        let mut chain = self.build_chain()?;
        let mut scheduler = Scheduler::new(self.tick_rate).with_stop_token(self.stop.clone());
        if let Some(limit) = limit {
            scheduler = scheduler.with_limit(limit);
        }
        Ok(scheduler.run(&mut chain, renderer, pacer))
    }

    /// Open the window and run until it is closed or the stop token fires.
    pub fn run(self) -> Result<(), SimulationError> {
        let chain = self.build_chain()?;
        log::info!(
            "starting {}: {} columns of {}px at {} ticks/s",
            self.title,
            chain.len(),
            self.layout.column_width,
            self.tick_rate
        );

        let event_loop = EventLoop::new()?;
        let mut app = App::new(self, chain);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Ripples {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    layout: Layout,
    colors: ColorScheme,
    chain: ColumnChain,
    ticker: Ticker,
    time: Time,
    stop: StopToken,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    error: Option<SimulationError>,
}

impl App {
    fn new(ripples: Ripples, chain: ColumnChain) -> Self {
        let now = Instant::now();
        Self {
            title: ripples.title,
            layout: ripples.layout,
            colors: ripples.colors,
            chain,
            ticker: Ticker::new(ripples.tick_rate, now),
            time: Time::starting_at(now),
            stop: ripples.stop,
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.layout.width, self.layout.height))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        self.gpu_state = Some(pollster::block_on(GpuState::new(
            window,
            self.layout,
            self.chain.len(),
        ))?);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.ticker.poll(Instant::now()) {
            self.chain.tick();
            if self.time.update() {
                self.report_rate();
            }
        }

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        let bars = render::bars(&self.chain.frame(), &self.layout, &self.colors);

        match gpu_state.render(&bars) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }

    fn report_rate(&self) {
        let rate = self.time.fps();
        log::debug!(
            "tick {} at {:.1}s: {:.1} ticks/s (last gap {:.1}ms), energy {:.3}",
            self.time.frame(),
            self.time.elapsed().as_secs_f32(),
            rate,
            self.time.delta() * 1000.0,
            self.chain.energy()
        );
        if let Some(window) = &self.window {
            window.set_title(&format!("{} - {:.0} ticks/s", self.title, rate));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stop.is_stopped() {
            event_loop.exit();
            return;
        }
        if Instant::now() >= self.ticker.deadline() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.ticker.deadline()));
    }
}
