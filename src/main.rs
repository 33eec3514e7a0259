use anyhow::{anyhow, bail, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use spacetouch::cli::Cli;
use spacetouch::core::{AdapterChoice, Clock, DisplayContext, GpuContext, SurfaceRenderer, WinitInput};
use spacetouch::cpu::CpuSampler;
use spacetouch::loaders::MediaSet;
use spacetouch::plane::{GpuPlaneDevice, PlaneDevice, PlaneManager, SoftwarePlaneDevice};
use spacetouch::SpaceTouch;

const PLANES_REQUIRED: &str = "This demo requires a display controller with overlay planes \
    and a valid planes screen configuration file.";

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    demo: Option<SpaceTouch>,
    input: WinitInput,
    clock: Clock,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self {
            cli,
            window: None,
            demo: None,
            input: WinitInput::new(),
            clock: Clock::new(),
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let viewport = DisplayContext::new(self.cli.width, self.cli.height);
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("SpaceTouch")
                        .with_inner_size(PhysicalSize::new(viewport.width, viewport.height))
                        .with_resizable(false),
                )
                .map_err(|e| anyhow!("Failed to create window: {}", e))?,
        );

        let media = MediaSet::load(&self.cli.media)?;
        let planes = build_planes(&self.cli, &window, viewport)?;
        let demo = SpaceTouch::new(
            planes,
            &media,
            viewport,
            CpuSampler::new(&self.cli.stat),
            self.cli.sample_interval(),
        )?;

        self.window = Some(window);
        self.demo = Some(demo);
        self.clock = Clock::new();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failure = Some(error);
        event_loop.exit();
    }
}

/// Hardware planes first, software compositing when they cannot be set up
fn build_planes(cli: &Cli, window: &Arc<Window>, viewport: DisplayContext) -> Result<PlaneManager> {
    if !cli.software {
        match pollster::block_on(GpuContext::for_window(window.clone(), AdapterChoice::Hardware)) {
            Ok((gpu, surface)) => {
                let device: Box<dyn PlaneDevice> = Box::new(GpuPlaneDevice::new(
                    gpu,
                    surface,
                    viewport.size(),
                    cli.hw_planes,
                ));
                let mut planes = PlaneManager::new(device);
                if planes.load(&cli.screen) {
                    return Ok(planes);
                }
            }
            Err(e) => log::warn!("hardware planes unavailable: {}", e),
        }
        if cli.require_planes {
            bail!("Failure setting up planes. {}", PLANES_REQUIRED);
        }
        log::warn!("falling back to software plane compositing");
    }

    let presenter = software_presenter(window, viewport)?;
    let device: Box<dyn PlaneDevice> = Box::new(
        SoftwarePlaneDevice::new(viewport.size(), SoftwarePlaneDevice::DEFAULT_PLANES)
            .with_presenter(Box::new(presenter)),
    );
    let mut planes = PlaneManager::new(device);
    if !planes.load(&cli.screen) {
        bail!("Failed to set up planes from {:?}", cli.screen);
    }
    Ok(planes)
}

fn software_presenter(window: &Arc<Window>, viewport: DisplayContext) -> Result<SurfaceRenderer> {
    let (gpu, surface) =
        match pollster::block_on(GpuContext::for_window(window.clone(), AdapterChoice::Hardware)) {
            Ok(ready) => ready,
            Err(e) => {
                log::warn!("no hardware adapter ({}), trying the fallback adapter", e);
                pollster::block_on(GpuContext::for_window(window.clone(), AdapterChoice::Fallback))
                    .map_err(|e| anyhow!("Failed to initialize GPU: {}", e))?
            }
        };
    Ok(SurfaceRenderer::new(gpu, surface, viewport.size()))
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.demo.is_none() {
            if let Err(e) = self.start(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(demo) = &mut self.demo else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => demo.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = demo.render() {
                    log::error!("Render error: {}", e);
                }
            }
            event => {
                if let Some(input) = self.input.process_event(&event) {
                    if !demo.handle_input(&input) {
                        event_loop.exit();
                        return;
                    }
                }
                if demo.needs_redraw() {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(demo) = &mut self.demo else {
            return;
        };

        demo.tick(self.clock.tick());
        if demo.needs_redraw() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + demo.next_tick()));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let event_loop = EventLoop::new().map_err(|e| anyhow!("Failed to create event loop: {}", e))?;
    let mut app = App::new(cli);

    log::info!("SpaceTouch - drag to move the layers, 0 or Escape to quit");
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("Event loop failed: {}", e))?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
