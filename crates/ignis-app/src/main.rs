// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
use anyhow::{Context, Result};
use clap::Parser;
use ignis_core::{init_tracing, AppConfig};
use ignis_platform::window_attributes;
use ignis_render::{AppInfo, Diagnostics, Lifecycle};
use ignis_render_vk::{required_extensions, AshApi};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

use ignis_platform::winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file; missing means defaults
    #[arg(long, default_value = "ignis.toml")]
    config: PathBuf,
}

fn app_info(cfg: &AppConfig) -> AppInfo {
    AppInfo {
        name: cfg.app.name.clone(),
        version: cfg.app.version,
        engine: cfg.app.engine.clone(),
        engine_version: cfg.app.engine_version,
    }
}

struct App {
    cfg: AppConfig,
    diagnostics: Diagnostics,

    // Declared before `window` so the surface goes before the window does.
    lifecycle: Option<Lifecycle<AshApi>>,
    window: Option<Window>,

    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cfg: AppConfig, diagnostics: Diagnostics) -> Self {
        App {
            cfg,
            diagnostics,
            lifecycle: None,
            window: None,
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(window_attributes(&self.cfg.window))
            .context("create_window")?;

        let extensions = required_extensions(&window)?;
        debug!("window extensions: {extensions:?}");

        let api = AshApi::load().context("vulkan bootstrap")?;
        let mut lifecycle = Lifecycle::bootstrap(
            api,
            self.diagnostics,
            &app_info(&self.cfg),
            &window,
            &extensions,
        )
        .context("vulkan bootstrap")?;
        lifecycle.run()?;
        debug!("lifecycle states: {:?}", lifecycle.history());
        info!("bootstrap complete, waiting for close");

        self.lifecycle = Some(lifecycle);
        self.window = Some(window);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(mut lifecycle) = self.lifecycle.take() {
            lifecycle.teardown();
        }
        self.window = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(window) = &self.window {
            if window_id != window.id() {
                return;
            }
        }

        if let WindowEvent::CloseRequested = event {
            info!("CloseRequested");
            self.shutdown();
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn run(args: Args) -> Result<()> {
    let cfg = AppConfig::load_or_default(&args.config);
    let diagnostics = Diagnostics::from_build();

    let event_loop: EventLoop<()> = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cfg, diagnostics);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    init_tracing("info");
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
