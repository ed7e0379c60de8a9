// SPDX-License-Identifier: CEPL-1.0
//! Ordered acquisition and reverse-order release of the bootstrap chain.
//!
//! STRICT ORDER:
//! 1) context (with validation layers and debug extension when enabled)
//! 2) debug hook, only when diagnostics are enabled
//! 3) surface from THIS context and the window
//! 4) device + queue family able to present to THIS surface
//! 5) logical device and its queue
//!
//! Teardown walks the same list backwards and only touches what was
//! actually created. Each handle is stored the moment it exists, so a
//! failure in step N+1 still sees step N.
use tracing::{debug, error, info};

use crate::api::GraphicsApi;
use crate::debug_hook::{self, DebugHookHandle};
use crate::device::{self, LogicalDevice};
use crate::diagnostics::Diagnostics;
use crate::error::BootstrapError;
use crate::instance::{self, AppInfo};
use crate::selector::{self, SelectedDevice};
use crate::surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    ContextReady,
    DiagnosticsReady,
    SurfaceReady,
    DeviceSelected,
    DeviceReady,
    Running,
    TornDown,
}

/// Current state plus every state entered so far, oldest first.
#[derive(Debug)]
struct StateTrail {
    current: LifecycleState,
    seen: Vec<LifecycleState>,
}

impl StateTrail {
    fn new() -> Self {
        StateTrail {
            current: LifecycleState::Uninitialized,
            seen: vec![LifecycleState::Uninitialized],
        }
    }

    fn enter(&mut self, next: LifecycleState) {
        debug!("lifecycle: {:?} -> {:?}", self.current, next);
        self.current = next;
        self.seen.push(next);
    }
}

/// Sole owner of every native handle in the chain.
pub struct Lifecycle<A: GraphicsApi> {
    api: A,
    diagnostics: Diagnostics,
    state: StateTrail,

    context: Option<A::Context>,
    debug_hook: Option<DebugHookHandle<A>>,
    surface: Option<A::Surface>,
    selected: Option<SelectedDevice<A::PhysicalDevice>>,
    device: Option<LogicalDevice<A::Device, A::Queue>>,
}

impl<A: GraphicsApi> Lifecycle<A> {
    pub fn new(api: A, diagnostics: Diagnostics) -> Self {
        Lifecycle {
            api,
            diagnostics,
            state: StateTrail::new(),
            context: None,
            debug_hook: None,
            surface: None,
            selected: None,
            device: None,
        }
    }

    /// `new` followed by `initialize`.
    pub fn bootstrap(
        api: A,
        diagnostics: Diagnostics,
        app: &AppInfo,
        window: &A::Window,
        window_extensions: &[String],
    ) -> Result<Self, BootstrapError> {
        let mut lifecycle = Self::new(api, diagnostics);
        lifecycle.initialize(app, window, window_extensions)?;
        Ok(lifecycle)
    }

    /// Runs every acquisition step. On failure everything already acquired
    /// is released before the error is returned, leaving `TornDown`.
    pub fn initialize(
        &mut self,
        app: &AppInfo,
        window: &A::Window,
        window_extensions: &[String],
    ) -> Result<(), BootstrapError> {
        if self.state.current != LifecycleState::Uninitialized {
            return Err(BootstrapError::InvalidTransition {
                from: self.state.current,
                to: LifecycleState::ContextReady,
            });
        }

        let result = self.acquire(app, window, window_extensions);
        if let Err(e) = &result {
            error!("bootstrap failed after {:?}: {e}", self.state.current);
            self.teardown();
        }
        result
    }

    fn acquire(
        &mut self,
        app: &AppInfo,
        window: &A::Window,
        window_extensions: &[String],
    ) -> Result<(), BootstrapError> {
        let context = self.context.insert(instance::create_context(
            &mut self.api,
            app,
            window_extensions,
            &self.diagnostics,
        )?);
        self.state.enter(LifecycleState::ContextReady);

        if let Some(hook) = debug_hook::attach(&mut self.api, context, &self.diagnostics)? {
            self.debug_hook = Some(hook);
            self.state.enter(LifecycleState::DiagnosticsReady);
        }

        let surface = self
            .surface
            .insert(surface::create_surface(&mut self.api, context, window)?);
        self.state.enter(LifecycleState::SurfaceReady);

        let selected = selector::select_device(&mut self.api, context, surface)?;
        self.selected = Some(selected);
        self.state.enter(LifecycleState::DeviceSelected);

        self.device = Some(device::create_logical_device(
            &mut self.api,
            context,
            &selected,
            &self.diagnostics,
        )?);
        self.state.enter(LifecycleState::DeviceReady);

        Ok(())
    }

    /// Hands control to the event loop.
    pub fn run(&mut self) -> Result<(), BootstrapError> {
        if self.state.current != LifecycleState::DeviceReady {
            return Err(BootstrapError::InvalidTransition {
                from: self.state.current,
                to: LifecycleState::Running,
            });
        }
        self.state.enter(LifecycleState::Running);
        Ok(())
    }

    /// Releases whatever is live, newest first. Safe to call any number of
    /// times and from any state.
    pub fn teardown(&mut self) {
        if self.state.current == LifecycleState::TornDown {
            return;
        }

        if let Some(dev) = self.device.take() {
            device::destroy_logical_device(&mut self.api, dev);
        }
        self.selected = None;

        if let Some(context) = self.context.as_ref() {
            if let Some(surface) = self.surface.take() {
                surface::destroy_surface(&mut self.api, context, surface);
            }
            debug_hook::detach(&mut self.api, context, self.debug_hook.take());
        }

        if let Some(context) = self.context.take() {
            self.api.destroy_context(context);
            info!("context destroyed");
        }

        self.state.enter(LifecycleState::TornDown);
    }

    pub fn state(&self) -> LifecycleState {
        self.state.current
    }

    /// Every state entered since construction, oldest first.
    pub fn history(&self) -> &[LifecycleState] {
        &self.state.seen
    }

    pub fn selected_device(&self) -> Option<&SelectedDevice<A::PhysicalDevice>> {
        self.selected.as_ref()
    }

    pub fn device(&self) -> Option<&LogicalDevice<A::Device, A::Queue>> {
        self.device.as_ref()
    }

    pub fn context(&self) -> Option<&A::Context> {
        self.context.as_ref()
    }
}

impl<A: GraphicsApi> Drop for Lifecycle<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}
