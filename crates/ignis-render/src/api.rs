// SPDX-License-Identifier: CEPL-1.0
//! The seam between the bootstrap sequence and a native graphics API.
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::diagnostics::{Diagnostics, SeverityMask};
use crate::error::BootstrapError;

/// Anything that can hand out both raw handles a surface needs.
pub trait PresentTarget: HasWindowHandle + HasDisplayHandle {}
impl<T: HasWindowHandle + HasDisplayHandle + ?Sized> PresentTarget for T {}

/// Everything the context is created with. Names are plain UTF-8; the
/// backend converts them to whatever the native call wants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextRequest {
    pub app_name: String,
    pub app_version: [u32; 3],
    pub engine_name: String,
    pub engine_version: [u32; 3],
    pub layers: Vec<String>,
    pub extensions: Vec<String>,
    /// Chained into context creation so messages emitted while the context
    /// is being built still reach the sink.
    pub debug: Option<HookRequest>,
}

/// What a debug hook listens for and where its messages go.
#[derive(Clone, Copy, Debug)]
pub struct HookRequest {
    pub severity: SeverityMask,
    pub diagnostics: Diagnostics,
}

// The sink is a fn pointer, which has no reliable equality.
impl PartialEq for HookRequest {
    fn eq(&self, other: &Self) -> bool {
        self.severity == other.severity
            && self.diagnostics.is_enabled() == other.diagnostics.is_enabled()
            && self.diagnostics.info_messages() == other.diagnostics.info_messages()
    }
}
impl Eq for HookRequest {}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceRequest {
    pub queue_family: u32,
    pub queue_priorities: Vec<f32>,
    /// Only for loaders that still honour device-level layers.
    pub layers: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueFamily {
    pub graphics: bool,
    pub queue_count: u32,
}

/// Resolved debug-hook entry points. Absent when the context does not
/// expose the extension.
pub struct DebugHookFns<A: GraphicsApi> {
    pub attach:
        fn(&mut A, &A::Context, &HookRequest) -> Result<A::DebugHook, BootstrapError>,
    pub detach: fn(&mut A, &A::Context, A::DebugHook),
}

impl<A: GraphicsApi> Clone for DebugHookFns<A> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<A: GraphicsApi> Copy for DebugHookFns<A> {}

/// Native operations the bootstrap sequence is built from. Handles are
/// opaque; nothing outside the implementation looks inside them.
pub trait GraphicsApi: Sized {
    type Context;
    type DebugHook;
    type Surface;
    type PhysicalDevice: Copy + PartialEq + std::fmt::Debug;
    type Device;
    type Queue: Copy;
    type Window: ?Sized;

    /// Instance extension that carries the debug hook.
    const DEBUG_EXTENSION: &'static str;

    fn available_layers(&mut self) -> Result<Vec<String>, BootstrapError>;
    fn create_context(&mut self, request: &ContextRequest)
        -> Result<Self::Context, BootstrapError>;
    fn destroy_context(&mut self, context: Self::Context);

    fn debug_hook_fns(&mut self, context: &Self::Context) -> Option<DebugHookFns<Self>>;

    fn create_surface(
        &mut self,
        context: &Self::Context,
        window: &Self::Window,
    ) -> Result<Self::Surface, BootstrapError>;
    fn destroy_surface(&mut self, context: &Self::Context, surface: Self::Surface);

    fn physical_devices(
        &mut self,
        context: &Self::Context,
    ) -> Result<Vec<Self::PhysicalDevice>, BootstrapError>;
    fn queue_families(
        &mut self,
        context: &Self::Context,
        device: Self::PhysicalDevice,
    ) -> Vec<QueueFamily>;
    fn surface_support(
        &mut self,
        context: &Self::Context,
        device: Self::PhysicalDevice,
        queue_family: u32,
        surface: &Self::Surface,
    ) -> Result<bool, BootstrapError>;
    fn device_name(&mut self, _context: &Self::Context, device: Self::PhysicalDevice) -> String {
        format!("{device:?}")
    }

    fn create_device(
        &mut self,
        context: &Self::Context,
        device: Self::PhysicalDevice,
        request: &DeviceRequest,
    ) -> Result<Self::Device, BootstrapError>;
    fn device_queue(&mut self, device: &Self::Device, queue_family: u32, index: u32)
        -> Self::Queue;
    fn destroy_device(&mut self, device: Self::Device);
}
