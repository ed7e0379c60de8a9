// SPDX-License-Identifier: CEPL-1.0
//! Recording stand-in for a native API, used by the unit tests.
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{
    ContextRequest, DebugHookFns, DeviceRequest, GraphicsApi, HookRequest, QueueFamily,
};
use crate::error::BootstrapError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    EnumerateLayers,
    CreateContext(ContextRequest),
    DestroyContext,
    ResolveDebugHook,
    AttachDebugHook,
    DetachDebugHook,
    CreateSurface,
    DestroySurface,
    EnumerateDevices,
    QueueFamilies(u32),
    SurfaceSupport(u32, u32),
    CreateDevice(u32, DeviceRequest),
    GetQueue(u32, u32),
    DestroyDevice,
}

/// Where an injected failure happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Context,
    DebugHook,
    Surface,
    Enumerate,
    Device,
}

#[derive(Debug, Clone, Copy)]
pub struct MockFamily {
    pub graphics: bool,
    pub present: bool,
    pub queues: u32,
}

#[derive(Debug, Clone)]
pub struct MockDevice {
    pub families: Vec<MockFamily>,
}

impl MockDevice {
    pub fn new(families: Vec<MockFamily>) -> Self {
        MockDevice { families }
    }
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

pub struct MockApi {
    pub layers: Vec<String>,
    pub devices: Vec<MockDevice>,
    pub debug_hook_available: bool,
    pub broken_support_query: Option<(u32, u32)>,
    fail: Option<Step>,
    journal: Journal,
}

impl MockApi {
    /// One device with one graphics+present family, validation installed.
    pub fn new() -> Self {
        MockApi {
            layers: vec!["VK_LAYER_KHRONOS_validation".to_owned()],
            devices: vec![MockDevice::new(vec![MockFamily {
                graphics: true,
                present: true,
                queues: 1,
            }])],
            debug_hook_available: true,
            broken_support_query: None,
            fail: None,
            journal: Rc::default(),
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail = Some(step);
        self
    }

    pub fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }

    fn fails(&self, step: Step) -> bool {
        self.fail == Some(step)
    }
}

fn attach(
    api: &mut MockApi,
    _context: &u32,
    _request: &HookRequest,
) -> Result<u32, BootstrapError> {
    api.record(Call::AttachDebugHook);
    if api.fails(Step::DebugHook) {
        return Err(BootstrapError::DebugHookCreationFailed("injected".into()));
    }
    Ok(7)
}

fn detach(api: &mut MockApi, _context: &u32, _hook: u32) {
    api.record(Call::DetachDebugHook);
}

impl GraphicsApi for MockApi {
    type Context = u32;
    type DebugHook = u32;
    type Surface = u32;
    type PhysicalDevice = u32;
    type Device = u32;
    type Queue = (u32, u32);
    type Window = ();

    const DEBUG_EXTENSION: &'static str = "VK_EXT_debug_utils";

    fn available_layers(&mut self) -> Result<Vec<String>, BootstrapError> {
        self.record(Call::EnumerateLayers);
        Ok(self.layers.clone())
    }

    fn create_context(&mut self, request: &ContextRequest) -> Result<u32, BootstrapError> {
        self.record(Call::CreateContext(request.clone()));
        if self.fails(Step::Context) {
            return Err(BootstrapError::InstanceCreationFailed("injected".into()));
        }
        Ok(1)
    }

    fn destroy_context(&mut self, _context: u32) {
        self.record(Call::DestroyContext);
    }

    fn debug_hook_fns(&mut self, _context: &u32) -> Option<DebugHookFns<Self>> {
        self.record(Call::ResolveDebugHook);
        self.debug_hook_available.then_some(DebugHookFns { attach, detach })
    }

    fn create_surface(&mut self, _context: &u32, _window: &()) -> Result<u32, BootstrapError> {
        self.record(Call::CreateSurface);
        if self.fails(Step::Surface) {
            return Err(BootstrapError::SurfaceCreationFailed("injected".into()));
        }
        Ok(2)
    }

    fn destroy_surface(&mut self, _context: &u32, _surface: u32) {
        self.record(Call::DestroySurface);
    }

    fn physical_devices(&mut self, _context: &u32) -> Result<Vec<u32>, BootstrapError> {
        self.record(Call::EnumerateDevices);
        if self.fails(Step::Enumerate) {
            return Err(BootstrapError::Query {
                what: "physical device enumeration",
                reason: "injected".into(),
            });
        }
        Ok((0..self.devices.len() as u32).collect())
    }

    fn queue_families(&mut self, _context: &u32, device: u32) -> Vec<QueueFamily> {
        self.record(Call::QueueFamilies(device));
        self.devices[device as usize]
            .families
            .iter()
            .map(|f| QueueFamily {
                graphics: f.graphics,
                queue_count: f.queues,
            })
            .collect()
    }

    fn surface_support(
        &mut self,
        _context: &u32,
        device: u32,
        queue_family: u32,
        _surface: &u32,
    ) -> Result<bool, BootstrapError> {
        self.record(Call::SurfaceSupport(device, queue_family));
        if self.broken_support_query == Some((device, queue_family)) {
            return Err(BootstrapError::Query {
                what: "surface support",
                reason: "injected".into(),
            });
        }
        Ok(self.devices[device as usize].families[queue_family as usize].present)
    }

    fn create_device(
        &mut self,
        _context: &u32,
        device: u32,
        request: &DeviceRequest,
    ) -> Result<u32, BootstrapError> {
        self.record(Call::CreateDevice(device, request.clone()));
        if self.fails(Step::Device) {
            return Err(BootstrapError::LogicalDeviceCreationFailed("injected".into()));
        }
        Ok(10)
    }

    fn device_queue(&mut self, _device: &u32, queue_family: u32, index: u32) -> (u32, u32) {
        self.record(Call::GetQueue(queue_family, index));
        (queue_family, index)
    }

    fn destroy_device(&mut self, _device: u32) {
        self.record(Call::DestroyDevice);
    }
}
