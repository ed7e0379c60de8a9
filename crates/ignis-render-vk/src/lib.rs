// SPDX-License-Identifier: CEPL-1.0
#![deny(unsafe_op_in_unsafe_fn)]
//! `ash` backend for the bootstrap sequence.
use anyhow::{anyhow, Context as _, Result};
use std::ffi::{c_char, CStr, CString, NulError};
use std::ptr;
use tracing::{debug, warn};

use ash::khr::surface;
use ash::{vk, Entry, Instance};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use ignis_render::{
    BootstrapError, ContextRequest, DebugHookFns, DeviceRequest, Diagnostics, GraphicsApi,
    HookRequest, PresentTarget, QueueFamily,
};

mod messenger;

pub use messenger::VkDebugHook;

/// Instance plus the surface entry points loaded against it.
pub struct VkContext {
    instance: Instance,
    surface_loader: surface::Instance,
}

impl VkContext {
    pub fn instance(&self) -> &Instance {
        &self.instance
    }
}

/// Heap slot for the `Diagnostics` handed to the driver as callback user
/// data. Filled by the first hook request and never moved or replaced
/// afterwards, since live instances and messengers point into it.
#[derive(Default)]
struct SinkSlot(Option<Box<Diagnostics>>);

impl SinkSlot {
    fn pin(&mut self, diagnostics: &Diagnostics) -> *const Diagnostics {
        &**self.0.get_or_insert_with(|| Box::new(*diagnostics))
    }
}

pub struct AshApi {
    entry: Entry,
    sink: SinkSlot,
}

impl AshApi {
    /// Loads the Vulkan loader at runtime.
    pub fn load() -> Result<Self, BootstrapError> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| BootstrapError::InstanceCreationFailed(format!("loading Vulkan: {e}")))?;
        Ok(AshApi {
            entry,
            sink: SinkSlot::default(),
        })
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    fn sink_ptr(&mut self, hook: &HookRequest) -> *const Diagnostics {
        self.sink.pin(&hook.diagnostics)
    }
}

/// Instance extensions the windowing system needs to present.
pub fn required_extensions(display: &dyn HasDisplayHandle) -> Result<Vec<String>> {
    let raw = display
        .display_handle()
        .map_err(|e| anyhow!("{e}"))?
        .as_raw();
    let names = ash_window::enumerate_required_extensions(raw)
        .context("enumerate_required_extensions")?;
    Ok(names
        .iter()
        .map(|&p| unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned())
        .collect())
}

fn cstrings(names: &[String]) -> Result<Vec<CString>, NulError> {
    names.iter().map(|n| CString::new(n.as_str())).collect()
}

fn pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|n| n.as_ptr()).collect()
}

fn pack_version(v: [u32; 3]) -> u32 {
    vk::make_api_version(0, v[0], v[1], v[2])
}

fn fixed_str(raw: &[c_char]) -> String {
    unsafe { CStr::from_ptr(raw.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

impl GraphicsApi for AshApi {
    type Context = VkContext;
    type DebugHook = VkDebugHook;
    type Surface = vk::SurfaceKHR;
    type PhysicalDevice = vk::PhysicalDevice;
    type Device = ash::Device;
    type Queue = vk::Queue;
    type Window = dyn PresentTarget;

    const DEBUG_EXTENSION: &'static str = "VK_EXT_debug_utils";

    fn available_layers(&mut self) -> Result<Vec<String>, BootstrapError> {
        let props = unsafe { self.entry.enumerate_instance_layer_properties() }.map_err(|e| {
            BootstrapError::Query {
                what: "vkEnumerateInstanceLayerProperties",
                reason: e.to_string(),
            }
        })?;
        Ok(props.iter().map(|p| fixed_str(&p.layer_name)).collect())
    }

    fn create_context(&mut self, request: &ContextRequest) -> Result<VkContext, BootstrapError> {
        let bad_name = |e: NulError| BootstrapError::InstanceCreationFailed(e.to_string());
        let app_name = CString::new(request.app_name.as_str()).map_err(bad_name)?;
        let engine_name = CString::new(request.engine_name.as_str()).map_err(bad_name)?;
        let layers = cstrings(&request.layers).map_err(bad_name)?;
        let extensions = cstrings(&request.extensions).map_err(bad_name)?;
        let layer_ptrs = pointers(&layers);
        let ext_ptrs = pointers(&extensions);

        let app_info = vk::ApplicationInfo {
            s_type: vk::StructureType::APPLICATION_INFO,
            p_application_name: app_name.as_ptr(),
            application_version: pack_version(request.app_version),
            p_engine_name: engine_name.as_ptr(),
            engine_version: pack_version(request.engine_version),
            api_version: vk::API_VERSION_1_0,
            ..Default::default()
        };

        // Instance-creation-time messages go through this chained messenger.
        let debug_info = request
            .debug
            .as_ref()
            .map(|hook| messenger::create_info(hook, self.sink_ptr(hook)));
        let p_next = debug_info
            .as_ref()
            .map_or(ptr::null(), |info| ptr::from_ref(info).cast());

        let create_info = vk::InstanceCreateInfo {
            s_type: vk::StructureType::INSTANCE_CREATE_INFO,
            p_next,
            p_application_info: &app_info,
            enabled_layer_count: layer_ptrs.len() as u32,
            pp_enabled_layer_names: layer_ptrs.as_ptr(),
            enabled_extension_count: ext_ptrs.len() as u32,
            pp_enabled_extension_names: ext_ptrs.as_ptr(),
            ..Default::default()
        };

        let instance = unsafe { self.entry.create_instance(&create_info, None) }
            .map_err(|e| BootstrapError::InstanceCreationFailed(format!("vkCreateInstance: {e}")))?;
        let surface_loader = surface::Instance::new(&self.entry, &instance);
        Ok(VkContext {
            instance,
            surface_loader,
        })
    }

    fn destroy_context(&mut self, context: VkContext) {
        unsafe { context.instance.destroy_instance(None) };
    }

    fn debug_hook_fns(&mut self, context: &VkContext) -> Option<DebugHookFns<Self>> {
        let handle = context.instance.handle();
        let create = unsafe {
            self.entry
                .get_instance_proc_addr(handle, c"vkCreateDebugUtilsMessengerEXT".as_ptr())
        };
        let destroy = unsafe {
            self.entry
                .get_instance_proc_addr(handle, c"vkDestroyDebugUtilsMessengerEXT".as_ptr())
        };
        if create.is_none() || destroy.is_none() {
            warn!("debug utils entry points not exposed by this instance");
            return None;
        }
        Some(DebugHookFns {
            attach: messenger::attach,
            detach: messenger::detach,
        })
    }

    fn create_surface(
        &mut self,
        context: &VkContext,
        window: &dyn PresentTarget,
    ) -> Result<vk::SurfaceKHR, BootstrapError> {
        let failed = BootstrapError::SurfaceCreationFailed;
        let dh = window
            .display_handle()
            .map_err(|e| failed(e.to_string()))?
            .as_raw();
        let wh = window
            .window_handle()
            .map_err(|e| failed(e.to_string()))?
            .as_raw();
        unsafe { ash_window::create_surface(&self.entry, &context.instance, dh, wh, None) }
            .map_err(|e| failed(format!("ash_window::create_surface: {e}")))
    }

    fn destroy_surface(&mut self, context: &VkContext, surface: vk::SurfaceKHR) {
        unsafe { context.surface_loader.destroy_surface(surface, None) };
    }

    fn physical_devices(
        &mut self,
        context: &VkContext,
    ) -> Result<Vec<vk::PhysicalDevice>, BootstrapError> {
        unsafe { context.instance.enumerate_physical_devices() }.map_err(|e| {
            BootstrapError::Query {
                what: "vkEnumeratePhysicalDevices",
                reason: e.to_string(),
            }
        })
    }

    fn queue_families(
        &mut self,
        context: &VkContext,
        device: vk::PhysicalDevice,
    ) -> Vec<QueueFamily> {
        unsafe {
            context
                .instance
                .get_physical_device_queue_family_properties(device)
        }
        .iter()
        .map(|q| QueueFamily {
            graphics: q.queue_flags.contains(vk::QueueFlags::GRAPHICS),
            queue_count: q.queue_count,
        })
        .collect()
    }

    fn surface_support(
        &mut self,
        context: &VkContext,
        device: vk::PhysicalDevice,
        queue_family: u32,
        surface: &vk::SurfaceKHR,
    ) -> Result<bool, BootstrapError> {
        unsafe {
            context
                .surface_loader
                .get_physical_device_surface_support(device, queue_family, *surface)
        }
        .map_err(|e| BootstrapError::Query {
            what: "vkGetPhysicalDeviceSurfaceSupportKHR",
            reason: e.to_string(),
        })
    }

    fn device_name(&mut self, context: &VkContext, device: vk::PhysicalDevice) -> String {
        let props = unsafe { context.instance.get_physical_device_properties(device) };
        format!("{} ({:?})", fixed_str(&props.device_name), props.device_type)
    }

    fn create_device(
        &mut self,
        context: &VkContext,
        device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> Result<ash::Device, BootstrapError> {
        let layers = cstrings(&request.layers)
            .map_err(|e| BootstrapError::LogicalDeviceCreationFailed(e.to_string()))?;
        let layer_ptrs = pointers(&layers);

        let qinfo = vk::DeviceQueueCreateInfo {
            s_type: vk::StructureType::DEVICE_QUEUE_CREATE_INFO,
            queue_family_index: request.queue_family,
            queue_count: request.queue_priorities.len() as u32,
            p_queue_priorities: request.queue_priorities.as_ptr(),
            ..Default::default()
        };

        let features = vk::PhysicalDeviceFeatures::default();

        #[allow(deprecated)]
        let dinfo = vk::DeviceCreateInfo {
            s_type: vk::StructureType::DEVICE_CREATE_INFO,
            queue_create_info_count: 1,
            p_queue_create_infos: &qinfo,
            enabled_layer_count: layer_ptrs.len() as u32,
            pp_enabled_layer_names: layer_ptrs.as_ptr(),
            p_enabled_features: &features,
            ..Default::default()
        };

        unsafe { context.instance.create_device(device, &dinfo, None) }.map_err(|e| {
            BootstrapError::LogicalDeviceCreationFailed(format!("vkCreateDevice: {e}"))
        })
    }

    fn device_queue(&mut self, device: &ash::Device, queue_family: u32, index: u32) -> vk::Queue {
        unsafe { device.get_device_queue(queue_family, index) }
    }

    fn destroy_device(&mut self, device: ash::Device) {
        unsafe {
            device.device_wait_idle().ok();
            device.destroy_device(None);
        }
        debug!("vkDestroyDevice done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_extension_matches_ash() {
        assert_eq!(
            ash::ext::debug_utils::NAME.to_str().unwrap(),
            AshApi::DEBUG_EXTENSION
        );
    }

    #[test]
    fn versions_pack_as_api_versions() {
        let v = pack_version([1, 2, 3]);
        assert_eq!(vk::api_version_major(v), 1);
        assert_eq!(vk::api_version_minor(v), 2);
        assert_eq!(vk::api_version_patch(v), 3);
        assert_eq!(pack_version([1, 0, 0]), vk::API_VERSION_1_0);
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(cstrings(&["ok".into(), "b\0ad".into()]).is_err());
        let names = cstrings(&["VK_LAYER_KHRONOS_validation".into()]).unwrap();
        assert_eq!(pointers(&names).len(), 1);
    }

    #[test]
    fn sink_slot_keeps_the_first_diagnostics() {
        let mut slot = SinkSlot::default();
        let first = slot.pin(&Diagnostics::new(true, true));
        let again = slot.pin(&Diagnostics::new(true, false));
        assert_eq!(first, again);
        let pinned = unsafe { &*first };
        assert!(pinned.is_enabled());
        assert!(pinned.info_messages());
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        let mut raw = [0 as c_char; 8];
        for (dst, src) in raw.iter_mut().zip(b"gpu0") {
            *dst = *src as c_char;
        }
        assert_eq!(fixed_str(&raw), "gpu0");
    }
}
