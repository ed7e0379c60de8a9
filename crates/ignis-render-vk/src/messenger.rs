// SPDX-License-Identifier: CEPL-1.0
//! VK_EXT_debug_utils messenger: create info, callback, attach/detach.
use std::ffi::{c_void, CStr};

use ash::ext::debug_utils;
use ash::vk;

use ignis_render::{BootstrapError, Diagnostics, HookRequest, Severity, SeverityMask};

use crate::{AshApi, VkContext};

/// Live messenger and the loader that destroys it.
pub struct VkDebugHook {
    loader: debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

pub(crate) fn severity_flags(mask: SeverityMask) -> vk::DebugUtilsMessageSeverityFlagsEXT {
    let mut flags = vk::DebugUtilsMessageSeverityFlagsEXT::empty();
    if mask.contains(SeverityMask::VERBOSE) {
        flags |= vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE;
    }
    if mask.contains(SeverityMask::INFO) {
        flags |= vk::DebugUtilsMessageSeverityFlagsEXT::INFO;
    }
    if mask.contains(SeverityMask::WARNING) {
        flags |= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING;
    }
    if mask.contains(SeverityMask::ERROR) {
        flags |= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
    }
    flags
}

fn severity_of(flags: vk::DebugUtilsMessageSeverityFlagsEXT) -> Severity {
    if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        Severity::Error
    } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        Severity::Warning
    } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        Severity::Info
    } else {
        Severity::Verbose
    }
}

/// `user_data` is the `Diagnostics` pinned by the `AshApi`.
unsafe extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    user: *mut c_void,
) -> vk::Bool32 {
    if data.is_null() || user.is_null() {
        return vk::FALSE;
    }
    // SAFETY: the driver hands back the pointer we registered; the boxed
    // Diagnostics outlives every instance and messenger.
    let diagnostics = unsafe { &*(user as *const Diagnostics) };
    let p_message = unsafe { (*data).p_message };
    if !p_message.is_null() {
        let msg = unsafe { CStr::from_ptr(p_message) }.to_string_lossy();
        diagnostics.emit(severity_of(severity), &msg);
    }
    vk::FALSE
}

pub(crate) fn create_info<'a>(
    request: &HookRequest,
    sink: *const Diagnostics,
) -> vk::DebugUtilsMessengerCreateInfoEXT<'a> {
    vk::DebugUtilsMessengerCreateInfoEXT {
        s_type: vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT,
        message_severity: severity_flags(request.severity),
        message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
            | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
            | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        pfn_user_callback: Some(debug_callback),
        p_user_data: sink as *mut c_void,
        ..Default::default()
    }
}

pub(crate) fn attach(
    api: &mut AshApi,
    context: &VkContext,
    request: &HookRequest,
) -> Result<VkDebugHook, BootstrapError> {
    let loader = debug_utils::Instance::new(api.entry(), context.instance());
    let info = create_info(request, api.sink_ptr(request));
    let messenger = unsafe { loader.create_debug_utils_messenger(&info, None) }
        .map_err(|e| BootstrapError::DebugHookCreationFailed(e.to_string()))?;
    Ok(VkDebugHook { loader, messenger })
}

pub(crate) fn detach(_api: &mut AshApi, _context: &VkContext, hook: VkDebugHook) {
    unsafe {
        hook.loader
            .destroy_debug_utils_messenger(hook.messenger, None)
    };
}
