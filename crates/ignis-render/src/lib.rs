// SPDX-License-Identifier: CEPL-1.0
//! API-agnostic half of the renderer bootstrap.
//!
//! Every native call goes through [`GraphicsApi`]; the pieces in here decide
//! what to ask for, in which order, and how to give it back.
pub mod api;
pub mod debug_hook;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod instance;
pub mod lifecycle;
pub mod selector;
pub mod surface;

#[cfg(test)]
mod mock;

pub use api::{
    ContextRequest, DebugHookFns, DeviceRequest, GraphicsApi, HookRequest, PresentTarget,
    QueueFamily,
};
pub use debug_hook::DebugHookHandle;
pub use device::LogicalDevice;
pub use diagnostics::{Diagnostics, DiagnosticsDesc, Severity, SeverityMask, SinkFn, Stream};
pub use error::BootstrapError;
pub use instance::AppInfo;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use selector::SelectedDevice;
