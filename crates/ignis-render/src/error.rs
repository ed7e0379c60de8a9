// SPDX-License-Identifier: CEPL-1.0
use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Every bootstrap failure is fatal; the variant names the step.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("validation layers requested, but not available: {}", .missing.join(", "))]
    UnsupportedLayer { missing: Vec<String> },
    #[error("failed to create a graphics context: {0}")]
    InstanceCreationFailed(String),
    #[error("extension {0} is not present")]
    ExtensionNotPresent(&'static str),
    #[error("failed to set up the debug messenger: {0}")]
    DebugHookCreationFailed(String),
    #[error("failed to create a presentation surface: {0}")]
    SurfaceCreationFailed(String),
    #[error("{}", no_device_message(.devices, .graphics_missing, .present_missing))]
    NoCompatibleDevice {
        devices: usize,
        graphics_missing: bool,
        present_missing: bool,
    },
    #[error("failed to create a logical device: {0}")]
    LogicalDeviceCreationFailed(String),
    #[error("{what} failed: {reason}")]
    Query { what: &'static str, reason: String },
    #[error("lifecycle cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}

fn no_device_message(devices: &usize, graphics_missing: &bool, present_missing: &bool) -> String {
    if *devices == 0 {
        return "no compatible device: no physical devices found".to_owned();
    }
    let mut reasons = Vec::new();
    if *graphics_missing {
        reasons.push("no graphics-capable queue family");
    }
    if *present_missing {
        reasons.push("no present-capable queue family");
    }
    if reasons.is_empty() {
        reasons.push("no queue family is both graphics- and present-capable");
    }
    format!(
        "no compatible device among {devices}: {}",
        reasons.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_device_messages_name_the_cause() {
        let empty = BootstrapError::NoCompatibleDevice {
            devices: 0,
            graphics_missing: true,
            present_missing: true,
        };
        assert_eq!(
            empty.to_string(),
            "no compatible device: no physical devices found"
        );

        let both = BootstrapError::NoCompatibleDevice {
            devices: 2,
            graphics_missing: true,
            present_missing: true,
        };
        assert_eq!(
            both.to_string(),
            "no compatible device among 2: no graphics-capable queue family; \
             no present-capable queue family"
        );

        let split = BootstrapError::NoCompatibleDevice {
            devices: 1,
            graphics_missing: false,
            present_missing: false,
        };
        assert!(split.to_string().ends_with("both graphics- and present-capable"));
    }

    #[test]
    fn missing_layers_are_listed() {
        let e = BootstrapError::UnsupportedLayer {
            missing: vec!["A".into(), "B".into()],
        };
        assert_eq!(
            e.to_string(),
            "validation layers requested, but not available: A, B"
        );
    }
}
