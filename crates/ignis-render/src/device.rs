// SPDX-License-Identifier: CEPL-1.0
use tracing::info;

use crate::api::{DeviceRequest, GraphicsApi};
use crate::diagnostics::Diagnostics;
use crate::error::BootstrapError;
use crate::selector::SelectedDevice;

/// Logical device and its single queue.
#[derive(Debug)]
pub struct LogicalDevice<D, Q> {
    pub device: D,
    pub queue: Q,
    pub queue_family: u32,
}

/// One queue at full priority, no optional features. Validation layers are
/// repeated at device level for loaders that still read them there.
pub fn device_request<P>(
    selected: &SelectedDevice<P>,
    diagnostics: &Diagnostics,
) -> DeviceRequest {
    DeviceRequest {
        queue_family: selected.queue_family,
        queue_priorities: vec![1.0],
        layers: diagnostics.layer_names(),
    }
}

pub fn create_logical_device<A: GraphicsApi>(
    api: &mut A,
    context: &A::Context,
    selected: &SelectedDevice<A::PhysicalDevice>,
    diagnostics: &Diagnostics,
) -> Result<LogicalDevice<A::Device, A::Queue>, BootstrapError> {
    let request = device_request(selected, diagnostics);
    let device = api.create_device(context, selected.physical_device, &request)?;
    let queue = api.device_queue(&device, selected.queue_family, 0);
    info!(
        "logical device created (queue family {})",
        selected.queue_family
    );
    Ok(LogicalDevice {
        device,
        queue,
        queue_family: selected.queue_family,
    })
}

pub fn destroy_logical_device<A: GraphicsApi>(
    api: &mut A,
    device: LogicalDevice<A::Device, A::Queue>,
) {
    api.destroy_device(device.device);
    info!("logical device destroyed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockApi, Step};

    const PICK: SelectedDevice<u32> = SelectedDevice {
        physical_device: 0,
        queue_family: 3,
    };

    #[test]
    fn one_queue_at_full_priority() {
        let req = device_request(&PICK, &Diagnostics::disabled());
        assert_eq!(req.queue_family, 3);
        assert_eq!(req.queue_priorities, vec![1.0]);
        assert!(req.layers.is_empty());
    }

    #[test]
    fn device_layers_mirror_validation_layers() {
        let diag = Diagnostics::new(true, false);
        let req = device_request(&PICK, &diag);
        assert_eq!(req.layers, diag.layer_names());
    }

    #[test]
    fn queue_zero_is_fetched_from_the_selected_family() {
        let mut api = MockApi::new();
        let journal = api.journal();
        let dev = create_logical_device(&mut api, &1, &PICK, &Diagnostics::disabled()).unwrap();
        assert_eq!(dev.queue_family, 3);
        assert_eq!(dev.queue, (3, 0));
        let calls = journal.borrow();
        assert!(matches!(calls[0], Call::CreateDevice(0, _)));
        assert_eq!(calls[1], Call::GetQueue(3, 0));
    }

    #[test]
    fn creation_failure_is_reported() {
        let mut api = MockApi::new().failing_at(Step::Device);
        let err = create_logical_device(&mut api, &1, &PICK, &Diagnostics::disabled()).unwrap_err();
        assert!(matches!(err, BootstrapError::LogicalDeviceCreationFailed(_)));
    }
}
