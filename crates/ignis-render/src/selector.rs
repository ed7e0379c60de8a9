// SPDX-License-Identifier: CEPL-1.0
//! Physical device and queue family selection.
//!
//! First match wins: devices in enumeration order, families in index order,
//! and the first family that can both draw and present to the surface is
//! taken. Families without queues are skipped. There is no ranking.
use tracing::{debug, error, info, warn};

use crate::api::GraphicsApi;
use crate::error::BootstrapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedDevice<P> {
    pub physical_device: P,
    pub queue_family: u32,
}

pub fn select_device<A: GraphicsApi>(
    api: &mut A,
    context: &A::Context,
    surface: &A::Surface,
) -> Result<SelectedDevice<A::PhysicalDevice>, BootstrapError> {
    let devices = api.physical_devices(context)?;
    if devices.is_empty() {
        error!("no physical devices exposed by the context");
        return Err(BootstrapError::NoCompatibleDevice {
            devices: 0,
            graphics_missing: true,
            present_missing: true,
        });
    }

    let mut any_graphics = false;
    let mut any_present = false;

    for &phys in &devices {
        let families = api.queue_families(context, phys);
        debug!("{phys:?}: {} queue famil(ies)", families.len());

        for (i, family) in families.iter().enumerate() {
            let index = i as u32;
            if family.queue_count == 0 {
                debug!("{phys:?} family {index} exposes no queues");
                continue;
            }
            let present = match api.surface_support(context, phys, index, surface) {
                Ok(p) => p,
                Err(e) => {
                    warn!("present query for {phys:?} family {index}: {e}");
                    false
                }
            };
            any_graphics |= family.graphics;
            any_present |= present;

            if family.graphics && present {
                let name = api.device_name(context, phys);
                info!("selected device \"{name}\", queue family {index}");
                return Ok(SelectedDevice {
                    physical_device: phys,
                    queue_family: index,
                });
            }
        }
    }

    if !any_graphics {
        error!("no device exposes a graphics-capable queue family");
    }
    if !any_present {
        error!("no device exposes a queue family that can present to the surface");
    }
    Err(BootstrapError::NoCompatibleDevice {
        devices: devices.len(),
        graphics_missing: !any_graphics,
        present_missing: !any_present,
    })
}
