// SPDX-License-Identifier: CEPL-1.0
//! Windowing side of the bootstrap. The event loop and window live here;
//! the graphics core only ever sees borrowed handles.
pub use winit;

use ignis_core::WindowConfig;
use winit::{dpi::LogicalSize, window::WindowAttributes};

/// Attributes for the single presentation window. No client API is
/// attached by winit itself, so the surface is free for Vulkan.
pub fn window_attributes(cfg: &WindowConfig) -> WindowAttributes {
    tracing::debug!(
        "window attributes: \"{}\" {}x{} resizable={}",
        cfg.title,
        cfg.width,
        cfg.height,
        cfg.resizable
    );
    WindowAttributes::default()
        .with_title(cfg.title.clone())
        .with_inner_size(LogicalSize::new(cfg.width.max(1), cfg.height.max(1)))
        .with_resizable(cfg.resizable)
}
