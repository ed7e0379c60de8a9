// SPDX-License-Identifier: CEPL-1.0
use tracing::info;

use crate::api::GraphicsApi;
use crate::error::BootstrapError;

/// Binds `window` to `context`. The window must outlive the surface.
pub fn create_surface<A: GraphicsApi>(
    api: &mut A,
    context: &A::Context,
    window: &A::Window,
) -> Result<A::Surface, BootstrapError> {
    let surface = api.create_surface(context, window)?;
    info!("presentation surface created");
    Ok(surface)
}

pub fn destroy_surface<A: GraphicsApi>(api: &mut A, context: &A::Context, surface: A::Surface) {
    api.destroy_surface(context, surface);
    info!("presentation surface destroyed");
}
