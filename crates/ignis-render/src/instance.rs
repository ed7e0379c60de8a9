// SPDX-License-Identifier: CEPL-1.0
//! Context creation: layer check, extension list, then the native call.
use tracing::info;

use crate::api::{ContextRequest, GraphicsApi};
use crate::diagnostics::Diagnostics;
use crate::error::BootstrapError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: [u32; 3],
    pub engine: String,
    pub engine_version: [u32; 3],
}

impl Default for AppInfo {
    fn default() -> Self {
        AppInfo {
            name: "Hello Triangle".to_owned(),
            version: [1, 0, 0],
            engine: "No Engine".to_owned(),
            engine_version: [1, 0, 0],
        }
    }
}

/// Builds the request without touching the platform. With diagnostics off
/// the extension list is exactly what the window needs and no layers are
/// asked for.
pub fn context_request<A: GraphicsApi>(
    app: &AppInfo,
    window_extensions: &[String],
    diagnostics: &Diagnostics,
) -> ContextRequest {
    let mut extensions = window_extensions.to_vec();
    if diagnostics.is_enabled() && !extensions.iter().any(|e| e == A::DEBUG_EXTENSION) {
        extensions.push(A::DEBUG_EXTENSION.to_owned());
    }

    ContextRequest {
        app_name: app.name.clone(),
        app_version: app.version,
        engine_name: app.engine.clone(),
        engine_version: app.engine_version,
        layers: diagnostics.layer_names(),
        extensions,
        debug: diagnostics.hook_request(),
    }
}

/// Fails with the full list of `requested` names missing from `available`.
pub fn check_layers(available: &[String], requested: &[String]) -> Result<(), BootstrapError> {
    let missing: Vec<String> = requested
        .iter()
        .filter(|want| !available.iter().any(|have| have == *want))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BootstrapError::UnsupportedLayer { missing })
    }
}

pub fn create_context<A: GraphicsApi>(
    api: &mut A,
    app: &AppInfo,
    window_extensions: &[String],
    diagnostics: &Diagnostics,
) -> Result<A::Context, BootstrapError> {
    let request = context_request::<A>(app, window_extensions, diagnostics);

    if diagnostics.is_enabled() {
        let available = api.available_layers()?;
        check_layers(&available, &request.layers)?;
        info!("Validation layers [ enabled ].");
    } else {
        info!("Validation layers [ disabled ].");
    }

    let context = api.create_context(&request)?;
    info!(
        "context created for \"{}\" ({} extension(s), {} layer(s))",
        request.app_name,
        request.extensions.len(),
        request.layers.len()
    );
    Ok(context)
}
