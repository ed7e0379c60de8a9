// SPDX-License-Identifier: CEPL-1.0
//! Message-sink registration on a live context.
use tracing::info;

use crate::api::{DebugHookFns, GraphicsApi};
use crate::diagnostics::Diagnostics;
use crate::error::BootstrapError;

/// A live registration plus the entry points that undo it.
pub struct DebugHookHandle<A: GraphicsApi> {
    hook: A::DebugHook,
    fns: DebugHookFns<A>,
}

/// Registers the sink. Returns `Ok(None)` without touching the API when
/// diagnostics are off.
pub fn attach<A: GraphicsApi>(
    api: &mut A,
    context: &A::Context,
    diagnostics: &Diagnostics,
) -> Result<Option<DebugHookHandle<A>>, BootstrapError> {
    let Some(request) = diagnostics.hook_request() else {
        return Ok(None);
    };

    let fns = api
        .debug_hook_fns(context)
        .ok_or(BootstrapError::ExtensionNotPresent(A::DEBUG_EXTENSION))?;

    if diagnostics.info_messages() {
        info!("Info messages enabled.");
    }

    let hook = (fns.attach)(api, context, &request)?;
    info!("debug messenger attached");
    Ok(Some(DebugHookHandle { hook, fns }))
}

/// No-op for `None`.
pub fn detach<A: GraphicsApi>(
    api: &mut A,
    context: &A::Context,
    handle: Option<DebugHookHandle<A>>,
) {
    if let Some(DebugHookHandle { hook, fns }) = handle {
        (fns.detach)(api, context, hook);
        info!("debug messenger detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockApi, Step};

    #[test]
    fn disabled_is_a_no_op() {
        let mut api = MockApi::new();
        let journal = api.journal();
        let hook = attach(&mut api, &1, &Diagnostics::disabled()).unwrap();
        assert!(hook.is_none());
        detach(&mut api, &1, hook);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn attach_then_detach_uses_resolved_entry_points() {
        let mut api = MockApi::new();
        let journal = api.journal();
        let hook = attach(&mut api, &1, &Diagnostics::new(true, true)).unwrap();
        assert!(hook.is_some());
        detach(&mut api, &1, hook);
        assert_eq!(
            *journal.borrow(),
            vec![
                Call::ResolveDebugHook,
                Call::AttachDebugHook,
                Call::DetachDebugHook
            ]
        );
    }

    #[test]
    fn unresolved_extension_is_reported() {
        let mut api = MockApi::new();
        api.debug_hook_available = false;
        let err = attach(&mut api, &1, &Diagnostics::new(true, false))
            .err()
            .unwrap();
        assert!(matches!(err, BootstrapError::ExtensionNotPresent(_)));
    }

    #[test]
    fn attach_failure_is_reported() {
        let mut api = MockApi::new().failing_at(Step::DebugHook);
        let err = attach(&mut api, &1, &Diagnostics::new(true, false))
            .err()
            .unwrap();
        assert!(matches!(err, BootstrapError::DebugHookCreationFailed(_)));
    }
}
