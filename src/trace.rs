//! Tracing callback support.
//!
//! Every construction request reports a [`PatternEvent`] to an optional,
//! process-wide callback. The same events are also recorded through `tracing`.

use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::PatternEvent;

/// Type alias for the user-supplied tracing callback.
///
/// The callback must be thread-safe because instance lookups happen from any thread.
pub type TraceCallback = dyn Fn(&PatternEvent) + Send + Sync + 'static;

/// Holds an optional user-defined tracing callback.
static TRACE_CALLBACK: LazyLock<Mutex<Option<Arc<TraceCallback>>>> =
    LazyLock::new(|| Mutex::new(None));

/// Sets a tracing callback that will be invoked on every construction request.
///
/// Replaces any previously installed callback. The callback runs with no
/// registry lock held, so it may itself look up instances.
///
/// # Example
/// ```rust
/// use typex::{set_trace_callback, clear_trace_callback};
///
/// set_trace_callback(|event| println!("[typex-trace] {}", event));
/// clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&PatternEvent) + Send + Sync + 'static) {
    *TRACE_CALLBACK.lock() = Some(Arc::new(callback));
}

/// Clears the tracing callback (disables event reporting).
pub fn clear_trace_callback() {
    *TRACE_CALLBACK.lock() = None;
}

pub(crate) fn emit(event: PatternEvent) {
    match &event {
        PatternEvent::Initialize {
            type_name,
            instance_name,
        } => tracing::debug!(type_name, ?instance_name, "constructor ran"),
        PatternEvent::Reuse {
            type_name,
            instance_name,
        } => tracing::trace!(type_name, ?instance_name, "reused instance, arguments discarded"),
        PatternEvent::Reject {
            type_name,
            instance_name,
        } => tracing::warn!(type_name, ?instance_name, "construction rejected"),
    }

    // Clone out so the callback never runs under the callback lock.
    let callback = TRACE_CALLBACK.lock().clone();
    if let Some(callback) = callback {
        callback(&event);
    }
}
