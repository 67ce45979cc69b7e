//! Process-wide facade instance.
//!
//! Explicit global state with documented semantics: the first
//! [`instance`] call constructs the facade and wins; later calls return the
//! existing instance and silently ignore their arguments. [`reset`] clears
//! the global so tests can isolate themselves.

use std::sync::{Arc, Mutex};

use crate::config::ClientConfig;
use crate::error::FacadeError;
use crate::facade::HttpFacade;
use crate::notify::Notify;

static INSTANCE: Mutex<Option<Arc<HttpFacade>>> = Mutex::new(None);

/// Return the process-wide facade, constructing it on the first call.
///
/// First call wins: `config` and `notifier` are only honored when no
/// instance exists yet.
///
/// # Errors
///
/// Returns [`FacadeError::Build`] if the first-call construction fails; no
/// instance is stored in that case.
///
/// # Panics
///
/// Panics if the instance mutex is poisoned. This should only happen if a
/// thread panicked while holding the lock.
#[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
pub fn instance(
    config: ClientConfig,
    notifier: Arc<dyn Notify>,
) -> Result<Arc<HttpFacade>, FacadeError> {
    let mut slot = INSTANCE.lock().unwrap();
    if let Some(existing) = slot.as_ref() {
        return Ok(Arc::clone(existing));
    }

    let facade = Arc::new(HttpFacade::new(config, notifier)?);
    *slot = Some(Arc::clone(&facade));
    Ok(facade)
}

/// Drop the process-wide instance so the next [`instance`] call constructs
/// a fresh one. Intended for test isolation.
///
/// # Panics
///
/// Panics if the instance mutex is poisoned. This should only happen if a
/// thread panicked while holding the lock.
#[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
pub fn reset() {
    let mut slot = INSTANCE.lock().unwrap();
    *slot = None;
}
