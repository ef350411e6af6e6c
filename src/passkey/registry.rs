//! In-flight ceremony registry
//!
//! Every `create`/`authenticate` call registers a ceremony under a fresh
//! handle for as long as the native call is pending. The entry is removed by
//! [`CeremonyGuard`] on drop, which covers success, failure, and a caller
//! dropping the future mid-ceremony.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::webauthn::CeremonyKind;

/// Opaque identifier of one ceremony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CeremonyHandle(Uuid);

impl CeremonyHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CeremonyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookkeeping for one pending ceremony
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyRecord {
    pub kind: CeremonyKind,
    pub started_at: DateTime<Utc>,
}

/// Concurrency-safe set of pending ceremonies
#[derive(Debug, Default)]
pub struct CeremonyRegistry {
    ceremonies: Mutex<HashMap<CeremonyHandle, CeremonyRecord>>,
}

impl CeremonyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new ceremony; it stays registered until the guard drops
    #[must_use = "the ceremony is unregistered as soon as the guard is dropped"]
    pub fn begin(self: &Arc<Self>, kind: CeremonyKind) -> CeremonyGuard {
        let handle = CeremonyHandle::new();
        let record = CeremonyRecord {
            kind,
            started_at: Utc::now(),
        };
        self.lock().insert(handle, record);
        log::debug!("Registered {} ceremony {handle}", kind.as_str());

        CeremonyGuard {
            registry: Arc::clone(self),
            handle,
        }
    }

    /// Number of ceremonies currently pending
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn contains(&self, handle: CeremonyHandle) -> bool {
        self.lock().contains_key(&handle)
    }

    #[must_use]
    pub fn get(&self, handle: CeremonyHandle) -> Option<CeremonyRecord> {
        self.lock().get(&handle).cloned()
    }

    fn remove(&self, handle: CeremonyHandle) -> Option<CeremonyRecord> {
        self.lock().remove(&handle)
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<CeremonyHandle, CeremonyRecord>> {
        self.ceremonies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a ceremony registered; unregisters it on drop
#[derive(Debug)]
pub struct CeremonyGuard {
    registry: Arc<CeremonyRegistry>,
    handle: CeremonyHandle,
}

impl CeremonyGuard {
    #[must_use]
    pub fn handle(&self) -> CeremonyHandle {
        self.handle
    }
}

impl Drop for CeremonyGuard {
    fn drop(&mut self) {
        if let Some(record) = self.registry.remove(self.handle) {
            let elapsed = Utc::now().signed_duration_since(record.started_at);
            log::debug!(
                "Released {} ceremony {} after {}ms",
                record.kind.as_str(),
                self.handle,
                elapsed.num_milliseconds()
            );
        }
    }
}
