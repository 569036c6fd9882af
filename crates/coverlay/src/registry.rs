//! Coverage registry
//!
//! Process-wide accumulator for runtime coverage counters. Instrumented code
//! records into it from arbitrary call sites through the engine's runtime
//! support layer; the HTTP endpoint holds a cloned handle and only ever
//! reads. Handles are cheap to clone and all point at the same accumulator.

use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared coverage accumulator for one process
#[derive(Debug, Clone, Default)]
pub struct CoverageRegistry {
    inner: Arc<RwLock<Option<Value>>>,
}

impl CoverageRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of the accumulator, `None` before the first record
    #[must_use]
    pub fn snapshot(&self) -> Option<Value> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record coverage data for one file
    ///
    /// The per-file entry is replaced wholesale; merging counters inside an
    /// entry is the engine runtime's concern.
    pub fn record(&self, filename: impl Into<String>, data: Value) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut().and_then(Value::as_object_mut) {
            Some(files) => {
                files.insert(filename.into(), data);
            }
            None => {
                let mut files = serde_json::Map::new();
                files.insert(filename.into(), data);
                *guard = Some(Value::Object(files));
            }
        }
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Drop all recorded coverage
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
