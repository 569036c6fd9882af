//! Instrumentation engine seam
//!
//! The engine that rewrites source into counter-recording code lives outside
//! this crate. This module pins down the contract the pipeline relies on:
//! one synchronous call per module, instrumented code and its sourcemap
//! returned together, and runtime counters flowing into a
//! [`CoverageRegistry`] owned by the engine's runtime support layer.

use crate::error::Result;
use crate::registry::CoverageRegistry;
use serde_json::Value;

/// Output of instrumenting a single module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentedModule {
    /// Instrumented source code
    pub code: String,
    /// Sourcemap for the instrumented code
    pub map: Value,
}

/// A stateful source-to-source coverage instrumenter
///
/// One engine instance serves a whole session and is reused across every
/// transform call; engines may keep internal caches but expose no per-call
/// state. Each call returns the instrumented code together with the map
/// produced for exactly that call, so there is nothing to read back
/// afterward and no ordering hazard between calls.
pub trait Instrumenter {
    /// Instrument one module
    ///
    /// `input_map` is the sanitized combined sourcemap of the transforms
    /// applied so far, when the host produced one; the engine composes its
    /// own mappings on top of it.
    fn instrument(
        &mut self,
        source: &str,
        filename: &str,
        input_map: Option<&Value>,
    ) -> Result<InstrumentedModule>;

    /// Handle to the registry the emitted code records into at runtime
    ///
    /// The endpoint serving `/__coverage__` holds a clone of this handle and
    /// only reads from it.
    fn registry(&self) -> CoverageRegistry;
}
