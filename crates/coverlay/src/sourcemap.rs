//! Sourcemap sanitization
//!
//! The combined sourcemap the host hands to the transform hook embeds the
//! original sources under `sourcesContent`. The instrumentation engine only
//! needs the mappings, and carrying inline sources through it duplicates
//! every module's text in the emitted map. The sanitizer produces a deep
//! copy with that field removed; the input map is never touched.

use crate::error::{CoverlayError, Result};
use serde_json::Value;

/// Field holding inline original sources in a sourcemap object
const SOURCES_CONTENT_FIELD: &str = "sourcesContent";

/// Produce a structurally-equivalent sourcemap without `sourcesContent`
///
/// Every other field is preserved as-is. The returned value shares no
/// structure with the input. Anything other than a JSON object violates the
/// caller's contract and fails fast; the orchestrator only invokes this when
/// a combined sourcemap actually exists.
pub fn sanitize_source_map(raw_map: &Value) -> Result<Value> {
    match raw_map {
        Value::Object(map) => {
            let mut clean = map.clone();
            clean.remove(SOURCES_CONTENT_FIELD);
            Ok(Value::Object(clean))
        }
        Value::Null => Err(CoverlayError::sourcemap_contract(
            "expected a sourcemap object, got null",
        )),
        other => Err(CoverlayError::sourcemap_contract(format!(
            "expected a sourcemap object, got {other}"
        ))),
    }
}
