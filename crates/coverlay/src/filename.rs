//! Module-id normalization
//!
//! Single-file components reach the transform hook as synthetic sub-modules
//! whose ids carry a `?vue` query fragment (`/src/App.vue?vue&type=style`).
//! Exclusion decisions and instrumentation metadata need the real file path,
//! so the fragment is stripped before anything else looks at the id.

/// Query marker separating a file path from its component sub-module suffix
pub const SFC_QUERY_MARKER: &str = "?vue";

/// Recover the file path from a module id
///
/// Returns everything before the first [`SFC_QUERY_MARKER`]; ids without the
/// marker come back unchanged, which makes the function idempotent.
#[must_use]
pub fn resolve_filename(id: &str) -> &str {
    match id.find(SFC_QUERY_MARKER) {
        Some(index) => &id[..index],
        None => id,
    }
}
