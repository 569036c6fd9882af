//! Coverlay: coverage instrumentation middleware for dev servers
//!
//! Coverlay decides, per session and per module, whether istanbul-style
//! coverage instrumentation runs, produces instrumented output paired with a
//! valid sourcemap, and surfaces the accumulated runtime counters to a test
//! harness over HTTP (see the `coverlay-server` crate for the endpoint).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     COVERLAY PIPELINE                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  config merge ──► filter built (nyc config + options merged)     │
//! │  config resolved ──► gate computed once (env snapshot)           │
//! │  per module: id ─► normalize ─► gate? filter? ─► sanitize map    │
//! │              ─► instrument ─► { code, map }                      │
//! │  runtime: instrumented code ─► CoverageRegistry ─► /__coverage__ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The instrumentation engine itself is a collaborator behind the
//! [`Instrumenter`] trait; the glob matching primitive is the `glob` crate.
//! Coverlay owns the decision logic between them.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod exclude;
mod filename;
mod gate;
mod instrument;
mod nycrc;
mod options;
mod plugin;
mod registry;
mod sourcemap;

/// Host build-tool boundary types
pub mod host;

pub use error::{CoverlayError, Result};
pub use exclude::{InstrumentFilter, DEFAULT_EXTENSIONS};
pub use filename::{resolve_filename, SFC_QUERY_MARKER};
pub use gate::{
    DisableReason, Gate, COVERAGE_ENV_KEY, CYPRESS_COVERAGE_VAR, DEFAULT_ENV_PREFIX,
};
pub use instrument::{InstrumentedModule, Instrumenter};
pub use nycrc::{load_nyc_config, NycConfig};
pub use options::CoverlayOptions;
pub use plugin::{
    ConfiguredPlugin, CoveragePlugin, PluginSession, TransformOutput, TransformRequest,
    MODULE_PREFIX, NULL_MODULE_SENTINEL, PLUGIN_NAME,
};
pub use registry::CoverageRegistry;
pub use sourcemap::sanitize_source_map;
