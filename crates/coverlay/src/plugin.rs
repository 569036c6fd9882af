//! Plugin lifecycle and transform orchestration
//!
//! The host drives a session through three ordered phases: config merge,
//! config resolution, per-module transform. Each phase is a distinct type
//! here, so a session that has not finished the earlier phases cannot
//! service a transform request; the readiness contract is enforced by
//! construction instead of runtime guards.
//!
//! ```text
//! CoveragePlugin ──configure()──► ConfiguredPlugin ──resolve()──► PluginSession
//!   options only     builds filter,    gate computed once      transform() per
//!                    forces sourcemaps                         module request
//! ```
//!
//! Hosts should schedule the transform hook after their other transforms
//! (post-enforced), so the pipeline sees plain JavaScript and the combined
//! sourcemap of everything that ran before it.

use crate::error::Result;
use crate::exclude::InstrumentFilter;
use crate::filename::resolve_filename;
use crate::gate::Gate;
use crate::host::{Command, EnvSnapshot, ResolvedConfig, SourcemapMode, UserConfig};
use crate::instrument::Instrumenter;
use crate::options::CoverlayOptions;
use crate::registry::CoverageRegistry;
use crate::sourcemap::sanitize_source_map;
use serde_json::Value;

/// Plugin name used as the tracing target
pub const PLUGIN_NAME: &str = "coverlay";

/// Id prefix of dev-server internal modules, never instrumented
pub const MODULE_PREFIX: &str = "/@modules/";

/// Sentinel prefix of virtual modules, never instrumented
pub const NULL_MODULE_SENTINEL: char = '\0';

/// One module transform request from the host
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Module id; may carry an sfc query fragment or a virtual-module sentinel
    pub id: String,
    /// Source code after the host's preceding transforms
    pub code: String,
    /// Whether this is a server-side-render pass
    pub ssr: bool,
    /// Combined sourcemap of the transforms applied so far
    pub combined_map: Option<Value>,
}

impl TransformRequest {
    /// Create a request for a client-side module with no sourcemap
    #[must_use]
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            ssr: false,
            combined_map: None,
        }
    }

    /// Mark as a server-side-render pass
    #[must_use]
    pub const fn with_ssr(mut self, ssr: bool) -> Self {
        self.ssr = ssr;
        self
    }

    /// Attach the combined sourcemap
    #[must_use]
    pub fn with_combined_map(mut self, map: Value) -> Self {
        self.combined_map = Some(map);
        self
    }
}

/// Instrumented code and sourcemap handed back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Instrumented source code
    pub code: String,
    /// Sourcemap for the instrumented code
    pub map: Value,
}

/// Entry point: a coverage plugin before any lifecycle phase has run
pub struct CoveragePlugin {
    options: CoverlayOptions,
    instrumenter: Box<dyn Instrumenter>,
}

impl CoveragePlugin {
    /// Create a plugin from explicit options and an instrumentation engine
    #[must_use]
    pub fn new(options: CoverlayOptions, instrumenter: impl Instrumenter + 'static) -> Self {
        Self {
            options,
            instrumenter: Box::new(instrumenter),
        }
    }

    /// Should the plugin participate in this session at all?
    ///
    /// Dev-server sessions only, unless `force_build_instrument` opts builds
    /// in as well.
    #[must_use]
    pub fn apply(&self, command: Command) -> bool {
        self.options.force_build_instrument || command == Command::Serve
    }

    /// Config-merge phase
    ///
    /// Forces sourcemap emission on when the user left it off (accurate
    /// coverage needs maps) and builds the instrumentation filter. This is
    /// the only suspending phase; it must complete before resolution.
    pub async fn configure(self, config: &mut UserConfig) -> Result<ConfiguredPlugin> {
        if !config.build.sourcemap.is_some_and(SourcemapMode::is_enabled) {
            tracing::warn!(
                target: PLUGIN_NAME,
                "sourcemaps were automatically enabled for code coverage to be accurate; \
                 set build.sourcemap to true, 'inline' or 'hidden' to hide this message"
            );
            config.build.sourcemap = Some(SourcemapMode::Boolean(true));
        }

        let filter = InstrumentFilter::build(&self.options).await?;
        Ok(ConfiguredPlugin {
            options: self.options,
            filter,
            instrumenter: self.instrumenter,
        })
    }
}

impl std::fmt::Debug for CoveragePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoveragePlugin")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A plugin whose filter is ready; awaiting config resolution
pub struct ConfiguredPlugin {
    options: CoverlayOptions,
    filter: InstrumentFilter,
    instrumenter: Box<dyn Instrumenter>,
}

impl ConfiguredPlugin {
    /// Config-resolution phase
    ///
    /// Computes the session gate exactly once. The decision is never
    /// re-derived afterward, even if the environment changes mid-session.
    #[must_use]
    pub fn resolve(self, config: &ResolvedConfig, process_env: &EnvSnapshot) -> PluginSession {
        let gate = Gate::evaluate(&self.options, config, process_env);
        match gate {
            Gate::Enabled => {
                tracing::debug!(target: PLUGIN_NAME, "instrumentation enabled for this session");
            }
            Gate::Disabled(reason) => {
                tracing::debug!(
                    target: PLUGIN_NAME,
                    reason = reason.as_str(),
                    "instrumentation disabled for this session"
                );
            }
        }
        PluginSession {
            filter: self.filter,
            gate,
            instrumenter: self.instrumenter,
        }
    }
}

impl std::fmt::Debug for ConfiguredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredPlugin")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A fully-resolved session servicing transform requests
pub struct PluginSession {
    filter: InstrumentFilter,
    gate: Gate,
    instrumenter: Box<dyn Instrumenter>,
}

impl PluginSession {
    /// Whether any instrumentation occurs this session
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// The session gate, with its disable reason when disabled
    #[must_use]
    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// Handle to the registry instrumented code records into
    #[must_use]
    pub fn registry(&self) -> CoverageRegistry {
        self.instrumenter.registry()
    }

    /// Per-module transform hook
    ///
    /// Returns `Ok(None)` to pass the module through untouched: disabled
    /// session, server-side-render pass, internal or virtual module, or a
    /// file the filter excludes. A malformed combined sourcemap or an engine
    /// failure is an error for this module, not a silent pass-through.
    pub fn transform(&mut self, request: &TransformRequest) -> Result<Option<TransformOutput>> {
        if !self.gate.is_enabled()
            || request.ssr
            || request.id.starts_with(MODULE_PREFIX)
            || request.id.starts_with(NULL_MODULE_SENTINEL)
        {
            return Ok(None);
        }

        let filename = resolve_filename(&request.id);
        if !self.filter.should_instrument(filename) {
            tracing::trace!(target: PLUGIN_NAME, filename, "excluded from instrumentation");
            return Ok(None);
        }

        let clean_map = match &request.combined_map {
            Some(map) => Some(sanitize_source_map(map)?),
            None => None,
        };
        let module = self
            .instrumenter
            .instrument(&request.code, filename, clean_map.as_ref())?;
        Ok(Some(TransformOutput {
            code: module.code,
            map: module.map,
        }))
    }
}

impl std::fmt::Debug for PluginSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginSession")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
