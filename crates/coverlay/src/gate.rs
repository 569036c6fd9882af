//! Session gate
//!
//! One enabled/disabled decision per server session, computed once during
//! config resolution and never re-derived afterward, even if the environment
//! changes mid-session. The evaluation is a pure function over an explicit
//! environment snapshot; the disable reason is kept for diagnostics instead
//! of collapsing the decision to a bare boolean.

use crate::host::{EnvPrefix, EnvSnapshot, ResolvedConfig};
use crate::options::CoverlayOptions;
use std::collections::HashMap;

/// Env key holding the coverage flag, looked up under the host's prefixes
pub const COVERAGE_ENV_KEY: &str = "COVERAGE";

/// Default prefix when the host config does not specify one
pub const DEFAULT_ENV_PREFIX: &str = "VITE_";

/// Fixed process-env variable consulted in cypress mode
pub const CYPRESS_COVERAGE_VAR: &str = "CYPRESS_COVERAGE";

/// Why a session was left uninstrumented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    /// Production build with `check_prod` and no force flag
    ProductionBuild,
    /// Coverage variable explicitly set to `"false"`
    CoverageOptOut,
    /// `require_env` set but the coverage variable is not `"true"`
    CoverageNotRequested,
}

impl DisableReason {
    /// Short description for diagnostics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductionBuild => "production build",
            Self::CoverageOptOut => "coverage env variable set to false",
            Self::CoverageNotRequested => "coverage env variable not set to true",
        }
    }
}

/// The session-wide instrumentation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Instrumentation runs for qualifying modules
    Enabled,
    /// No module is instrumented this session
    Disabled(DisableReason),
}

impl Gate {
    /// Whether any instrumentation occurs this session
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Compute the gate from explicit inputs
    ///
    /// Rules are checked in precedence order; the first match wins:
    /// 1. production build with `check_prod` and no force flag → disabled;
    /// 2. opt-out mode (`require_env` false) and the flag is `"false"` → disabled;
    /// 3. opt-in mode (`require_env` true) and the flag is not `"true"` → disabled;
    /// 4. otherwise enabled.
    ///
    /// Flag values compare case-insensitively.
    #[must_use]
    pub fn evaluate(
        options: &CoverlayOptions,
        config: &ResolvedConfig,
        process_env: &EnvSnapshot,
    ) -> Self {
        let flag = coverage_env_variable(options, config, process_env)
            .map(|value| value.to_lowercase())
            .unwrap_or_default();

        if options.check_prod && config.is_production && !options.force_build_instrument {
            Self::Disabled(DisableReason::ProductionBuild)
        } else if !options.require_env && flag == "false" {
            Self::Disabled(DisableReason::CoverageOptOut)
        } else if options.require_env && flag != "true" {
            Self::Disabled(DisableReason::CoverageNotRequested)
        } else {
            Self::Enabled
        }
    }
}

/// Resolve the coverage flag for this session
///
/// Cypress mode reads the fixed `CYPRESS_COVERAGE` variable straight from the
/// process environment; otherwise the `COVERAGE` key is looked up under the
/// host's env prefixes.
fn coverage_env_variable(
    options: &CoverlayOptions,
    config: &ResolvedConfig,
    process_env: &EnvSnapshot,
) -> Option<String> {
    if options.cypress {
        process_env.get(CYPRESS_COVERAGE_VAR).map(str::to_string)
    } else {
        prefixed_env_variable(COVERAGE_ENV_KEY, &config.env_prefix, &config.env)
    }
}

/// Look up `key` under a prefix family
///
/// A prefix list is tried in order and the first *defined* variable wins,
/// regardless of its value. A list that misses every candidate falls back to
/// the unprefixed key; a single prefix does not.
fn prefixed_env_variable(
    key: &str,
    prefix: &EnvPrefix,
    env: &HashMap<String, String>,
) -> Option<String> {
    match prefix {
        EnvPrefix::Single(prefix) => env.get(&format!("{prefix}{key}")).cloned(),
        EnvPrefix::List(prefixes) => prefixes
            .iter()
            .find_map(|prefix| env.get(&format!("{prefix}{key}")))
            .or_else(|| env.get(key))
            .cloned(),
    }
}
