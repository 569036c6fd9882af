//! Host build-tool boundary types
//!
//! The plugin is driven by a host dev server through three lifecycle phases:
//! config merge, config resolution, and per-module transform. These types
//! model the slices of host state the pipeline actually reads or writes;
//! the host's module graph and scheduler stay on the other side of the
//! boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host command the current session was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Dev-server session
    Serve,
    /// One-shot production/preview build
    Build,
}

/// Sourcemap emission mode on the host build config
///
/// Mirrors the host's config surface, where the value is either a boolean or
/// one of the literal strings `"inline"` / `"hidden"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcemapMode {
    /// Plain on/off
    Boolean(bool),
    /// Inline data-URI maps
    Inline,
    /// Emitted but not referenced
    Hidden,
}

impl SourcemapMode {
    /// Whether this mode produces sourcemaps at all
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Boolean(false))
    }
}

impl Serialize for SourcemapMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Inline => serializer.serialize_str("inline"),
            Self::Hidden => serializer.serialize_str("hidden"),
        }
    }
}

impl<'de> Deserialize<'de> for SourcemapMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModeVisitor;

        impl serde::de::Visitor<'_> for ModeVisitor {
            type Value = SourcemapMode;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a boolean, \"inline\" or \"hidden\"")
            }

            fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(SourcemapMode::Boolean(value))
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
                match value {
                    "inline" => Ok(SourcemapMode::Inline),
                    "hidden" => Ok(SourcemapMode::Hidden),
                    other => Err(E::unknown_variant(other, &["inline", "hidden"])),
                }
            }
        }

        deserializer.deserialize_any(ModeVisitor)
    }
}

/// Build section of the mutable user config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Sourcemap emission mode; `None` means the user left it unset
    pub sourcemap: Option<SourcemapMode>,
}

/// Mutable host config as seen during the config-merge phase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Build options
    pub build: BuildConfig,
}

/// Env-variable prefix family the host exposes to client code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvPrefix {
    /// A single prefix
    Single(String),
    /// Candidate prefixes, tried in order
    List(Vec<String>),
}

impl Default for EnvPrefix {
    fn default() -> Self {
        Self::Single(crate::gate::DEFAULT_ENV_PREFIX.to_string())
    }
}

impl From<&str> for EnvPrefix {
    fn from(prefix: &str) -> Self {
        Self::Single(prefix.to_string())
    }
}

impl From<Vec<String>> for EnvPrefix {
    fn from(prefixes: Vec<String>) -> Self {
        Self::List(prefixes)
    }
}

/// Immutable host config after resolution
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Whether the session builds for production
    pub is_production: bool,
    /// Env variables the host exposes to client code
    pub env: HashMap<String, String>,
    /// Prefix family used for the exposed env variables
    pub env_prefix: EnvPrefix,
}

impl ResolvedConfig {
    /// Create a resolved config with the default env prefix
    #[must_use]
    pub fn new(is_production: bool, env: HashMap<String, String>) -> Self {
        Self {
            is_production,
            env,
            env_prefix: EnvPrefix::default(),
        }
    }

    /// Override the env prefix family
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<EnvPrefix>) -> Self {
        self.env_prefix = prefix.into();
        self
    }
}

/// Explicit snapshot of the process environment
///
/// The gate is a pure function; it never reads `std::env` directly. Capture
/// the live environment with [`EnvSnapshot::current`] or build one from
/// pairs in tests.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the live process environment
    #[must_use]
    pub fn current() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Look up a variable
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sourcemap_mode_enabled() {
        assert!(SourcemapMode::Boolean(true).is_enabled());
        assert!(SourcemapMode::Inline.is_enabled());
        assert!(SourcemapMode::Hidden.is_enabled());
        assert!(!SourcemapMode::Boolean(false).is_enabled());
    }

    #[test]
    fn test_sourcemap_mode_serde() {
        let inline: SourcemapMode = serde_json::from_str("\"inline\"").unwrap();
        assert_eq!(inline, SourcemapMode::Inline);
        let on: SourcemapMode = serde_json::from_str("true").unwrap();
        assert_eq!(on, SourcemapMode::Boolean(true));

        assert_eq!(serde_json::to_string(&SourcemapMode::Hidden).unwrap(), "\"hidden\"");
        assert_eq!(
            serde_json::to_string(&SourcemapMode::Boolean(false)).unwrap(),
            "false"
        );
        assert!(serde_json::from_str::<SourcemapMode>("\"bogus\"").is_err());
    }

    #[test]
    fn test_command_serde() {
        let cmd: Command = serde_json::from_str("\"serve\"").unwrap();
        assert_eq!(cmd, Command::Serve);
    }

    #[test]
    fn test_env_prefix_default() {
        assert_eq!(EnvPrefix::default(), EnvPrefix::Single("VITE_".to_string()));
    }

    #[test]
    fn test_env_prefix_untagged_serde() {
        let single: EnvPrefix = serde_json::from_str("\"APP_\"").unwrap();
        assert_eq!(single, EnvPrefix::Single("APP_".to_string()));

        let list: EnvPrefix = serde_json::from_str(r#"["APP_","VITE_"]"#).unwrap();
        assert_eq!(
            list,
            EnvPrefix::List(vec!["APP_".to_string(), "VITE_".to_string()])
        );
    }

    #[test]
    fn test_env_snapshot_lookup() {
        let snapshot: EnvSnapshot = [("CYPRESS_COVERAGE", "true")].into_iter().collect();
        assert_eq!(snapshot.get("CYPRESS_COVERAGE"), Some("true"));
        assert_eq!(snapshot.get("MISSING"), None);
    }

    #[test]
    fn test_env_snapshot_current_does_not_panic() {
        let _ = EnvSnapshot::current();
    }

    #[test]
    fn test_resolved_config_builder() {
        let config = ResolvedConfig::new(false, HashMap::new()).with_env_prefix("APP_");
        assert_eq!(config.env_prefix, EnvPrefix::Single("APP_".to_string()));
    }
}
