//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nntree/nntree.toml`
//! 3. Local config: `--config <file>`, else `./.nntree.toml`
//! 4. Environment variables: `NNTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{
    CoercionPolicy, DEFAULT_COMPOSITE_TYPES, DEFAULT_MAX_DEPTH, DEFAULT_PRIVATE_PREFIX, ROOT_NAME,
};

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".nntree.toml";

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_name: Option<String>,
    pub composite_types: Option<Vec<String>>,
    pub private_prefix: Option<String>,
    pub max_depth: Option<usize>,
    pub on_unserializable: Option<CoercionPolicy>,
    pub pretty: Option<bool>,
    pub output: Option<PathBuf>,
}

/// Unified configuration for nntree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the synthetic root node (default: "root")
    pub root_name: String,
    /// Runtime type names walked as containers
    pub composite_types: Vec<String>,
    /// Attributes starting with this prefix are private and skipped
    pub private_prefix: String,
    /// Maximum composite nesting before the build fails
    pub max_depth: usize,
    /// Handling of attribute values without a JSON form
    pub on_unserializable: CoercionPolicy,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Default JSON destination (stdout when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: ROOT_NAME.to_string(),
            composite_types: DEFAULT_COMPOSITE_TYPES.iter().map(|s| s.to_string()).collect(),
            private_prefix: DEFAULT_PRIVATE_PREFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            on_unserializable: CoercionPolicy::default(),
            pretty: true,
            output: None,
        }
    }
}

/// Get the XDG config directory for nntree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nntree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("nntree.toml"))
}

/// Resolve the local config file: the explicit path, else `./.nntree.toml` if present.
pub fn local_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(LOCAL_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            composite_types: overlay
                .composite_types
                .as_ref()
                .map(|o| Self::merge_array(&self.composite_types, o))
                .unwrap_or_else(|| self.composite_types.clone()),
            ..self.overlay_scalars(overlay)
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// The global file defines the baseline composite set; local files then
    /// add or remove (`!Name`) types on top of it.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            composite_types: global
                .composite_types
                .clone()
                .unwrap_or_else(|| self.composite_types.clone()),
            ..self.overlay_scalars(global)
        }
    }

    /// Scalar options: overlay wins if Some, otherwise keep base.
    fn overlay_scalars(&self, overlay: &RawSettings) -> Self {
        Self {
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            composite_types: self.composite_types.clone(),
            private_prefix: overlay
                .private_prefix
                .clone()
                .unwrap_or_else(|| self.private_prefix.clone()),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            on_unserializable: overlay.on_unserializable.unwrap_or(self.on_unserializable),
            pretty: overlay.pretty.unwrap_or(self.pretty),
            output: overlay.output.clone().or_else(|| self.output.clone()),
        }
    }

    /// Load settings from the user's global config and an optional local file.
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_layers(global.as_deref(), local_config)
    }

    /// Load settings from explicit layers.
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load_layers(
        global_config: Option<&Path>,
        local_config: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config {
            let raw = load_raw_settings(global_path)?;
            current = current.apply_global(&raw);
        }

        if let Some(local_path) = local_config {
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths()?;
        current.validate()?;

        Ok(current)
    }

    /// Apply NNTREE_* environment variables as explicit overrides.
    ///
    /// `NNTREE_COMPOSITE_TYPES` is a comma-separated list.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NNTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_string("composite_types") {
            settings.composite_types = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(val) = config.get_string("private_prefix") {
            settings.private_prefix = val;
        }
        if let Ok(val) = config.get_string("max_depth") {
            settings.max_depth = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("NNTREE_MAX_DEPTH={}: {}", val, e),
            })?;
        }
        if let Ok(val) = config.get_string("on_unserializable") {
            settings.on_unserializable = match val.to_lowercase().as_str() {
                "fail" => CoercionPolicy::Fail,
                "substitute" => CoercionPolicy::Substitute,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!(
                            "NNTREE_ON_UNSERIALIZABLE={}: expected 'fail' or 'substitute'",
                            other
                        ),
                    })
                }
            };
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }
        if let Ok(val) = config.get_string("output") {
            settings.output = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the output path.
    fn expand_paths(&mut self) -> Result<(), ApplicationError> {
        if let Some(output) = &self.output {
            let raw = output.to_string_lossy();
            let expanded = shellexpand::full(&raw).map_err(|e| ApplicationError::Config {
                message: format!("expand output path {}: {}", raw, e),
            })?;
            self.output = Some(PathBuf::from(expanded.into_owned()));
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.root_name.is_empty() {
            return Err(ApplicationError::Config {
                message: "root_name must not be empty".to_string(),
            });
        }
        if self.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML (for `nntree config`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("render settings: {}", e),
        })
    }
}
