//! Configuration management for resource-selector
//!
//! Settings are layered with figment, lowest priority first:
//! embedded defaults, a config file, `RESOURCE_SELECTOR_*` environment
//! variables, then command-line overrides.

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// File stem searched for in the base directory
pub const CONFIG_FILE_STEM: &str = "resource-selector";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "RESOURCE_SELECTOR_";

/// Effective selector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Maximum resource size in megabytes; zero or negative disables the limit
    pub size_threshold_mb: i64,

    /// Exclusion globs matched against base-relative paths
    pub exclusions: Vec<String>,

    /// Nested build units whose contents are never resources
    pub subprojects: Vec<PathBuf>,

    /// Treat malformed resource content as a failure
    pub strict: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            size_threshold_mb: 0,
            exclusions: Vec::new(),
            subprojects: Vec::new(),
            strict: false,
        }
    }
}

/// Values supplied on the command line
///
/// Unset scalars leave the lower layers alone. Lists are appended to what the
/// lower layers configured.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_threshold_mb: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subprojects: Vec<PathBuf>,
}

impl SelectorConfig {
    /// Load configuration for `base_dir`
    ///
    /// With `custom_config` set, only that file is read (and it must exist);
    /// otherwise `resource-selector.{toml,json,yaml,yml}` in `base_dir` is
    /// picked up if present.
    pub fn load(
        base_dir: &Path,
        custom_config: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let config: SelectorConfig = Self::figment(base_dir, custom_config, overrides)?
            .extract()
            .context("Invalid configuration")?;
        config.validate(base_dir)?;

        tracing::debug!(
            "Loaded configuration: threshold {}Mb, {} exclusions, {} subprojects, strict {}",
            config.size_threshold_mb,
            config.exclusions.len(),
            config.subprojects.len(),
            config.strict
        );
        Ok(config)
    }

    /// The layered provider stack, before extraction
    pub fn figment(
        base_dir: &Path,
        custom_config: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Figment> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                bail!("Config file not found: {}", custom_path.display());
            }
            let extension = custom_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(custom_path)),
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => bail!(
                    "Unsupported config file format: {} (expected .toml, .json, .yaml or .yml)",
                    custom_path.display()
                ),
            };
        } else {
            let stem = base_dir.join(CONFIG_FILE_STEM);
            figment = figment
                .merge(Toml::file(stem.with_extension("toml")))
                .merge(Json::file(stem.with_extension("json")))
                .merge(Yaml::file(stem.with_extension("yaml")))
                .merge(Yaml::file(stem.with_extension("yml")));
        }

        // Command-line lists extend the configured ones rather than replace them
        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX))
            .admerge(Serialized::defaults(overrides)))
    }

    /// Check settings that deserialization alone cannot
    pub fn validate(&self, base_dir: &Path) -> Result<()> {
        for subproject in &self.subprojects {
            let climbs = subproject
                .components()
                .any(|component| matches!(component, Component::ParentDir));
            let inside = !climbs && (subproject.is_relative() || subproject.starts_with(base_dir));
            if !inside {
                bail!(
                    "Subproject {} is outside the base directory {}",
                    subproject.display(),
                    base_dir.display()
                );
            }
        }

        for pattern in &self.exclusions {
            if pattern.trim().is_empty() {
                bail!("Exclusion patterns cannot be empty");
            }
        }

        Ok(())
    }
}
