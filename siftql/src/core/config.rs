use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filter::{FieldDeclaration, FilterRegistry, UnknownEnumPolicy};

use super::cli::CliConfig;
use super::constants::CONFIG_FILE_NAME;

// =============================================================================
// Translation Target Enum
// =============================================================================

/// Backend a translated filter is produced for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Postgres,
    Sqlite,
    Document,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Postgres => write!(f, "postgres"),
            Target::Sqlite => write!(f, "sqlite"),
            Target::Document => write!(f, "document"),
        }
    }
}

// =============================================================================
// File Config Structs (for JSON parsing)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TranslateFileConfig {
    pub unknown_enum: Option<UnknownEnumPolicy>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Entity id -> field declarations, in declaration order
    #[serde(default)]
    pub entities: IndexMap<String, Vec<FieldDeclaration>>,
    /// Group -> parent groups
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
    pub translate: Option<TranslateFileConfig>,
    pub target: Option<Target>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(
            entities = config.entities.len(),
            groups = config.groups.len(),
            "Parsed config file"
        );
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub entities: IndexMap<String, Vec<FieldDeclaration>>,
    pub groups: IndexMap<String, Vec<String>>,
    pub target: Target,
    pub unknown_enum: UnknownEnumPolicy,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. CLI-specified config path OR local directory config
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => {
                tracing::debug!("No config file found, starting without declarations");
                FileConfig::default()
            }
        };

        Ok(Self::resolve(file_config, cli))
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Self {
        let file_translate = file_config.translate.unwrap_or_default();
        Self {
            entities: file_config.entities,
            groups: file_config.groups,
            target: cli.target.or(file_config.target).unwrap_or_default(),
            unknown_enum: cli
                .unknown_enum
                .or(file_translate.unknown_enum)
                .unwrap_or_default(),
        }
    }

    /// Declare the configured groups and entities in a registry
    ///
    /// Groups are declared first so that every entity sees the full hierarchy.
    pub fn register(&self, registry: &FilterRegistry) -> Result<()> {
        for (group, parents) in &self.groups {
            let parents: Vec<&str> = parents.iter().map(String::as_str).collect();
            if !registry.declare_group(group, &parents) {
                tracing::warn!(group = %group, "Group already declared, keeping first declaration");
            }
        }

        for (entity, declarations) in &self.entities {
            let registered = registry
                .register_declarations(entity, declarations)
                .with_context(|| format!("Invalid field declarations for entity '{}'", entity))?;
            if !registered {
                tracing::warn!(entity = %entity, "Entity already registered, keeping first registration");
            }
        }

        tracing::debug!(
            entities = self.entities.len(),
            groups = self.groups.len(),
            "Registered configured declarations"
        );
        Ok(())
    }
}
