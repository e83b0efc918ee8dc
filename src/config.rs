//! Site configuration
//!
//! A single YAML or JSON file describes the page copy and the tunables of
//! every effect. Every field has a default, so an empty file is a valid
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use halodream_viz::{
    GridConfig, ParticleFieldConfig, PlanetConfig, Preset, SpotlightConfig, SwarmConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file extension is not one of the supported formats
    #[error("unsupported config format '{extension}' for {} (expected yaml, yml or json)", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Supported configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick a format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }
}

/// One question/answer pair of the FAQ accordion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Copy for the companion section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionCopy {
    pub heading: String,
    pub subheading: String,
    pub cta_label: String,
    pub cta_href: String,
}

impl Default for CompanionCopy {
    fn default() -> Self {
        Self {
            heading: "Never dream alone".to_string(),
            subheading: "A small swarm of companions follows your every move.".to_string(),
            cta_label: "Meet your companion".to_string(),
            cta_href: "#faq".to_string(),
        }
    }
}

/// Tunables of every effect, forwarded to the page as JSON
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Starting point for the hero cloud when `particle_field` is not given
    pub preset: Preset,
    /// Full hero cloud configuration; replaces the preset when present
    pub particle_field: Option<ParticleFieldConfig>,
    pub grid: GridConfig,
    pub companion: SwarmConfig,
    pub planets: PlanetConfig,
    pub spotlight: SpotlightConfig,
}

impl EffectsConfig {
    /// Hero cloud configuration after applying the preset
    pub fn particle_field(&self) -> ParticleFieldConfig {
        self.particle_field
            .clone()
            .unwrap_or_else(|| self.preset.config())
    }
}

/// The whole page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub companion: CompanionCopy,
    pub faq: Vec<FaqEntry>,
    pub footer_text: String,
    pub effects: EffectsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "halodream".to_string(),
            tagline: "Move the cursor through the cloud.".to_string(),
            companion: CompanionCopy::default(),
            faq: vec![
                FaqEntry {
                    question: "What is halodream?".to_string(),
                    answer: "A dreamy landing page built from a handful of canvas effects."
                        .to_string(),
                },
                FaqEntry {
                    question: "Does it need a server?".to_string(),
                    answer: "No. Everything runs in the browser.".to_string(),
                },
            ],
            footer_text: "Click to turn on the lights.".to_string(),
            effects: EffectsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse configuration text in the given format
    ///
    /// Empty or whitespace-only text yields the defaults.
    pub fn parse(text: &str, format: ConfigFormat, path: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            }),
            ConfigFormat::Json => serde_json::from_str(text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load a configuration file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, format, path)?;
        tracing::debug!(path = %path.display(), ?format, "loaded site config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
