//! Landing page generation
//!
//! Renders `index.html` from the askama template and writes the resolved
//! effect configuration next to it as `effects.json`. The wasm bundle is
//! expected under `<output>/pkg/`.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use serde::Serialize;
use thiserror::Error;

use crate::config::{CompanionCopy, FaqEntry, SiteConfig};

/// Module the page imports its effects from
pub const WASM_MODULE: &str = "pkg/halodream_viz.js";

/// Errors that can occur while generating the page
#[derive(Error, Debug)]
pub enum PageError {
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("could not serialize effect config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Effect configuration exactly as the page hands it to the mount functions
#[derive(Debug, Serialize)]
pub struct PageEffects {
    pub particle_field: halodream_viz::ParticleFieldConfig,
    pub grid: halodream_viz::GridConfig,
    pub companion: halodream_viz::SwarmConfig,
    pub planets: halodream_viz::PlanetConfig,
    pub spotlight: halodream_viz::SpotlightConfig,
}

impl PageEffects {
    pub fn from_config(config: &SiteConfig) -> Self {
        let effects = &config.effects;
        Self {
            particle_field: effects.particle_field(),
            grid: effects.grid.clone(),
            companion: effects.companion.clone(),
            planets: effects.planets.clone(),
            spotlight: effects.spotlight.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    tagline: &'a str,
    companion: &'a CompanionCopy,
    faq: &'a [FaqEntry],
    footer_text: &'a str,
    wasm_module: &'a str,
    /// Already escaped for embedding inside a `<script>` element
    effects_json: &'a str,
}

/// Files written by [`write_site`]
#[derive(Debug, Clone)]
pub struct GeneratedSite {
    pub index: PathBuf,
    pub effects: PathBuf,
}

/// Make JSON safe to place inside `<script type="application/json">`
pub fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Render the page for `config`
pub fn render_page(config: &SiteConfig) -> Result<String, PageError> {
    let effects = PageEffects::from_config(config);
    let effects_json = script_safe_json(&serde_json::to_string(&effects)?);

    let template = IndexTemplate {
        title: &config.title,
        tagline: &config.tagline,
        companion: &config.companion,
        faq: &config.faq,
        footer_text: &config.footer_text,
        wasm_module: WASM_MODULE,
        effects_json: &effects_json,
    };
    Ok(template.render()?)
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, PageError> {
    fs::write(&path, contents).map_err(|source| PageError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write `index.html` and `effects.json` into `output`
pub fn write_site(config: &SiteConfig, output: &Path) -> Result<GeneratedSite, PageError> {
    fs::create_dir_all(output).map_err(|source| PageError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    let html = render_page(config)?;
    let index = write_file(output.join("index.html"), &html)?;

    let effects = PageEffects::from_config(config);
    let effects = write_file(
        output.join("effects.json"),
        &serde_json::to_string_pretty(&effects)?,
    )?;

    if !output.join(WASM_MODULE).exists() {
        tracing::warn!(
            output = %output.display(),
            "{WASM_MODULE} not found; build halodream-viz with wasm-pack into {}/pkg",
            output.display()
        );
    }

    tracing::info!(index = %index.display(), "generated page");
    Ok(GeneratedSite { index, effects })
}
