// src/config.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::info;

use crate::process::IngestOptions;
use crate::report::{ChartCategory, FieldAliases};
use crate::template::TemplateCatalog;

/// Environment variable naming an override settings file.
pub const CONFIG_ENV: &str = "RECONCILE_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../config/default.yaml");

static BUILTIN: Lazy<Settings> = Lazy::new(|| {
    Settings::from_yaml_str(DEFAULT_CONFIG).expect("embedded config/default.yaml must parse")
});

/// Read-only configuration shared by every stage of the pipeline.
///
/// Sections missing from an override file fall back to the built-in values,
/// so a file that only lists extra templates is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ingest: IngestOptions,
    #[serde(default = "builtin_templates")]
    pub templates: TemplateCatalog,
    #[serde(default = "builtin_aliases")]
    pub aliases: FieldAliases,
    #[serde(default = "builtin_lower_is_better")]
    pub lower_is_better: Vec<String>,
    #[serde(default = "builtin_charts")]
    pub charts: Vec<ChartCategory>,
}

fn builtin_templates() -> TemplateCatalog {
    Settings::builtin().templates.clone()
}

fn builtin_aliases() -> FieldAliases {
    Settings::builtin().aliases.clone()
}

fn builtin_lower_is_better() -> Vec<String> {
    Settings::builtin().lower_is_better.clone()
}

fn builtin_charts() -> Vec<ChartCategory> {
    Settings::builtin().charts.clone()
}

impl Settings {
    /// The embedded defaults, parsed once per process.
    pub fn builtin() -> &'static Settings {
        &BUILTIN
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing settings YAML")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading settings {:?}", path))?;
        let settings =
            Self::from_yaml_str(&text).with_context(|| format!("in settings file {:?}", path))?;
        info!(
            path = %path.display(),
            templates = settings.templates.len(),
            "loaded settings"
        );
        Ok(settings)
    }

    /// Load from `$RECONCILE_CONFIG` when set, otherwise clone the built-in defaults.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin().clone()),
        }
    }
}
