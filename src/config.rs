use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::filter::{Filter, DEFAULT_EXCLUDE};
use crate::inject::TemplateEngine;
use crate::session::SessionOptions;

/// Project-level config file, looked up in the project root.
pub const CONFIG_FILE: &str = "envsubst.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_global_object")]
    pub global_object: String,
    #[serde(default)]
    pub template_engine: TemplateEngine,
    #[serde(default, deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    #[serde(default = "default_exclude", deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
    #[serde(default = "default_env_prefix", deserialize_with = "one_or_many")]
    pub env_prefix: Vec<String>,
    #[serde(default = "default_declaration_file")]
    pub declaration_file: String,
}

fn default_global_object() -> String {
    "globalThis".into()
}
fn default_exclude() -> Vec<String> {
    vec![DEFAULT_EXCLUDE.into()]
}
fn default_env_prefix() -> Vec<String> {
    vec!["VITE_".into()]
}
fn default_declaration_file() -> String {
    "src/vite-env.d.ts".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            global_object: default_global_object(),
            template_engine: TemplateEngine::default(),
            include: Vec::new(),
            exclude: default_exclude(),
            env_prefix: default_env_prefix(),
            declaration_file: default_declaration_file(),
        }
    }
}

/// Accept either `key = "a"` or `key = ["a", "b"]`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Map of ENVSUBST_ env var suffix → struct field name
const ENV_FIELD_MAP: &[(&str, &str)] = &[
    ("GLOBAL_OBJECT", "global_object"),
    ("TEMPLATE_ENGINE", "template_engine"),
    ("INCLUDE", "include"),
    ("EXCLUDE", "exclude"),
    ("ENV_PREFIX", "env_prefix"),
    ("DECLARATION_FILE", "declaration_file"),
];

impl AppConfig {
    /// Load config with layered resolution: defaults → envsubst.toml → local .env → env vars
    pub fn load(root: &Path) -> Result<Self> {
        // Layer 1: project TOML
        let toml_path = root.join(CONFIG_FILE);
        let mut cfg = if toml_path.exists() {
            let content = std::fs::read_to_string(&toml_path)
                .with_context(|| format!("Failed to read {}", toml_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", toml_path.display()))?
        } else {
            Self::default()
        };

        // Layer 2: local .env
        let env_path = root.join(".env");
        if env_path.exists() {
            let env_map = parse_dotenv(&env_path)?;
            cfg.apply_env_map(&env_map);
        }

        // Layer 3: actual environment variables
        let mut env_map = HashMap::new();
        for (suffix, _) in ENV_FIELD_MAP {
            let key = format!("ENVSUBST_{suffix}");
            if let Ok(val) = std::env::var(&key) {
                env_map.insert(key, val);
            }
        }
        cfg.apply_env_map(&env_map);

        Ok(cfg)
    }

    fn apply_env_map(&mut self, map: &HashMap<String, String>) {
        for (suffix, _field) in ENV_FIELD_MAP {
            let key = format!("ENVSUBST_{suffix}");
            if let Some(val) = map.get(&key) {
                self.set_field(suffix, val);
            }
        }
    }

    /// Set a field by its env suffix
    pub fn set_field(&mut self, suffix: &str, value: &str) {
        match suffix {
            "GLOBAL_OBJECT" => {
                if !value.trim().is_empty() {
                    self.global_object = value.trim().into();
                }
            }
            "TEMPLATE_ENGINE" => self.template_engine = normalize_template_engine(value),
            "INCLUDE" => self.include = split_list(value),
            "EXCLUDE" => self.exclude = split_list(value),
            "ENV_PREFIX" => self.env_prefix = split_list(value),
            "DECLARATION_FILE" => {
                if !value.trim().is_empty() {
                    self.declaration_file = value.trim().into();
                }
            }
            _ => {}
        }
    }

    /// Build the eligibility filter and session inputs rooted at `root`.
    pub fn session_options(&self, root: &Path) -> Result<SessionOptions> {
        let filter = Filter::new(self.include.as_slice(), self.exclude.as_slice(), root)
            .context("Invalid include/exclude configuration")?;
        Ok(SessionOptions {
            root: root.to_path_buf(),
            declaration_file: PathBuf::from(&self.declaration_file),
            env_prefix: self.env_prefix.clone(),
            global_object: self.global_object.clone(),
            template_engine: self.template_engine,
            filter,
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Unknown engines fall back to envsubst.
pub fn normalize_template_engine(value: &str) -> TemplateEngine {
    value.parse().unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    for item in iter {
        let (key, val) = match item {
            Ok(pair) => pair,
            // a malformed line only loses itself
            Err(dotenvy::Error::LineParse(..)) => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        if key.starts_with("ENVSUBST_") {
            map.insert(key, val);
        }
    }
    Ok(map)
}
