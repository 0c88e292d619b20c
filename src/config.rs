//! Optional config file: `<config_dir>/scengen/config.toml`.
//!
//! ```toml
//! [ollama]
//! binary = "/usr/local/bin/ollama"
//!
//! [defaults]
//! model = "llama3:latest"
//! source = "both"
//! test_name = "checkout"
//! ```
//!
//! A missing or unparseable file silently falls back to defaults.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::state::SourceSelection;

#[derive(Debug, Deserialize)]
struct RawConfig {
    ollama: Option<OllamaSection>,
    defaults: Option<DefaultsSection>,
}

#[derive(Debug, Deserialize)]
struct OllamaSection {
    binary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DefaultsSection {
    model: Option<String>,
    source: Option<String>,
    test_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub binary: String,
    pub default_model: Option<String>,
    pub default_source: SourceSelection,
    pub default_test_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            binary: "ollama".into(),
            default_model: None,
            default_source: SourceSelection::default(),
            default_test_name: String::new(),
        }
    }
}

fn config_path() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("scengen");
    dir.push("config.toml");
    dir
}

pub fn load() -> Config {
    let Ok(raw) = fs::read_to_string(config_path()) else {
        return Config::default();
    };
    let Ok(cfg) = toml::from_str::<RawConfig>(&raw) else {
        return Config::default();
    };

    from_raw(cfg)
}

fn from_raw(raw: RawConfig) -> Config {
    let mut out = Config::default();

    if let Some(ollama) = raw.ollama {
        if let Some(binary) = ollama.binary {
            if !binary.trim().is_empty() {
                out.binary = binary;
            }
        }
    }

    if let Some(defaults) = raw.defaults {
        out.default_model = defaults.model.filter(|m| !m.trim().is_empty());
        if let Some(source) = defaults.source.as_deref().and_then(SourceSelection::parse) {
            out.default_source = source;
        }
        if let Some(name) = defaults.test_name {
            out.default_test_name = name;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let raw: RawConfig = toml::from_str(
            r#"
            [ollama]
            binary = "/opt/ollama"

            [defaults]
            model = "mistral"
            source = "both"
            test_name = "login flow"
            "#,
        )
        .unwrap();

        let cfg = from_raw(raw);
        assert_eq!(cfg.binary, "/opt/ollama");
        assert_eq!(cfg.default_model.as_deref(), Some("mistral"));
        assert_eq!(cfg.default_source, SourceSelection::Both);
        assert_eq!(cfg.default_test_name, "login flow");
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let raw: RawConfig = toml::from_str("").unwrap();
        let cfg = from_raw(raw);

        assert_eq!(cfg.binary, "ollama");
        assert!(cfg.default_model.is_none());
        assert_eq!(cfg.default_source, SourceSelection::Code);
    }

    #[test]
    fn unknown_source_keeps_default() {
        let raw: RawConfig = toml::from_str(
            r#"
            [defaults]
            source = "screenshots"
            "#,
        )
        .unwrap();

        assert_eq!(from_raw(raw).default_source, SourceSelection::Code);
    }
}
