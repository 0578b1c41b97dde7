//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (built-in defaults when the file is absent), then applies environment
//! overrides. Provider credentials come from the environment only, never
//! from TOML.
//!
//! | env var            | effect                                   |
//! |--------------------|------------------------------------------|
//! | `OPENAI_API_KEY`   | enables the OpenAI tier                  |
//! | `OPENAI_MODEL`     | overrides `[providers.openai] model`     |
//! | `HF_API_KEY`       | enables the Hugging Face tier            |
//! | `HF_MODEL`         | overrides `[providers.huggingface] model`|
//! | `KG_MODE`          | `"1"` enables graph mode, anything else disables it |
//! | `KG_PATH`          | overrides `[graph] path`                 |
//! | `HERLENS_LOG_LEVEL`| overrides `[server] log_level`           |
//! | `HERLENS_BIND`     | overrides `[server] bind`                |

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP API to.
    pub bind: String,
}

/// Knowledge-graph tier configuration.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Whether the graph tier is consulted before the providers.
    pub enabled: bool,
    /// Location of the graph JSON document (already expanded, no `~`).
    pub path: PathBuf,
}

/// OpenAI / OpenAI-compatible provider configuration (`[providers.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Hugging Face inference provider configuration (`[providers.huggingface]`).
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Base URL; the model id is appended as a path suffix.
    pub api_base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub openai: OpenAiConfig,
    pub huggingface: HuggingFaceConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub providers: ProvidersConfig,
    /// From `OPENAI_API_KEY`; `None` when unset or empty.
    pub openai_api_key: Option<String>,
    /// From `HF_API_KEY`; `None` when unset or empty.
    pub hf_api_key: Option<String>,
}

impl Config {
    pub fn openai_key_present(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn hf_key_present(&self) -> bool {
        self.hf_api_key.is_some()
    }
}

/// Environment values that override or complete the TOML file.
///
/// [`load`] fills this from the process environment; tests construct it
/// directly instead of mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub log_level: Option<String>,
    pub bind: Option<String>,
    pub graph_mode: Option<String>,
    pub graph_path: Option<String>,
    pub openai_model: Option<String>,
    pub hf_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub hf_api_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("HERLENS_LOG_LEVEL").ok(),
            bind: env::var("HERLENS_BIND").ok(),
            graph_mode: env::var("KG_MODE").ok(),
            graph_path: env::var("KG_PATH").ok(),
            openai_model: env::var("OPENAI_MODEL").ok(),
            hf_model: env::var("HF_MODEL").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            hf_api_key: env::var("HF_API_KEY").ok(),
        }
    }
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    graph: RawGraph,
    #[serde(default)]
    providers: RawProviders,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawGraph {
    /// Defaults to `false`: graph mode must be switched on explicitly.
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_graph_path")]
    path: String,
}

#[derive(Deserialize, Default)]
struct RawProviders {
    #[serde(default)]
    openai: RawOpenAi,
    #[serde(default)]
    huggingface: RawHuggingFace,
}

#[derive(Deserialize)]
struct RawOpenAi {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

#[derive(Deserialize)]
struct RawHuggingFace {
    #[serde(default = "default_hf_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_hf_model")]
    model: String,
    #[serde(default = "default_hf_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawServer {
    fn default() -> Self {
        Self { bind: default_bind(), log_level: default_log_level() }
    }
}

impl Default for RawGraph {
    fn default() -> Self {
        Self { enabled: false, path: default_graph_path() }
    }
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

impl Default for RawHuggingFace {
    fn default() -> Self {
        Self {
            api_base_url: default_hf_api_base_url(),
            model: default_hf_model(),
            timeout_seconds: default_hf_timeout_seconds(),
        }
    }
}

fn default_bind() -> String { "127.0.0.1:8000".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_graph_path() -> String { "data/knowledge_graph.json".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_temperature() -> f32 { 0.2 }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_hf_api_base_url() -> String { "https://router.huggingface.co/hf-inference/models".to_string() }
fn default_hf_model() -> String { "bigscience/bloomz-560m".to_string() }
fn default_hf_timeout_seconds() -> u64 { 30 }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `config/default.toml` (or built-in defaults when the
/// file does not exist), then apply the process environment.
pub fn load() -> Result<Config, AppError> {
    let overrides = EnvOverrides::from_env();
    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        resolve(RawConfig::default(), &overrides)
    }
}

/// Load an explicit TOML file and apply `overrides`.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(raw: RawConfig, env: &EnvOverrides) -> Result<Config, AppError> {
    let log_level = env.log_level.clone().unwrap_or(raw.server.log_level);
    logger::parse_level(&log_level).map_err(|e| AppError::Config(e.to_string()))?;

    let graph_enabled = match env.graph_mode.as_deref() {
        Some(mode) => mode == "1",
        None => raw.graph.enabled,
    };
    let graph_path = env.graph_path.as_deref().unwrap_or(&raw.graph.path);

    let openai = raw.providers.openai;
    let huggingface = raw.providers.huggingface;

    Ok(Config {
        log_level,
        server: ServerConfig {
            bind: env.bind.clone().unwrap_or(raw.server.bind),
        },
        graph: GraphConfig {
            enabled: graph_enabled,
            path: expand_home(graph_path),
        },
        providers: ProvidersConfig {
            openai: OpenAiConfig {
                api_base_url: openai.api_base_url,
                model: non_empty(env.openai_model.clone()).unwrap_or(openai.model),
                temperature: openai.temperature,
                timeout_seconds: openai.timeout_seconds,
            },
            huggingface: HuggingFaceConfig {
                api_base_url: huggingface.api_base_url,
                model: non_empty(env.hf_model.clone()).unwrap_or(huggingface.model),
                timeout_seconds: huggingface.timeout_seconds,
            },
        },
        openai_api_key: non_empty(env.openai_api_key.clone()),
        hf_api_key: non_empty(env.hf_api_key.clone()),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests: graph mode on, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default(graph_path: &Path) -> Self {
        Self {
            log_level: "info".into(),
            server: ServerConfig { bind: "127.0.0.1:0".into() },
            graph: GraphConfig { enabled: true, path: graph_path.to_path_buf() },
            providers: ProvidersConfig {
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
                huggingface: HuggingFaceConfig {
                    api_base_url: "http://localhost:0/models".into(),
                    model: "test/model".into(),
                    timeout_seconds: 1,
                },
            },
            openai_api_key: None,
            hf_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[server]
bind = "0.0.0.0:9000"
log_level = "debug"

[graph]
enabled = true
path = "graphs/kg.json"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_basic_config() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert_eq!(cfg.log_level, "debug");
        assert!(cfg.graph.enabled);
        assert_eq!(cfg.graph.path, PathBuf::from("graphs/kg.json"));
        assert_eq!(cfg.providers.openai.model, "gpt-4o-mini");
        assert_eq!(cfg.providers.huggingface.model, "bigscience/bloomz-560m");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert!(!cfg.graph.enabled);
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
        assert_eq!(cfg.providers.huggingface.timeout_seconds, 30);
        assert!(!cfg.openai_key_present());
        assert!(!cfg.hf_key_present());
    }

    #[test]
    fn kg_mode_env_overrides_toml() {
        let f = write_toml(MINIMAL_TOML);
        let off = EnvOverrides { graph_mode: Some("0".into()), ..Default::default() };
        assert!(!load_from(f.path(), &off).unwrap().graph.enabled);

        let f = write_toml("");
        let on = EnvOverrides { graph_mode: Some("1".into()), ..Default::default() };
        assert!(load_from(f.path(), &on).unwrap().graph.enabled);
    }

    #[test]
    fn keys_and_models_come_from_env() {
        let f = write_toml(MINIMAL_TOML);
        let env = EnvOverrides {
            openai_api_key: Some("sk-test".into()),
            hf_api_key: Some("".into()),
            openai_model: Some("gpt-4.1".into()),
            hf_model: Some("google/flan-t5-base".into()),
            ..Default::default()
        };
        let cfg = load_from(f.path(), &env).unwrap();
        assert!(cfg.openai_key_present());
        assert!(!cfg.hf_key_present(), "empty key counts as absent");
        assert_eq!(cfg.providers.openai.model, "gpt-4.1");
        assert_eq!(cfg.providers.huggingface.model, "google/flan-t5-base");
    }

    #[test]
    fn invalid_log_level_rejected() {
        let f = write_toml("[server]\nlog_level = \"loud\"\n");
        let err = load_from(f.path(), &EnvOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &EnvOverrides::default());
        assert!(result.unwrap_err().to_string().contains("cannot read"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/kg.json");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("kg.json"));
    }

    #[test]
    fn relative_path_unchanged() {
        assert_eq!(expand_home("data/kg.json"), PathBuf::from("data/kg.json"));
    }
}
