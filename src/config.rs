//! Configuration management for idscan.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the Gemini Vision client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use (default: gemini-1.5-flash)
    #[serde(default = "default_model")]
    pub model: String,
    /// API endpoint base (default: https://generativelanguage.googleapis.com/v1beta)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens in response
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_temperature() -> f32 {
    0.4
}
fn default_max_output_tokens() -> u32 {
    1024
}
fn default_request_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl GeminiConfig {
    /// Read the API key from the environment.
    ///
    /// The key is never stored in config files and never logged.
    pub fn api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// The full generateContent URL for the configured model, without the key.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gemini client configuration.
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Default bind address for the web server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
}

impl Config {
    /// Load configuration: explicit path if given, otherwise discover
    /// `idscan.{toml,yaml,yml,json}` in the current directory, otherwise
    /// defaults. Environment overrides are applied last.
    pub async fn load(explicit: Option<&Path>) -> Self {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to load config {}: {}", path.display(), e);
                Self::default()
            }),
            None => match discover_config_file() {
                Some(path) => Self::load_from_path(&path).await.unwrap_or_default(),
                None => Self::default(),
            },
        };
        config.apply_env_overrides();
        config
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML, and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            "json" => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
            _ => {
                toml::from_str(&contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(model) = std::env::var("GEMINI_MODEL").ok().filter(|s| !s.is_empty()) {
            tracing::debug!("Using GEMINI_MODEL from environment: {}", model);
            self.gemini.model = model;
        }
        if let Some(bind) = std::env::var("IDSCAN_BIND").ok().filter(|s| !s.is_empty()) {
            tracing::debug!("Using IDSCAN_BIND from environment: {}", bind);
            self.bind = Some(bind);
        }
    }
}

/// Look for a config file in the current directory.
fn discover_config_file() -> Option<PathBuf> {
    let extensions = ["toml", "yaml", "yml", "json"];
    for ext in extensions {
        let path = PathBuf::from(format!("idscan.{}", ext));
        if path.exists() {
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert!((config.gemini.temperature - 0.4).abs() < f32::EPSILON);
        assert!(config.bind.is_none());
    }

    #[test]
    fn test_generate_url() {
        let config = GeminiConfig::default();
        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );

        let trailing = GeminiConfig {
            endpoint: "http://localhost:9090/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            trailing.generate_url(),
            "http://localhost:9090/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idscan.toml");
        tokio::fs::write(
            &path,
            "bind = \"0.0.0.0:8080\"\n\n[gemini]\nmodel = \"gemini-1.5-pro\"\n",
        )
        .await
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:8080"));
        // Unspecified fields keep their defaults
        assert_eq!(config.gemini.request_timeout, 120);
    }

    #[tokio::test]
    async fn test_load_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idscan.yaml");
        tokio::fs::write(&path, "gemini:\n  temperature: 0.1\n")
            .await
            .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert!((config.gemini.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }
}
