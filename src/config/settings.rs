//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every struct is `#[serde(default)]`: a hand-edited `settings.toml` only
//! needs the keys the user wants to override.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Selects which remote service performs the chat analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` REST API.
    Gemini,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, Ollama, LM Studio …).
    OpenAiCompatible,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the remote analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which backend to use.
    pub provider: LlmProvider,
    /// Base URL of the API endpoint, without a trailing path.
    ///
    /// - Gemini: `https://generativelanguage.googleapis.com`
    /// - OpenAI: `https://api.openai.com`
    /// - Ollama: `http://localhost:11434`
    pub base_url: String,
    /// API key. When `None` or empty the key is read from `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is not set.
    pub api_key_env: String,
    /// Model identifier sent to the API (e.g. `"gemini-1.5-flash"`).
    pub model: String,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f32,
    /// Maximum seconds to wait for the analysis reply before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// The key to authenticate with: `api_key` if non-empty, otherwise the
    /// value of the `api_key_env` environment variable.
    ///
    /// Returns `None` when neither yields a non-empty string.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
            })
    }
}

// ---------------------------------------------------------------------------
// ValidationConfig
// ---------------------------------------------------------------------------

/// Settings for the export-format check that gates every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How many leading lines are inspected for a timestamp-prefixed line.
    pub prefix_lines: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { prefix_lines: 5 }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// eframe window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Initial window position `(x, y)` in screen pixels.  `None` means
    /// let the window manager pick a position.
    pub window_position: Option<(f32, f32)>,
    /// Keep the window above all other windows.
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (720.0, 640.0),
            window_position: None,
            always_on_top: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use chat_vibes::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Analysis backend settings.
    pub llm: LlmConfig,
    /// Export-format check settings.
    pub validation: ValidationConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.llm.provider, loaded.llm.provider);
        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.api_key_env, loaded.llm.api_key_env);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);
        assert_eq!(original.llm.temperature, loaded.llm.temperature);
        assert_eq!(
            original.validation.prefix_lines,
            loaded.validation.prefix_lines
        );
        assert_eq!(original.ui.window_size, loaded.ui.window_size);
        assert_eq!(original.ui.always_on_top, loaded.ui.always_on_top);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.llm.model, default.llm.model);
        assert_eq!(config.llm.provider, default.llm.provider);
        assert_eq!(
            config.validation.prefix_lines,
            default.validation.prefix_lines
        );
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.llm.provider, LlmProvider::Gemini);
        assert_eq!(cfg.llm.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.llm.model, "gemini-1.5-flash");
        assert_eq!(cfg.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.llm.timeout_secs, 60);
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.validation.prefix_lines, 5);
        assert!(!cfg.ui.always_on_top);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.provider = LlmProvider::OpenAiCompatible;
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.model = "gpt-4o-mini".into();
        cfg.llm.timeout_secs = 30;
        cfg.validation.prefix_lines = 10;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(loaded.llm.base_url, "https://api.openai.com");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.model, "gpt-4o-mini");
        assert_eq!(loaded.llm.timeout_secs, 30);
        assert_eq!(loaded.validation.prefix_lines, 10);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gemini-1.5-pro\"\n").expect("write");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.model, "gemini-1.5-pro");
        assert_eq!(loaded.llm.timeout_secs, 60);
        assert_eq!(loaded.validation.prefix_lines, 5);
    }

    #[test]
    fn explicit_api_key_wins() {
        let cfg = LlmConfig {
            api_key: Some("from-config".into()),
            api_key_env: "CHAT_VIBES_TEST_UNSET_VARIABLE".into(),
            ..LlmConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn empty_api_key_falls_back_to_missing_env() {
        let cfg = LlmConfig {
            api_key: Some(String::new()),
            api_key_env: "CHAT_VIBES_TEST_UNSET_VARIABLE".into(),
            ..LlmConfig::default()
        };
        assert!(cfg.resolved_api_key().is_none());
    }
}
