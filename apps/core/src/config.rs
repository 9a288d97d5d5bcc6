//! Runtime configuration loaded from the environment.
//!
//! Every setting has a `SENTIFY_` prefixed variable. A `.env` file in the
//! working directory is honoured by the binary before this module reads
//! anything.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::analysis::classifier::DEFAULT_MAX_INPUT_TOKENS;
use crate::error::AppError;

pub const ENV_LLM_ENDPOINT: &str = "SENTIFY_LLM_ENDPOINT";
pub const ENV_LLM_API_KEY: &str = "SENTIFY_LLM_API_KEY";
pub const ENV_LLM_MODEL: &str = "SENTIFY_LLM_MODEL";
pub const ENV_LLM_API_VERSION: &str = "SENTIFY_LLM_API_VERSION";
pub const ENV_LLM_TEMPERATURE: &str = "SENTIFY_LLM_TEMPERATURE";
pub const ENV_LLM_TIMEOUT_SECS: &str = "SENTIFY_LLM_TIMEOUT_SECS";
pub const ENV_CLASSIFIER: &str = "SENTIFY_CLASSIFIER";
pub const ENV_MAX_INPUT_TOKENS: &str = "SENTIFY_MAX_INPUT_TOKENS";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which implementation backs the intent, audience and formality classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Regex cue classifiers, no model download.
    #[default]
    Pattern,
    /// FastEmbed sentence embeddings (`semantic` feature).
    Semantic,
}

impl fmt::Display for ClassifierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierBackend::Pattern => f.write_str("pattern"),
            ClassifierBackend::Semantic => f.write_str("semantic"),
        }
    }
}

impl FromStr for ClassifierBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(ClassifierBackend::Pattern),
            "semantic" => Ok(ClassifierBackend::Semantic),
            other => Err(AppError::Config(format!(
                "{} must be 'pattern' or 'semantic', got '{}'",
                ENV_CLASSIFIER, other
            ))),
        }
    }
}

/// Local analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnalyzerSettings {
    pub backend: ClassifierBackend,
    /// Classifier input limit in whitespace tokens
    #[validate(range(min = 1, max = 100_000))]
    pub max_input_tokens: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Pattern,
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
        }
    }
}

impl AnalyzerSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let backend = match env::var(ENV_CLASSIFIER) {
            Ok(value) => value.parse()?,
            Err(_) => ClassifierBackend::default(),
        };
        let max_input_tokens = parse_env(ENV_MAX_INPUT_TOKENS, DEFAULT_MAX_INPUT_TOKENS)?;

        let settings = Self { backend, max_input_tokens };
        settings
            .validate()
            .map_err(|e| AppError::Config(format!("invalid analyzer settings: {}", e)))?;
        Ok(settings)
    }
}

/// Chat-completion endpoint settings (OpenAI or Azure OpenAI).
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LlmSettings {
    /// Base URL, e.g. `https://api.openai.com/v1` or `https://<resource>.openai.azure.com`
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name, or the deployment name on Azure.
    #[validate(length(min = 1, max = 128))]
    pub model: String,
    /// Azure `api-version`. When set, Azure URL layout and `api-key` auth are used.
    pub api_version: Option<String>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmSettings {
    /// Settings for `endpoint` with every other value at its default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_version: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Whether requests use the Azure OpenAI URL layout.
    pub fn is_azure(&self) -> bool {
        self.api_version.is_some()
    }

    /// Read settings from the environment. Returns `Ok(None)` when no
    /// endpoint is configured.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        let Some(endpoint) = non_empty_var(ENV_LLM_ENDPOINT) else {
            return Ok(None);
        };

        let settings = Self {
            endpoint,
            api_key: non_empty_var(ENV_LLM_API_KEY),
            model: non_empty_var(ENV_LLM_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_version: non_empty_var(ENV_LLM_API_VERSION),
            temperature: parse_env(ENV_LLM_TEMPERATURE, DEFAULT_TEMPERATURE)?,
            timeout_secs: parse_env(ENV_LLM_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?,
        };

        settings.check()?;
        Ok(Some(settings))
    }

    /// Validate field ranges, the endpoint URL and the auth combination.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::Config(format!("invalid LLM settings: {}", e)))?;

        let url = url::Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "{} must be an http(s) URL, got '{}'",
                ENV_LLM_ENDPOINT, self.endpoint
            )));
        }

        if self.is_azure() && self.api_key.is_none() {
            return Err(AppError::Config(format!(
                "{} is required when {} is set",
                ENV_LLM_API_KEY, ENV_LLM_API_VERSION
            )));
        }

        Ok(())
    }
}

/// All runtime settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub llm: Option<LlmSettings>,
    pub analyzer: AnalyzerSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let settings = Self {
            llm: LlmSettings::from_env()?,
            analyzer: AnalyzerSettings::from_env()?,
        };
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// LLM settings, required by the feedback, edit and generation flows.
    pub fn llm(&self) -> Result<&LlmSettings, AppError> {
        self.llm.as_ref().ok_or_else(|| {
            AppError::Config(format!(
                "{} is not set; it is required for AI feedback and edits",
                ENV_LLM_ENDPOINT
            ))
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match non_empty_var(key) {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", key, value, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 8] = [
        ENV_LLM_ENDPOINT,
        ENV_LLM_API_KEY,
        ENV_LLM_MODEL,
        ENV_LLM_API_VERSION,
        ENV_LLM_TEMPERATURE,
        ENV_LLM_TIMEOUT_SECS,
        ENV_CLASSIFIER,
        ENV_MAX_INPUT_TOKENS,
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let mut all: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|k| (*k, None)).collect();
        for (key, value) in vars {
            if let Some(slot) = all.iter_mut().find(|(k, _)| k == key) {
                slot.1 = Some(*value);
            }
        }
        temp_env::with_vars(all, f);
    }

    #[test]
    fn test_defaults_without_env() {
        with_env(&[], || {
            let settings = Settings::from_env().unwrap();
            assert!(settings.llm.is_none());
            assert_eq!(settings.analyzer, AnalyzerSettings::default());
            assert!(matches!(settings.llm(), Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_openai_settings() {
        with_env(
            &[
                (ENV_LLM_ENDPOINT, "https://api.openai.com/v1"),
                (ENV_LLM_API_KEY, "sk-test"),
                (ENV_LLM_TEMPERATURE, "0.2"),
            ],
            || {
                let settings = Settings::from_env().unwrap();
                let llm = settings.llm().unwrap();
                assert_eq!(llm.model, DEFAULT_MODEL);
                assert_eq!(llm.temperature, 0.2);
                assert_eq!(llm.timeout_secs, DEFAULT_TIMEOUT_SECS);
                assert!(!llm.is_azure());
                assert!(!format!("{:?}", llm).contains("sk-test"));
            },
        );
    }

    #[test]
    fn test_azure_requires_api_key() {
        with_env(
            &[
                (ENV_LLM_ENDPOINT, "https://example.openai.azure.com"),
                (ENV_LLM_API_VERSION, "2024-06-01"),
            ],
            || {
                assert!(matches!(LlmSettings::from_env(), Err(AppError::Config(_))));
            },
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        with_env(&[(ENV_LLM_ENDPOINT, "not a url")], || {
            assert!(matches!(LlmSettings::from_env(), Err(AppError::Config(_))));
        });
        with_env(
            &[(ENV_LLM_ENDPOINT, "http://localhost:8080"), (ENV_LLM_TEMPERATURE, "3.5")],
            || {
                assert!(matches!(LlmSettings::from_env(), Err(AppError::Config(_))));
            },
        );
        with_env(&[(ENV_CLASSIFIER, "neural")], || {
            assert!(matches!(AnalyzerSettings::from_env(), Err(AppError::Config(_))));
        });
        with_env(&[(ENV_MAX_INPUT_TOKENS, "0")], || {
            assert!(matches!(AnalyzerSettings::from_env(), Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_classifier_backend_parsing() {
        with_env(&[(ENV_CLASSIFIER, "Semantic"), (ENV_MAX_INPUT_TOKENS, "128")], || {
            let settings = AnalyzerSettings::from_env().unwrap();
            assert_eq!(settings.backend, ClassifierBackend::Semantic);
            assert_eq!(settings.max_input_tokens, 128);
        });
    }
}
