//! Runtime settings resolved from CLI flags and the environment.

use crate::error::LlmError;
use crate::llm::{ANTHROPIC_BASE_URL, HttpChat, OPENAI_BASE_URL, Provider};
use crate::store::JsonFileStore;
use clap::ValueEnum;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const API_URL_VAR: &str = "LLM_API_URL";

/// Provider names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProviderKind {
    #[default]
    Mock,
    #[value(alias = "oai")]
    Openai,
    #[value(alias = "claude")]
    Anthropic,
}

/// Everything needed to pick an answer strategy
#[derive(Debug, Clone, Default)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub system: Option<String>,
    /// Answer from this file instead of the network
    pub mock_file: Option<PathBuf>,
}

impl LlmSettings {
    /// Build the provider, reading credentials from the process environment
    pub fn build_provider(&self) -> Result<Provider, LlmError> {
        self.build_provider_with(|name| std::env::var(name).ok())
    }

    /// Build the provider with an explicit environment lookup
    pub fn build_provider_with<F>(&self, env: F) -> Result<Provider, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.mock_file {
            debug!(path = %path.display(), "using mock file provider");
            return Ok(Provider::MockFile(path.clone()));
        }

        let (key_var, default_base, default_model) = match self.provider {
            ProviderKind::Mock => return Ok(Provider::Mock),
            ProviderKind::Openai => (OPENAI_KEY_VAR, OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL),
            ProviderKind::Anthropic => {
                (ANTHROPIC_KEY_VAR, ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL)
            }
        };

        let api_key = env(key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingCredential(key_var))?;
        let base_url = env(API_URL_VAR).unwrap_or_else(|| default_base.to_string());
        let model = self
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string());

        debug!(provider = ?self.provider, %model, %base_url, "using hosted provider");
        let chat = HttpChat::new(base_url, api_key, model, self.system.clone())?;
        Ok(match self.provider {
            ProviderKind::Anthropic => Provider::Anthropic(chat),
            _ => Provider::OpenAi(chat),
        })
    }
}

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub llm: LlmSettings,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Settings {
            data_dir: data_dir.into(),
            llm: LlmSettings::default(),
        }
    }

    pub fn with_llm(mut self, llm: LlmSettings) -> Self {
        self.llm = llm;
        self
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_dir)
    }
}
