//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`, e.g.
//! `APP_QUERY__ANSWER_DEFAULT_K=5`). Provides helpers to expand `~` and
//! `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Upper bound for `k` accepted by `extract`.
pub const EXTRACT_MAX_K: usize = 50;
/// Upper bound for `k` accepted by `answer`.
pub const ANSWER_MAX_K: usize = 10;
/// Default character budget for a synthesized answer.
pub const DEFAULT_MAX_ANSWER_CHARS: usize = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    pub docs_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingSettings {
    pub max_words: usize,
    pub overlap_percent: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Remove common English stop words during tokenization.
    pub stop_words: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySettings {
    pub extract_default_k: usize,
    pub answer_default_k: usize,
    pub max_answer_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    pub chunking: ChunkingSettings,
    pub index: IndexSettings,
    pub query: QuerySettings,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { docs_dir: "data/docs".to_string() }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { max_words: 300, overlap_percent: 0.2 }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self { extract_default_k: 5, answer_default_k: 3, max_answer_chars: DEFAULT_MAX_ANSWER_CHARS }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let q = &self.query;
        if !(1..=EXTRACT_MAX_K).contains(&q.extract_default_k) {
            return Err(Error::InvalidConfig(format!(
                "query.extract_default_k must be in [1, {EXTRACT_MAX_K}], got {}",
                q.extract_default_k
            )));
        }
        if !(1..=ANSWER_MAX_K).contains(&q.answer_default_k) {
            return Err(Error::InvalidConfig(format!(
                "query.answer_default_k must be in [1, {ANSWER_MAX_K}], got {}",
                q.answer_default_k
            )));
        }
        if q.max_answer_chars == 0 {
            return Err(Error::InvalidConfig("query.max_answer_chars must be positive".into()));
        }
        let c = &self.chunking;
        if c.max_words == 0 {
            return Err(Error::InvalidConfig("chunking.max_words must be positive".into()));
        }
        if !(0.0..1.0).contains(&c.overlap_percent) {
            return Err(Error::InvalidConfig(format!(
                "chunking.overlap_percent must be in [0, 1), got {}",
                c.overlap_percent
            )));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Load from the working directory, picking the env overlay from `RUST_ENV`.
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("config.toml"), &env_name)
    }

    /// Load `base` plus its `<stem>.<env>.toml` sibling.
    pub fn load_from(base: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(base));
        let overlay = match env_name {
            "dev" | "development" => Some("dev"),
            "prod" | "production" => Some("prod"),
            "test" | "testing" => Some("test"),
            _ => None,
        };
        if let Some(suffix) = overlay {
            figment = figment.merge(Toml::file(base.with_extension(format!("{suffix}.toml"))));
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// The full typed settings tree, validated.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
