//! Configuration loading and retrieval tunables.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `LEXDB_*`
//! env vars. The BM25 constants and fusion weights are tunables, not fixed
//! law: no default here is authoritative, every one can be overridden.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkerConfig;

/// Okapi BM25 constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Reciprocal-rank-fusion weights and damping constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    pub keyword_weight: f32,
    pub semantic_weight: f32,
    pub kappa: f32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self { keyword_weight: 0.5, semantic_weight: 0.5, kappa: 60.0 }
    }
}

/// Everything the retrieval engine needs to know at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub chunker: ChunkerConfig,
    pub bm25: Bm25Params,
    pub fusion: FusionParams,
    pub embed_dim: usize,
    pub default_k: usize,
    pub lookup_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunker: ChunkerConfig::default(),
            bm25: Bm25Params::default(),
            fusion: FusionParams::default(),
            embed_dim: 384,
            default_k: 5,
            lookup_timeout_ms: 2_000,
        }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("LEXDB_").split("__"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed retrieval section, falling back to defaults when `config.toml`
    /// has no `[retrieval]` table at all.
    pub fn retrieval(&self) -> RetrievalConfig {
        self.get("retrieval").unwrap_or_default()
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

/// Resolve a possibly relative path against a given base directory after
/// expansion. Absolute paths are returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
