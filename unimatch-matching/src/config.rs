use std::time::Duration;

use serde::Deserialize;

use crate::embedding::{EmbeddingError, HttpEmbedder};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db")]
    pub database_url: String,
    #[serde(default = "default_embedding_url")]
    pub embedding_url: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default)]
    pub embedding_api_key: Option<String>,
    #[serde(default = "default_embedding_timeout_secs")]
    pub embedding_timeout_secs: u64,
    /// Percentage threshold for stored candidates when a run does not pass one.
    #[serde(default)]
    pub default_min_score: f64,
}

fn default_port() -> u16 { 8001 }
fn default_db() -> String { "matchmaking.db".into() }
fn default_embedding_url() -> String { "http://localhost:8080/v1".into() }
fn default_embedding_model() -> String { "all-MiniLM-L6-v2".into() }
fn default_embedding_timeout_secs() -> u64 { 30 }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(config::Environment::with_prefix("UNIMATCH_MATCHING").separator("__"))
    }

    fn from_env(env: config::Environment) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn embedder(&self) -> Result<HttpEmbedder, EmbeddingError> {
        HttpEmbedder::new(
            &self.embedding_url,
            self.embedding_model.clone(),
            self.embedding_api_key.clone(),
            Duration::from_secs(self.embedding_timeout_secs),
        )
    }
}
