use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db")]
    pub database_url: String,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_port() -> u16 { 8000 }
fn default_db() -> String { "matchmaking.db".into() }
fn default_static_dir() -> String { "static".into() }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(config::Environment::with_prefix("UNIMATCH_INTAKE").separator("__"))
    }

    fn from_env(env: config::Environment) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
