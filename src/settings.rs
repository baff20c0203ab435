use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::bestiary;
use crate::notion::{DEFAULT_API_URL, DEFAULT_VERSION};

const CONFIG_FILE: &str = "bestiary";
const ENV_PREFIX: &str = "NOTION";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub api_url: String,
    pub version: String,
    pub concurrency: usize,
}

impl Settings {
    /// Defaults, then `bestiary.toml` if present, then `NOTION_*` variables.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let settings = builder
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("version", DEFAULT_VERSION)?
            .set_default("concurrency", 4)?
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    /// Command-line flags win over everything else.
    pub fn override_with(
        mut self,
        api_key: Option<String>,
        database_id: Option<String>,
        concurrency: Option<usize>,
    ) -> Self {
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if database_id.is_some() {
            self.database_id = database_id;
        }
        if let Some(n) = concurrency {
            self.concurrency = n;
        }
        self.concurrency = bestiary::clamp_concurrency(self.concurrency);
        self
    }
}
