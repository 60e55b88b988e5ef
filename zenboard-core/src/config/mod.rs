//! Configuration shared by every zenboard binary. Service-specific
//! settings layer on top of this in each service's own config module.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TCP port the HTTP listener binds.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Layered load: an optional `zenboard` config file, with
    /// `ZENBOARD__`-prefixed environment variables on top.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("zenboard").required(false))
            .add_source(config::Environment::with_prefix("ZENBOARD").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
