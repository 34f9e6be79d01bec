use std::env;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::LevelFilter;
use pong_tournament_core::EngineOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    match value.parse() {
                        Ok(value) => $config.$name = value,
                        Err(err) => log::warn!("Ignoring invalid {}={:?}: {}", $key, value, err),
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    /// The file finished tournaments are appended to.
    pub history: PathBuf,
    pub engine: EngineOptions,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;

        Ok(toml::from_str(&buf)?)
    }

    /// Reads the config from `path`, using the defaults if the file does not exist.
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        match Self::from_file(path) {
            Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            res => res,
        }
    }

    /// Overrides the values of the config with those set in the environment.
    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "PONG_LOGLEVEL", loglevel, "PONG_HISTORY", history);
        from_environment!(
            self.engine,
            "PONG_SEEDING",
            seeding,
            "PONG_TIE_POLICY",
            tie_policy,
        );

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Warn,
            history: PathBuf::from("pong-tournaments.json"),
            engine: EngineOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
