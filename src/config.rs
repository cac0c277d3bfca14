//! TOML configuration of a [BackupJob](crate::job::BackupJob).

use std::io;
use std::path::Path;

use derive_more::{Display, Error, From};

use crate::job::DEFAULT_DUMP_TOOL;

/// Parameters of a backup job as stored in the configuration file.
///
/// Missing keys fall back to [JobConfig::default].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Database server host.
    pub host: String,
    /// Database user.
    pub user: String,
    /// Password of [`user`](Self::user), passed on the command line as `-p<password>`.
    pub password: String,
    /// Database to dump.
    pub database: String,
    /// Prefix the backup file name is appended to.
    ///
    /// No separator is inserted, so a directory needs its trailing `/`.
    pub destination: String,
    /// Compression code: `gz`, `bz2` or anything else for plain SQL.
    pub compression: String,
    /// Executable producing the SQL dump.
    pub dump_tool: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            user: "root".into(),
            password: String::new(),
            database: String::new(),
            destination: "/var/backups/mysql/".into(),
            compression: "gz".into(),
            dump_tool: DEFAULT_DUMP_TOOL.into(),
        }
    }
}

#[derive(Debug, Display, Error, From)]
/// Errors on loading the configuration file.
pub enum ConfigError {
    /// Configuration file can't be read.
    #[display("Reading the config file failed: {_0}")]
    Read(io::Error),
    /// Configuration file is no valid TOML job configuration.
    #[display("Parsing the config file failed: {_0}")]
    Parse(toml::de::Error),
    /// Default configuration can't be serialized.
    #[display("Serializing the default config failed: {_0}")]
    Serialize(toml::ser::Error),
}

impl JobConfig {
    /// Parses a TOML job configuration.
    pub fn from_toml(config: &[u8]) -> Result<Self, ConfigError> {
        Ok(toml::from_slice(config)?)
    }

    /// Loads the configuration at `path`.
    ///
    /// If there is no file yet, the default configuration is written there
    /// and returned. Failing to write it is only logged.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read(path) {
            Ok(config) => Self::from_toml(&config),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    target: "config",
                    "Writing default config to {} because it doesn't exist yet",
                    path.display()
                );
                let default_config = Self::default();
                let config_str = toml::to_string_pretty(&default_config)?;
                if let Err(e) = std::fs::write(path, config_str) {
                    log::warn!(
                        target: "config",
                        "Writing default config to {} failed: {e}",
                        path.display(),
                    );
                }

                Ok(default_config)
            }
            Err(e) => Err(ConfigError::Read(e)),
        }
    }
}
