use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::config::JobConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbosity of the command output.
    #[arg(long)]
    pub verbose: Option<LevelFilter>,

    /// Job configuration file. A default one is written if it doesn't exist.
    #[arg(long, short = 'c', default_value = "/etc/periodic-dump.toml")]
    pub config: PathBuf,

    /// Only check that the backup could run, don't dump anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub job: JobArgs,

    #[command(subcommand)]
    pub action: Option<Action>,
}

/// Overrides of the values in the configuration file.
#[derive(Args, Debug, Default)]
pub struct JobArgs {
    /// Database server host.
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Database user.
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Password of the database user.
    #[arg(long, env = "PERIODIC_DUMP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database to dump.
    #[arg(long, short = 'd')]
    pub database: Option<String>,

    /// Prefix of the backup file, usually a directory with trailing `/`.
    #[arg(long)]
    pub destination: Option<String>,

    /// Compression code: gz, bz2 or anything else for plain SQL.
    #[arg(long, short = 'z')]
    pub compression: Option<String>,

    /// Executable producing the SQL dump.
    #[arg(long)]
    pub dump_tool: Option<String>,
}

impl JobArgs {
    /// Overwrites every value of `cfg` that was given on the command line.
    pub fn apply(self, cfg: &mut JobConfig) {
        let Self {
            host,
            user,
            password,
            database,
            destination,
            compression,
            dump_tool,
        } = self;

        let fields = [
            (host, &mut cfg.host),
            (user, &mut cfg.user),
            (password, &mut cfg.password),
            (database, &mut cfg.database),
            (destination, &mut cfg.destination),
            (compression, &mut cfg.compression),
            (dump_tool, &mut cfg.dump_tool),
        ];
        for (arg, value) in fields {
            if let Some(arg) = arg {
                *value = arg;
            }
        }
    }
}

#[derive(Subcommand, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Dump the database. (Default)
    #[default]
    Backup,
    /// Check that the dump tool and compression program are installed.
    Check,
}
