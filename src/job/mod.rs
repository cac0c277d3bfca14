//! Date-named database dumps using [BackupJob].
//!
//! A job builds its shell command once, on construction, and runs it with
//! [`BackupJob::run`]. The file lands at
//! `<destination>Periodic-database-update.<YYYY-MM-DD>.sql[.gz|.bz2]`.

pub mod command;
pub mod compression;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Local, NaiveDate};
use derive_more::{Display, Error};

pub use command::{shell_command, status_preserving_script, Connection};
pub use compression::{Compression, UnknownCompressionCode, COMPRESSION_PROGRAMS};

use crate::config::JobConfig;

/// Dump tool used unless configured otherwise.
pub const DEFAULT_DUMP_TOOL: &str = "mysqldump";

const FILE_NAME_PREFIX: &str = "Periodic-database-update";

/// One configured, ready-to-run database dump.
#[derive(Debug, Clone)]
pub struct BackupJob {
    file_name: String,
    command_line: String,
    script: String,
    redacted_command_line: String,
    output_path: PathBuf,
    compression: Compression,
    dump_tool: String,
}

impl BackupJob {
    /// Creates a job dated today using [DEFAULT_DUMP_TOOL].
    ///
    /// Unknown compression codes silently select [Compression::None].
    pub fn new(
        host: &str,
        user: &str,
        password: &str,
        database: &str,
        destination: &str,
        compression_code: &str,
    ) -> Self {
        Self::with_config(&JobConfig {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
            destination: destination.into(),
            compression: compression_code.into(),
            dump_tool: DEFAULT_DUMP_TOOL.into(),
        })
    }

    /// Creates a job dated today.
    pub fn with_config(cfg: &JobConfig) -> Self {
        Self::with_config_on(cfg, Local::now().date_naive())
    }

    /// Creates a job whose file name carries `date`.
    pub fn with_config_on(cfg: &JobConfig, date: NaiveDate) -> Self {
        let compression = Compression::from_code(&cfg.compression);
        if compression == Compression::None && !cfg.compression.is_empty() {
            log::debug!(target: "job", "Unknown compression code {:?}, dumping plain SQL", cfg.compression);
        }

        let file_name = generate_file_name(date, compression);
        let target = format!("{}{file_name}", cfg.destination);
        let output_path = PathBuf::from(&target);
        if output_path.is_relative() {
            log::warn!(target: "job", "Backup file path is relative: {}", output_path.display());
        }

        let mut connection = Connection {
            host: &cfg.host,
            user: &cfg.user,
            password: &cfg.password,
            database: &cfg.database,
        };
        let command_line = shell_command(&cfg.dump_tool, &connection, compression, &target);
        let script = status_preserving_script(&cfg.dump_tool, &connection, compression, &target);
        // an empty password stays visible, mysqldump prompts on a bare `-p`
        let redacted_command_line = if cfg.password.is_empty() {
            command_line.clone()
        } else {
            connection.password = "***";
            shell_command(&cfg.dump_tool, &connection, compression, &target)
        };

        Self {
            file_name,
            command_line,
            script,
            redacted_command_line,
            output_path,
            compression,
            dump_tool: cfg.dump_tool.clone(),
        }
    }

    /// Name of the backup file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The shell command [`run`](Self::run) executes.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// [`command_line`](Self::command_line) with the password masked.
    pub fn redacted_command_line(&self) -> &str {
        &self.redacted_command_line
    }

    /// Destination concatenated with the file name.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Runs the command through `sh` and waits for it to exit.
    ///
    /// Returns whether the exit status was zero. With compression the dump
    /// tool's status counts too, see [status_preserving_script]. An existing
    /// backup file of the same day is overwritten.
    pub fn run(&self) -> io::Result<bool> {
        log::info!(target: "job", "Dumping database ({}) to: {}", self.compression, self.output_path.display());
        log::trace!(target: "job", "Running: {}", self.redacted_command_line);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.script)
            .output()?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::debug!(target: "job", "{line}");
        }
        // relay stderr
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            log::warn!(target: "job", "{}", stderr.trim_end());
        }

        let success = output.status.success();
        if success {
            log::info!(target: "job", "Finished database dump: {}", self.file_name);
        } else {
            log::error!(target: "job", "Database dump failed: {}", output.status);
        }

        Ok(success)
    }

    /// Checks that the dump tool and the compression program are installed
    /// and that the destination directory accepts new files.
    ///
    /// Nothing but a short-lived probe file is written.
    pub fn preflight(&self) -> Result<(), PreflightError> {
        if !is_tool_installed(&self.dump_tool) {
            return Err(PreflightError::DumpToolMissing(self.dump_tool.clone()));
        }

        if let Some(program) = self.compression.program() {
            if !is_tool_installed(program) {
                return Err(PreflightError::CompressionToolMissing(program.to_string()));
            }
        }

        let dir = self
            .output_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let probe = dir.join(format!(".{}.probe", self.file_name));
        File::create_new(&probe)
            .and_then(|_| fs::remove_file(&probe))
            .map_err(|source| PreflightError::DestinationNotWritable {
                path: dir.to_path_buf(),
                source,
            })?;

        log::debug!(target: "job", "Preflight passed for {}", self.output_path.display());
        Ok(())
    }

    /// Whether [DEFAULT_DUMP_TOOL] is on the search path.
    pub fn is_dump_tool_installed() -> bool {
        is_tool_installed(DEFAULT_DUMP_TOOL)
    }

    /// Whether the program behind `compression_code` is on the search path.
    pub fn is_compression_tool_installed(
        compression_code: &str,
    ) -> Result<bool, UnknownCompressionCode> {
        let compression: Compression = compression_code.parse()?;
        Ok(compression.program().is_some_and(is_tool_installed))
    }
}

fn generate_file_name(date: NaiveDate, compression: Compression) -> String {
    let date = date.format("%Y-%m-%d");
    match compression.code() {
        Some(ext) => format!("{FILE_NAME_PREFIX}.{date}.sql.{ext}"),
        None => format!("{FILE_NAME_PREFIX}.{date}.sql"),
    }
}

/// Whether `program` resolves on the search path, as reported by the
/// shell's `command -v`.
pub fn is_tool_installed(program: &str) -> bool {
    let status = Command::new("sh")
        .arg("-c")
        .arg(r#"command -v "$1" >/dev/null"#)
        .arg("sh")
        .arg(program)
        .status();

    match status {
        Ok(status) => {
            log::trace!(target: "job::probe", "{program}: {status}");
            status.success()
        }
        Err(e) => {
            log::warn!(target: "job::probe", "Probing for {program} failed: {e}");
            false
        }
    }
}

#[derive(Debug, Display, Error)]
/// A [BackupJob] would fail under the present conditions.
pub enum PreflightError {
    /// Dump tool isn't on the search path.
    #[display("Dump tool not installed: {_0}")]
    DumpToolMissing(#[error(ignore)] String),
    /// Compression program isn't on the search path.
    #[display("Compression program not installed: {_0}")]
    CompressionToolMissing(#[error(ignore)] String),
    /// Destination directory is missing or read-only.
    #[display("Destination {} is not writable: {source}", path.display())]
    DestinationNotWritable { path: PathBuf, source: io::Error },
}
