use std::process::ExitCode;

use periodic_dump_lib::cli::{Action, Cli};
use periodic_dump_lib::config::JobConfig;
use periodic_dump_lib::job::{is_tool_installed, BackupJob};

use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // init logger
    let mut env_logger = env_logger::builder();
    if let Some(level) = cli.verbose {
        env_logger.filter_level(level);
    }
    env_logger.try_init().expect("env_logger should not fail");

    let mut cfg = match JobConfig::load_or_init(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!(target: "cli", "{e}");
            return ExitCode::FAILURE;
        }
    };
    cli.job.apply(&mut cfg);

    let ok = match cli.action.unwrap_or_default() {
        Action::Check => check(&cfg),
        Action::Backup => backup(&cfg, cli.dry_run),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn check(cfg: &JobConfig) -> bool {
    let dump_tool = is_tool_installed(&cfg.dump_tool);
    if dump_tool {
        log::info!(target: "cli", "Dump tool installed: {}", cfg.dump_tool);
    } else {
        log::error!(target: "cli", "Dump tool not installed: {}", cfg.dump_tool);
    }

    let compression = match BackupJob::is_compression_tool_installed(&cfg.compression) {
        Ok(true) => {
            log::info!(target: "cli", "Compression program for {:?} installed", cfg.compression);
            true
        }
        Ok(false) => {
            log::error!(target: "cli", "Compression program for {:?} not installed", cfg.compression);
            false
        }
        Err(e) => {
            log::warn!(target: "cli", "{e}, backups won't be compressed");
            true
        }
    };

    dump_tool && compression
}

fn backup(cfg: &JobConfig, dry_run: bool) -> bool {
    let job = BackupJob::with_config(cfg);

    if dry_run {
        log::warn!(target: "cli", "Running in dry-run mode");
        log::info!(target: "cli", "Would run: {}", job.redacted_command_line());
        return match job.preflight() {
            Ok(()) => true,
            Err(e) => {
                log::error!(target: "cli", "Backup would fail: {e}");
                false
            }
        };
    }

    match job.run() {
        Ok(success) => success,
        Err(e) => {
            log::error!(target: "cli", "Running the dump command failed: {e}");
            false
        }
    }
}
