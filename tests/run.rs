//! Runs real jobs with stub dump tools in place of `mysqldump`.

use std::fs::{self, File};
use std::io::Read;

use periodic_dump_lib::config::JobConfig;
use periodic_dump_lib::job::{is_tool_installed, BackupJob, PreflightError};
use regex::Regex;
use tempfile::TempDir;

const DUMP_OUTPUT: &str = "-hlocalhost -uu -pp mydb\n";

fn config(dest: &TempDir, dump_tool: &str, compression: &str) -> JobConfig {
    JobConfig {
        host: "localhost".into(),
        user: "u".into(),
        password: "p".into(),
        database: "mydb".into(),
        destination: format!("{}/", dest.path().display()),
        compression: compression.into(),
        dump_tool: dump_tool.into(),
    }
}

#[test]
fn successful_dump_writes_dated_file() {
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "echo", "none"));

    assert!(job.run().unwrap());

    let name_re = Regex::new(r"^Periodic-database-update\.\d{4}-\d{2}-\d{2}\.sql$").unwrap();
    assert!(name_re.is_match(job.file_name()), "{}", job.file_name());
    let written = fs::read_to_string(dest.path().join(job.file_name())).unwrap();
    assert_eq!(written, DUMP_OUTPUT);
}

#[test]
fn failing_dump_reports_false() {
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "false", "none"));

    assert!(!job.run().unwrap());
}

#[test]
fn missing_destination_reports_false() {
    let dest = tempfile::tempdir().unwrap();
    let mut cfg = config(&dest, "echo", "none");
    cfg.destination = format!("{}/missing/", dest.path().display());

    assert!(!BackupJob::with_config(&cfg).run().unwrap());
}

#[test]
fn second_run_overwrites_and_keeps_file_name() {
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "echo", "none"));
    let file_name = job.file_name().to_string();
    fs::write(job.output_path(), "stale").unwrap();

    assert!(job.run().unwrap());
    assert!(job.run().unwrap());

    assert_eq!(job.file_name(), file_name);
    assert_eq!(fs::read_to_string(job.output_path()).unwrap(), DUMP_OUTPUT);
}

#[test]
fn gzip_output_decompresses_to_dump() {
    if !is_tool_installed("gzip") {
        eprintln!("gzip not installed, skipping");
        return;
    }
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "echo", "gz"));

    assert!(job.run().unwrap());
    assert!(job.file_name().ends_with(".sql.gz"));

    let mut decoder = flate2::read::GzDecoder::new(File::open(job.output_path()).unwrap());
    let mut dump = String::new();
    decoder.read_to_string(&mut dump).unwrap();
    assert_eq!(dump, DUMP_OUTPUT);
}

#[test]
fn bzip2_output_decompresses_to_dump() {
    if !is_tool_installed("bzip2") {
        eprintln!("bzip2 not installed, skipping");
        return;
    }
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "echo", "bz2"));

    assert!(job.run().unwrap());
    assert!(job.file_name().ends_with(".sql.bz2"));

    let mut decoder = bzip2::read::BzDecoder::new(File::open(job.output_path()).unwrap());
    let mut dump = String::new();
    decoder.read_to_string(&mut dump).unwrap();
    assert_eq!(dump, DUMP_OUTPUT);
}

#[test]
fn failing_dump_behind_compression_reports_false() {
    for (code, program) in [("gz", "gzip"), ("bz2", "bzip2")] {
        if !is_tool_installed(program) {
            eprintln!("{program} not installed, skipping");
            continue;
        }
        let dest = tempfile::tempdir().unwrap();
        let job = BackupJob::with_config(&config(&dest, "false", code));

        assert!(!job.run().unwrap(), "failing dump piped through {program}");
        assert!(job.command_line().starts_with("false -hlocalhost"));
    }
}

#[test]
fn failing_compression_reports_false() {
    let dest = tempfile::tempdir().unwrap();
    let mut cfg = config(&dest, "echo", "gz");
    cfg.destination = format!("{}/missing/", dest.path().display());

    assert!(!BackupJob::with_config(&cfg).run().unwrap());
}

#[test]
fn probes_report_search_path() {
    assert!(is_tool_installed("sh"));
    assert!(!is_tool_installed("periodic-dump-no-such-tool"));
    assert_eq!(
        BackupJob::is_dump_tool_installed(),
        is_tool_installed("mysqldump")
    );
    assert_eq!(
        BackupJob::is_compression_tool_installed("gz").unwrap(),
        is_tool_installed("gzip")
    );
    assert!(BackupJob::is_compression_tool_installed("7z").is_err());
}

#[test]
fn preflight_accepts_writable_destination() {
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "echo", "none"));

    job.preflight().unwrap();
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[test]
fn preflight_reports_missing_dump_tool() {
    let dest = tempfile::tempdir().unwrap();
    let job = BackupJob::with_config(&config(&dest, "periodic-dump-no-such-tool", "none"));

    let err = job.preflight().unwrap_err();
    assert!(matches!(err, PreflightError::DumpToolMissing(_)));
}

#[test]
fn preflight_reports_missing_destination() {
    let dest = tempfile::tempdir().unwrap();
    let mut cfg = config(&dest, "echo", "none");
    cfg.destination = format!("{}/missing/", dest.path().display());

    let err = BackupJob::with_config(&cfg).preflight().unwrap_err();
    assert!(matches!(
        err,
        PreflightError::DestinationNotWritable { .. }
    ));
}
