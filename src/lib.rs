//! Periodic, date-named dumps of a MySQL database.
//!
//! A [`BackupJob`](job::BackupJob) runs `mysqldump`, optionally piped through
//! `gzip` or `bzip2`, into `Periodic-database-update.<YYYY-MM-DD>.sql[.gz|.bz2]`.
//! It is meant to be triggered once a day by cron or a systemd timer.

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod job;
