//! Assembly of the shell command line.
//!
//! Parameters are concatenated as given. Nothing is quoted or escaped, so
//! shell metacharacters in any of them are interpreted by the shell.

use super::Compression;

/// Connection parameters handed to the dump tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<'a> {
    pub host: &'a str,
    pub user: &'a str,
    pub password: &'a str,
    pub database: &'a str,
}

/// Builds `<dump_tool> -h<host> -u<user> -p<password> <database>[ | <program>] > <target>`.
pub fn shell_command(
    dump_tool: &str,
    connection: &Connection<'_>,
    compression: Compression,
    target: &str,
) -> String {
    let dump = dump_invocation(dump_tool, connection);
    match compression.program() {
        Some(program) => format!("{dump} | {program} > {target}"),
        None => format!("{dump} > {target}"),
    }
}

/// Script that runs the same pipeline as [shell_command] but exits with the
/// dump tool's status when the compression stage succeeds.
///
/// A plain `sh` reports only the last stage of a pipeline, and not every
/// `sh` knows `pipefail`. The dump's status is written to fd 3, captured by
/// a command substitution and used as exit status. A failing compression
/// stage or redirection still wins.
pub fn status_preserving_script(
    dump_tool: &str,
    connection: &Connection<'_>,
    compression: Compression,
    target: &str,
) -> String {
    let dump = dump_invocation(dump_tool, connection);
    match compression.program() {
        Some(program) => format!(
            "dump_status=$( {{ {{ {dump}; echo $? >&3; }} | {program} > {target}; }} 3>&1 ) || exit; exit \"$dump_status\""
        ),
        None => format!("{dump} > {target}"),
    }
}

fn dump_invocation(dump_tool: &str, connection: &Connection<'_>) -> String {
    let Connection {
        host,
        user,
        password,
        database,
    } = connection;

    format!("{dump_tool} -h{host} -u{user} -p{password} {database}")
}
