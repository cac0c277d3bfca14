use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Error};

/// Known compression codes and the program each one pipes through.
pub const COMPRESSION_PROGRAMS: [(&str, &str); 2] = [("gz", "gzip"), ("bz2", "bzip2")];

/// Variant for each entry of [COMPRESSION_PROGRAMS], in the same order.
const COMPRESSED: [Compression; 2] = [Compression::Gzip, Compression::Bzip2];

/// Compression applied to the dump output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compression {
    /// Plain SQL.
    None,
    /// Piped through `gzip`.
    Gzip,
    /// Piped through `bzip2`.
    Bzip2,
}

/// Compression code is not one of [COMPRESSION_PROGRAMS].
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("Compression code is unknown: {_0:?}")]
pub struct UnknownCompressionCode(#[error(ignore)] pub String);

impl Compression {
    /// Lenient lookup used when building a job.
    ///
    /// Unknown codes, the empty string included, mean no compression.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or(Self::None)
    }

    /// Short code, which is also the file extension.
    pub fn code(self) -> Option<&'static str> {
        self.entry().map(|(code, _)| code)
    }

    /// Program the dump is piped through.
    pub fn program(self) -> Option<&'static str> {
        self.entry().map(|(_, program)| program)
    }

    fn entry(self) -> Option<(&'static str, &'static str)> {
        let index = COMPRESSED.iter().position(|&compressed| compressed == self)?;
        Some(COMPRESSION_PROGRAMS[index])
    }
}

impl FromStr for Compression {
    type Err = UnknownCompressionCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMPRESSION_PROGRAMS
            .iter()
            .position(|(code, _)| *code == s)
            .map(|index| COMPRESSED[index])
            .ok_or_else(|| UnknownCompressionCode(s.to_string()))
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program().unwrap_or("none"))
    }
}
