//! Error types for configuration tree parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading lines from one configuration file.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A line and its terminator did not fit in the scanner's buffer.
    #[error("line {line} does not fit in {limit} bytes")]
    LineTooLong {
        /// 1-based line number
        line: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Reading from the underlying file failed.
    #[error("read error at line {line}: {source}")]
    Io {
        /// 1-based line number being read
        line: usize,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by [`ConfigParser`](crate::parser::ConfigParser).
///
/// Any error aborts the whole parse; no partial mapping is kept.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The directory tree could not be traversed.
    #[error("cannot walk {path:?}: {source}")]
    Walk {
        /// Path being visited when the walk failed
        path: PathBuf,
        /// Source walk error
        #[source]
        source: walkdir::Error,
    },

    /// A `.conf` file could not be opened.
    #[error("cannot open {path:?}: {source}")]
    FileOpen {
        /// File that failed to open
        path: PathBuf,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// Line scanning failed part way through a file.
    #[error("cannot scan {path:?}: {source}")]
    Scan {
        /// File being scanned
        path: PathBuf,
        /// Source scan error
        #[source]
        source: ScanError,
    },

    /// Parser settings were rejected.
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),

    /// A line pattern failed to compile.
    #[error("line pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<wgtag_common::config::ConfigError> for ParseError {
    fn from(e: wgtag_common::config::ConfigError) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
