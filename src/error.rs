//! Typed errors for the library layer.
//!
//! The CLI wraps these in `anyhow` with extra context; library callers can
//! match on them.

use std::io;

use thiserror::Error;

/// Configuration problems detected when checkers start. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid regular expression in {context}: \"{pattern}\": {message}")]
    InvalidRegex {
        context: String,
        pattern: String,
        message: String,
    },

    #[error("Unknown character set: \"{0}\"")]
    UnknownCharset(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Cannot read {kind} file \"{path}\": {source}")]
    Reference {
        kind: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid parameter string at line {line}: {message}")]
    ParameterString { line: usize, message: String },
}

/// Problems reading a document through a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Cannot read document \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON document \"{path}\": {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid document \"{path}\" at line {line}: {message}")]
    Malformed {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Invalid document \"{path}\": {message}")]
    Invalid { path: String, message: String },

    #[error("Unknown encoding \"{0}\"")]
    UnknownEncoding(String),
}

/// Session persistence and recheck failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid signature: This file is not a QCS file, or is corrupted.")]
    InvalidSignature,

    #[error("Invalid version number ({0}): This file is not supported by this version of the reader.")]
    UnsupportedVersion(i64),

    #[error("String too long to be stored in a single block ({0} bytes).")]
    StringTooLong(usize),

    #[error("Unexpected end of session file.")]
    Truncated,

    #[error("Invalid string data in session file: {0}")]
    InvalidUtf(String),

    #[error("Invalid count in session file: {0}")]
    InvalidCount(i32),

    #[error("No filter registered for configuration \"{0}\"")]
    UnknownFilter(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Failures of the grammar-checking service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Cannot reach the grammar-checking server at {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("The grammar-checking server at {url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from the grammar-checking server at {url}: {source}")]
    Response {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Report generation failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot write report \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot build XML report: {0}")]
    Xml(String),
}
