//! Error types for HPD parsing

use thiserror::Error;

/// Errors decoding a single field value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Flag text was neither `On` nor `Off`
    #[error("invalid on/off flag: {0:?}")]
    InvalidFlag(String),

    /// Alert tone or volume text was neither symbolic nor numeric
    #[error("invalid alert tone setting: {0:?}")]
    InvalidTone(String),

    /// Numeric field could not be parsed
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Service type code or label not present in the service type table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown service type: {0:?}")]
pub struct LookupError(pub String);

/// Structural errors raised while parsing an HPD stream
///
/// Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not start with the tag and indent of the expected record
    #[error("line {line}: text does not match {expected} record")]
    Format { expected: &'static str, line: usize },

    /// Record has fewer fields than its shape requires
    #[error("line {line}: {record} record is missing field `{field}`")]
    MissingField {
        record: &'static str,
        field: &'static str,
        line: usize,
    },

    /// Field value failed to decode
    #[error("line {line}: {source}")]
    Value { line: usize, source: ValueError },

    /// Service type lookup failed
    #[error("line {line}: {source}")]
    Lookup { line: usize, source: LookupError },

    /// Stream ended before the file header was complete
    #[error("missing {0} header line")]
    MissingHeader(&'static str),

    /// Group kind does not match the enclosing system kind
    #[error("line {line}: {group} inside a {system} system")]
    GroupKindMismatch {
        system: &'static str,
        group: &'static str,
        line: usize,
    },
}

/// Top-level error for reading or writing an HPD file
#[derive(Debug, Error)]
pub enum HpdError {
    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
