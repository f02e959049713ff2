// Error taxonomy for schema building, parsing, and result access

use crate::value::ValueType;
use thiserror::Error;

/// Result type for schema and parse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a schema, parsing a source, or reading
/// parsed content.
///
/// Schema, TypeMismatch, and SourceAccess are always fatal. The remaining
/// variants only surface when the matching policy is set to `Exception`;
/// under the other policies the occurrence is absorbed, optionally with a
/// diagnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("undefined keyword `{keyword}`: {message}")]
    UndefinedKeyword { keyword: String, message: String },

    #[error("duplicate keyword `{keyword}`: {message}")]
    DuplicateKeyword { keyword: String, message: String },

    #[error("restriction violated for `{keyword}`: {message}")]
    RestrictionViolation { keyword: String, message: String },

    #[error("cannot convert value of `{keyword}`: {message}")]
    KeywordParse { keyword: String, message: String },

    #[error("missing keyword `{keyword}`: {message}")]
    MissingKeyword { keyword: String, message: String },

    #[error("type mismatch for `{keyword}`: requested {requested}, stored {stored}")]
    TypeMismatch {
        keyword: String,
        requested: ValueType,
        stored: ValueType,
    },

    #[error("cannot read `{source_name}`: {reason}")]
    SourceAccess {
        source_name: String,
        #[source]
        reason: std::io::Error,
    },
}
