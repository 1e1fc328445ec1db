//! Errors raised while generating an SDK.
//!
//! Anonymous operations are not errors: they are reported through a
//! `DiagnosticSink` and skipped. Everything here aborts the whole pass.

use gqlreq_core::DiagnosticBag;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// The input document did not parse.
    #[error("document has {} syntax error(s)", .diagnostics.error_count())]
    Syntax { diagnostics: DiagnosticBag },

    /// The metadata provider could not derive names for an operation.
    #[error("cannot derive metadata for operation `{operation}`: {reason}")]
    Metadata { operation: String, reason: String },

    /// An operation spreads a fragment that is not defined in the document.
    #[error("operation `{operation}` spreads unknown fragment `{fragment}`")]
    UnknownFragment { operation: String, fragment: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T, E = CodegenError> = std::result::Result<T, E>;
