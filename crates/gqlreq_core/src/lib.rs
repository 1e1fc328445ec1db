//! Core utilities for gqlreq.
//!
//! This crate provides foundational types shared by the parser and the
//! SDK generator:
//! - `span`: Byte ranges into GraphQL source text
//! - `text`: String interning for names
//! - `diagnostics`: Warning and error reporting

pub mod diagnostics;
pub mod span;
pub mod text;

pub use diagnostics::{
    Diagnostic, DiagnosticBag, DiagnosticSeverity, DiagnosticSink, Label, Report,
};
pub use span::Span;
pub use text::{Interner, Text};
