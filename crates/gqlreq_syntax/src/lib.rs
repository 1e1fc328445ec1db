//! Syntax layer for gqlreq.
//!
//! Only executable documents (operations and fragments) are understood;
//! schema definitions are out of scope for SDK generation.
//!
//! This crate provides:
//! - `token`: Token kinds and token structures
//! - `lexer`: Tokenization
//! - `ast`: Abstract syntax tree types
//! - `parser`: Recursive descent parser with error recovery
//! - `printer`: Canonical GraphQL printing of operations and fragments
//! - `strings`: Cooked values of string and block string literals

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod strings;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse, ParseResult};
pub use printer::{print_fragment, print_operation, Printer};
pub use strings::{block_string_value, string_value};
pub use token::{Token, TokenKind};
