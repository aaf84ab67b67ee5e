//! # classdecl: class declaration extraction for C-family headers
//!
//! classdecl pulls class, struct, union and typedef declarations out of
//! C++-style source text without a compiler front end. It is meant for
//! tools that need type names, member types, inheritance edges and
//! function signatures: class diagrams, dependency graphs, quick audits.
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Preprocessor → Parser (+ Builders) → AST → Formatter / Diagram
//! ```
//!
//! ### Stage 1: Sanitizing
//!
//! The [`preprocessor`] blanks comments and preprocessor directives while
//! keeping line structure, so positions still point into the original
//! file.
//!
//! ### Stage 2: Parsing
//!
//! The [`parser`] module holds the grammar, written with `nom` over the
//! lexical primitives in [`tokenizer`]. Whole-unit search scans sanitized
//! text for every match of a rule; unmatched regions are skipped.
//!
//! ### Stage 3: Building
//!
//! Each matched rule is reduced to an [`ast`] node by the [`builders`].
//! Entries the model cannot hold are dropped and reported as
//! [`diagnostic::Diagnostic`]s.
//!
//! ### Stage 4: Output
//!
//! The [`formatter`] prints nodes back to source-like text. The [`driver`]
//! walks source trees and [`diagram`] renders Graphviz class diagrams.

pub mod ast;
pub mod builders;
pub mod config;
pub mod diagnostic;
pub mod diagram;
pub mod driver;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod preprocessor;
pub mod tokenizer;

// Re-exports
pub use ast::*;
pub use error::*;
pub use formatter::{render, render_with, Render};
pub use parser::{
    find_all_type_definitions, find_all_typedefs, parse_declaration, parse_function,
    parse_function_definition, parse_source, parse_source_with, parse_type,
    parse_type_definition, parse_typedef, ParseError, SourceUnit,
};

/// Blanks comments and directives with the default settings.
pub fn sanitize(text: &str) -> String {
    preprocessor::Sanitizer::default().process(text)
}
