//! # Grammar Engine
//!
//! Mutually recursive `nom` rules over [`Span`]s:
//!
//! * [`types`]: type expressions, template arguments and pointer chains
//! * [`declaration`]: declarators, declaration lists and parameter lists
//! * [`function`]: function declarations and definitions
//! * [`hierarchy`]: class/struct/union bodies, base lists and typedefs
//!
//! A rule either matches and hands its raw match to a builder, or fails
//! locally so an enclosing `alt` can try the next candidate. Two kinds of
//! entry points sit on top:
//!
//! * exact parses ([`parse_type`], [`parse_function`], ...) that must
//!   consume the whole text and report a [`ParseError`] otherwise
//! * whole-unit searches ([`find_all_type_definitions`],
//!   [`find_all_typedefs`], [`parse_source`]) that collect every
//!   non-overlapping match and skip everything else
//!
//! ```
//! use classdecl::{find_all_type_definitions, render};
//!
//! let classes = find_all_type_definitions("class A : public B { public: int x; };");
//! assert_eq!(render(&classes[0]), "class A : public B {\npublic:\n\tint x;\n}");
//! ```

pub mod declaration;
pub mod function;
pub mod hierarchy;
pub mod types;

use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize},
    error::{VerboseError, VerboseErrorKind},
    sequence::{preceded, tuple},
    Slice,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::ast::{
    ForwardDeclaration, FunctionDeclaration, FunctionDefinition, HierarchicalTypeDefinition, Type,
    TypeDefinition, VarDeclaration,
};
use crate::builders::{build_function, build_function_definition};
use crate::config::SanitizerConfig;
use crate::diagnostic::{Built, Diagnostic};
use crate::preprocessor::Sanitizer;
use crate::tokenizer::{is_identifier_char, ParserResult, Span};

/// Why an exact parse rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected: expected {expected} at {line}:{column}, found `{found}`")]
    Unexpected {
        expected: String,
        found: String,
        line: u32,
        column: usize,
    },
    #[error("Unexpected EOF: expected {expected} at {line}:{column}")]
    UnexpectedEof {
        expected: String,
        line: u32,
        column: usize,
    },
    #[error("Trailing input after {parsed} at {line}:{column}: `{found}`")]
    TrailingInput {
        parsed: String,
        found: String,
        line: u32,
        column: usize,
    },
}

impl ParseError {
    /// Reports the innermost failure. `construct` names what was being
    /// parsed when no rule on the failing path carried a context.
    fn from_nom(construct: &str, error: nom::Err<VerboseError<Span>>) -> Self {
        let error = match error {
            nom::Err::Error(error) | nom::Err::Failure(error) => error,
            nom::Err::Incomplete(_) => {
                return ParseError::UnexpectedEof {
                    expected: construct.to_string(),
                    line: 0,
                    column: 0,
                }
            }
        };

        let expected = error
            .errors
            .iter()
            .find_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(context) => Some(*context),
                _ => None,
            })
            .unwrap_or(construct)
            .to_string();

        match error.errors.first() {
            Some((span, _)) if !span.fragment().trim().is_empty() => ParseError::Unexpected {
                expected,
                found: leading_token(span),
                line: span.location_line(),
                column: span.get_utf8_column(),
            },
            Some((span, _)) => ParseError::UnexpectedEof {
                expected,
                line: span.location_line(),
                column: span.get_utf8_column(),
            },
            None => ParseError::UnexpectedEof {
                expected,
                line: 0,
                column: 0,
            },
        }
    }
}

/// The first whitespace-delimited word of `span`, cut at 20 characters.
fn leading_token(span: &Span) -> String {
    span.fragment()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .take(20)
        .collect()
}

/// Optional `;` and surrounding whitespace after an exact parse.
fn terminator(input: Span) -> ParserResult<Span> {
    recognize(tuple((multispace0, opt(char(';')), multispace0)))(input)
}

fn parse_exact<'a, O, F>(construct: &str, text: &'a str, rule: F) -> Result<O, ParseError>
where
    F: FnMut(Span<'a>) -> ParserResult<'a, O>,
{
    let (rest, node) = preceded(multispace0, rule)(Span::new(text))
        .map_err(|error| ParseError::from_nom(construct, error))?;
    let (rest, _) = terminator(rest).map_err(|error| ParseError::from_nom(construct, error))?;

    if rest.fragment().is_empty() {
        Ok(node)
    } else {
        Err(ParseError::TrailingInput {
            parsed: construct.to_string(),
            found: leading_token(&rest),
            line: rest.location_line(),
            column: rest.get_utf8_column(),
        })
    }
}

/// A type expression with its pointer chain: `const char * const`.
pub fn parse_type(text: &str) -> Result<Type, ParseError> {
    parse_exact("type", text, types::pointer_type)
}

/// A declaration list: `int *a, b[3];`.
pub fn parse_declaration(text: &str) -> Result<Vec<VarDeclaration>, ParseError> {
    parse_exact("declaration", text, declaration::declaration_list)
}

/// A function declaration without a body: `virtual void f() const = 0;`.
pub fn parse_function(text: &str) -> Result<FunctionDeclaration, ParseError> {
    parse_exact("function declaration", text, function::function_declaration)
        .map(|raw| build_function(raw).into_node())
}

/// A function declaration followed by its body.
pub fn parse_function_definition(text: &str) -> Result<FunctionDefinition, ParseError> {
    parse_exact("function definition", text, function::function_definition)
        .map(|raw| build_function_definition(raw).into_node())
}

/// A single class, struct or union definition.
pub fn parse_type_definition(text: &str) -> Result<HierarchicalTypeDefinition, ParseError> {
    parse_exact(
        "type definition",
        text,
        hierarchy::hierarchical_type_definition,
    )
    .map(Built::into_node)
}

/// `typedef <type> <alias>;`
pub fn parse_typedef(text: &str) -> Result<TypeDefinition, ParseError> {
    parse_exact("typedef", text, hierarchy::typedef_declaration)
}

/// Every non-overlapping match of `rule` in `source`.
///
/// A match is attempted at each non-blank character that does not continue
/// an identifier. After a match the scan resumes where it ended; after a
/// failure it moves one character on, so a malformed construct never hides
/// the ones after it.
pub fn search_all<'a, O, F>(source: &'a str, mut rule: F) -> Vec<O>
where
    F: FnMut(Span<'a>) -> ParserResult<'a, O>,
{
    let mut found = Vec::new();
    let mut rest = Span::new(source);
    let mut previous: Option<char> = None;

    while let Some(c) = rest.fragment().chars().next() {
        let inside_word = previous.is_some_and(is_identifier_char) && is_identifier_char(c);
        if !inside_word && !c.is_whitespace() {
            if let Ok((next, node)) = rule(rest) {
                if next.location_offset() > rest.location_offset() {
                    found.push(node);
                    previous = source[..next.location_offset()].chars().next_back();
                    rest = next;
                    continue;
                }
            }
        }
        previous = Some(c);
        rest = rest.slice(c.len_utf8()..);
    }

    found
}

/// Every class, struct and union definition in an already sanitized unit.
pub fn find_all_type_definitions(text: &str) -> Vec<HierarchicalTypeDefinition> {
    search_all(text, hierarchy::hierarchical_type_definition)
        .into_iter()
        .map(Built::into_node)
        .collect()
}

/// Every `typedef` in an already sanitized unit.
pub fn find_all_typedefs(text: &str) -> Vec<TypeDefinition> {
    search_all(text, hierarchy::typedef_declaration)
}

/// Everything found in one source unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceUnit {
    pub type_definitions: Vec<HierarchicalTypeDefinition>,
    pub forward_declarations: Vec<ForwardDeclaration>,
    pub typedefs: Vec<TypeDefinition>,
    pub diagnostics: Vec<Diagnostic>,
}

enum TypeEntity {
    Definition(Built<HierarchicalTypeDefinition>),
    Declaration(ForwardDeclaration),
    ScopedEnum,
}

/// A definition, a forward declaration, or an `enum class` head to step
/// over.
fn type_entity(input: Span) -> ParserResult<TypeEntity> {
    alt((
        map(hierarchy::scoped_enum_head, |_| TypeEntity::ScopedEnum),
        map(hierarchy::hierarchical_type_definition, TypeEntity::Definition),
        map(hierarchy::hierarchical_type_declaration, TypeEntity::Declaration),
    ))(input)
}

/// Sanitizes `text` with the default settings, then searches it.
pub fn parse_source(text: &str) -> SourceUnit {
    parse_source_with(text, &SanitizerConfig::default())
}

#[instrument(level = "debug", skip(text, config))]
pub fn parse_source_with(text: &str, config: &SanitizerConfig) -> SourceUnit {
    let sanitized = Sanitizer::new(config.clone()).process(text);

    let mut unit = SourceUnit::default();
    for entity in search_all(&sanitized, type_entity) {
        match entity {
            TypeEntity::Definition(built) => {
                unit.diagnostics.extend(built.diagnostics);
                unit.type_definitions.push(built.node);
            }
            TypeEntity::Declaration(declaration) => unit.forward_declarations.push(declaration),
            TypeEntity::ScopedEnum => {}
        }
    }
    unit.typedefs = find_all_typedefs(&sanitized);

    debug!(
        type_definitions = unit.type_definitions.len(),
        forward_declarations = unit.forward_declarations.len(),
        typedefs = unit.typedefs.len(),
        diagnostics = unit.diagnostics.len(),
        "Searched source unit"
    );
    unit
}
