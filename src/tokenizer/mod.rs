//! # Lexical Primitives
//!
//! Atomic `nom` matchers shared by the sanitizer and the grammar rules:
//!
//! * [`comment`]: line and block comments
//! * [`keyword`]: reserved words, qualifier and primitive-type keywords
//! * [`literal`]: identifiers, numeric, string and character literals
//! * [`scope`]: balanced-delimiter skipping for un-modeled spans
//!
//! Every matcher works on a [`Span`], a `&str` that carries its offset, line
//! and column, so reductions can report where a construct started.

pub mod comment;
pub mod keyword;
pub mod literal;
pub mod scope;

use nom::{
    character::complete::{char, multispace0},
    error::VerboseError,
    sequence::delimited,
    IResult,
};
use nom_locate::LocatedSpan;

pub type Span<'a> = LocatedSpan<&'a str>;

pub type ParserResult<'a, T> = IResult<Span<'a>, T, VerboseError<Span<'a>>>;

pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skips whitespace around `inner`.
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParserResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParserResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A single punctuation character surrounded by optional whitespace.
pub fn symbol<'a>(c: char) -> impl FnMut(Span<'a>) -> ParserResult<'a, char> {
    ws(char(c))
}
