use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{anychar, char, digit1, multispace0, one_of, satisfy},
    combinator::{map, not, opt, recognize, verify},
    error::context,
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use super::{is_identifier_char, is_identifier_start, keyword::is_reserved, ParserResult, Span};

/// Any identifier-shaped word, reserved or not.
#[tracing::instrument(level = "debug", skip(input))]
pub fn identifier(input: Span) -> ParserResult<Span> {
    context(
        "identifier",
        recognize(pair(
            satisfy(is_identifier_start),
            many0_count(satisfy(is_identifier_char)),
        )),
    )(input)
}

/// An identifier that is not a reserved keyword.
#[tracing::instrument(level = "debug", skip(input))]
pub fn name(input: Span) -> ParserResult<String> {
    context(
        "name",
        map(
            verify(identifier, |word: &Span| !is_reserved(word.fragment())),
            |word| word.fragment().to_string(),
        ),
    )(input)
}

/// A `::`-separated chain of names. A leading `::` is kept.
#[tracing::instrument(level = "debug", skip(input))]
pub fn qualified_name(input: Span) -> ParserResult<String> {
    context(
        "qualified name",
        map(
            tuple((
                opt(tag("::")),
                name,
                many0(preceded(delimited(multispace0, tag("::"), multispace0), name)),
            )),
            |(global, head, tail)| {
                let mut text = String::from(if global.is_some() { "::" } else { "" });
                text.push_str(&head);
                for part in tail {
                    text.push_str("::");
                    text.push_str(&part);
                }
                text
            },
        ),
    )(input)
}

/// Optional sign, decimal digits, optional `L`/`U` suffixes.
#[tracing::instrument(level = "debug", skip(input))]
pub fn integer_literal(input: Span) -> ParserResult<String> {
    context(
        "integer literal",
        map(
            recognize(tuple((
                opt(one_of("+-")),
                digit1,
                many0_count(one_of("uUlL")),
                not(satisfy(is_identifier_char)),
            ))),
            |text: Span| text.fragment().to_string(),
        ),
    )(input)
}

fn escaped_char(input: Span) -> ParserResult<Span> {
    recognize(pair(char('\\'), anychar))(input)
}

/// A double-quoted string literal, escapes included. Stops at a line end
/// when the literal is unterminated.
#[tracing::instrument(level = "debug", skip(input))]
pub fn string_literal(input: Span) -> ParserResult<Span> {
    context(
        "string literal",
        recognize(terminated(
            preceded(
                char('"'),
                many0_count(alt((escaped_char, is_not("\\\"\n")))),
            ),
            opt(char('"')),
        )),
    )(input)
}

/// A single-quoted character literal, escapes included.
#[tracing::instrument(level = "debug", skip(input))]
pub fn char_literal(input: Span) -> ParserResult<Span> {
    context(
        "char literal",
        recognize(terminated(
            preceded(char('\''), many0_count(alt((escaped_char, is_not("\\'\n"))))),
            opt(char('\'')),
        )),
    )(input)
}
