use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt, peek, value},
    error::context,
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
};
use tracing::instrument;

use super::types::{pointer_chain, type_expression};
use crate::ast::VarDeclaration;
use crate::builders::{
    build_declaration_list, build_var_declaration, RawDeclarationList, RawDeclarator,
};
use crate::tokenizer::{
    keyword::{keyword, Keyword},
    literal::{integer_literal, name},
    scope::{balanced, skip_until},
    symbol, ws, ParserResult, Span,
};

/// `[N]` suffixes, recognized and discarded.
fn array_suffixes(input: Span) -> ParserResult<()> {
    value((), many0(ws(balanced('[', ']'))))(input)
}

/// Pointer chain, name and array suffixes of one declared entity.
#[instrument(level = "debug", skip(input))]
pub fn declarator(input: Span) -> ParserResult<RawDeclarator> {
    map(
        terminated(pair(pointer_chain, ws(name)), array_suffixes),
        |(pointers, identifier)| RawDeclarator {
            pointers,
            identifier,
        },
    )(input)
}

/// `= expr`, `{...}` or a bit-field width. Never modeled.
#[instrument(level = "debug", skip(input))]
fn initializer(input: Span) -> ParserResult<()> {
    alt((
        value((), preceded(symbol('='), skip_until(",;"))),
        value((), ws(balanced('{', '}'))),
        value((), preceded(symbol(':'), ws(integer_literal))),
    ))(input)
}

/// `type declarator`, the single-entity form used for function signatures.
#[instrument(level = "debug", skip(input))]
pub fn var_declaration(input: Span) -> ParserResult<VarDeclaration> {
    context(
        "variable declaration",
        map(pair(type_expression, declarator), |(base, declarator)| {
            build_var_declaration(&base, declarator)
        }),
    )(input)
}

/// `int *a, b[4] = {}, c;` without the terminating `;`.
#[instrument(level = "debug", skip(input))]
pub fn declaration_list(input: Span) -> ParserResult<Vec<VarDeclaration>> {
    context(
        "declaration",
        map(
            pair(
                type_expression,
                separated_list1(symbol(','), terminated(declarator, opt(initializer))),
            ),
            |(base, declarators)| build_declaration_list(RawDeclarationList { base, declarators }),
        ),
    )(input)
}

/// A parameter; the name is optional and a default argument is skipped.
#[instrument(level = "debug", skip(input))]
pub fn parameter(input: Span) -> ParserResult<VarDeclaration> {
    map(
        tuple((
            type_expression,
            pointer_chain,
            opt(ws(name)),
            array_suffixes,
            opt(preceded(symbol('='), skip_until(",)"))),
        )),
        |(base, pointers, identifier, _, _)| {
            build_var_declaration(
                &base,
                RawDeclarator {
                    pointers,
                    identifier: identifier.unwrap_or_default(),
                },
            )
        },
    )(input)
}

/// `( ... )`. A lone `void` means no parameters.
#[instrument(level = "debug", skip(input))]
pub fn parameter_list(input: Span) -> ParserResult<Vec<VarDeclaration>> {
    context(
        "parameter list",
        delimited(
            symbol('('),
            alt((
                value(
                    Vec::new(),
                    terminated(ws(keyword(Keyword::Void)), peek(char(')'))),
                ),
                separated_list0(symbol(','), parameter),
            )),
            symbol(')'),
        ),
    )(input)
}
