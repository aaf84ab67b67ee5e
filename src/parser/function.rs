use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{map, opt, value, verify},
    error::context,
    multi::{many0, separated_list1},
    sequence::{pair, preceded, terminated, tuple},
};
use nom_locate::position;
use tracing::instrument;

use super::{
    declaration::{parameter_list, var_declaration},
    types::type_expression,
};
use crate::ast::{FunctionFlag, VarDeclaration};
use crate::builders::{RawFunction, RawFunctionShape};
use crate::diagnostic::Position;
use crate::tokenizer::{
    keyword::{function_specifier, keyword, Keyword},
    literal::integer_literal,
    scope::balanced,
    symbol, ws, ParserResult, Span,
};

/// Specifiers after the parameter list. Only `const` and `= 0` carry a
/// flag; `override`, `final`, `noexcept`, `volatile`, `= default` and
/// `= delete` are accepted and dropped.
#[instrument(level = "debug", skip(input))]
fn trailing_specifier(input: Span) -> ParserResult<Option<FunctionFlag>> {
    alt((
        value(Some(FunctionFlag::Const), ws(keyword(Keyword::Const))),
        value(
            Some(FunctionFlag::PureVirtual),
            preceded(
                symbol('='),
                ws(verify(integer_literal, |literal: &String| literal == "0")),
            ),
        ),
        value(
            None,
            preceded(
                symbol('='),
                ws(alt((keyword(Keyword::Default), keyword(Keyword::Delete)))),
            ),
        ),
        value(None, ws(keyword(Keyword::Volatile))),
        value(None, ws(keyword(Keyword::Override))),
        value(None, ws(keyword(Keyword::Final))),
        value(
            None,
            pair(ws(keyword(Keyword::Noexcept)), opt(ws(balanced('(', ')')))),
        ),
    ))(input)
}

/// The two signature shapes, tried in order: a declaration with its own
/// name, then `~`? plus a bare type. A constructor therefore only wins when
/// no separate identifier follows the type.
#[instrument(level = "debug", skip(input))]
fn signature(input: Span) -> ParserResult<(RawFunctionShape, Vec<VarDeclaration>)> {
    alt((
        pair(map(var_declaration, RawFunctionShape::Named), parameter_list),
        pair(
            map(
                pair(opt(symbol('~')), type_expression),
                |(tilde, owner)| RawFunctionShape::Special {
                    destructor: tilde.is_some(),
                    owner,
                },
            ),
            parameter_list,
        ),
    ))(input)
}

/// `virtual void foo(int a) const = 0` without the terminating `;`.
#[instrument(level = "debug", skip(input))]
pub fn function_declaration(input: Span) -> ParserResult<RawFunction> {
    let (input, _) = multispace0(input)?;
    let (input, start) = position(input)?;
    context(
        "function declaration",
        map(
            tuple((
                many0(ws(function_specifier)),
                signature,
                many0(trailing_specifier),
            )),
            move |(leading, (shape, parameters), trailing)| RawFunction {
                position: Position::from(start),
                leading,
                shape,
                parameters,
                trailing,
            },
        ),
    )(input)
}

/// `: base(x), member{y}` after a constructor signature. Discarded.
#[instrument(level = "debug", skip(input))]
fn initializer_list(input: Span) -> ParserResult<()> {
    value(
        (),
        preceded(
            symbol(':'),
            separated_list1(
                symbol(','),
                pair(
                    type_expression,
                    ws(alt((balanced('(', ')'), balanced('{', '}')))),
                ),
            ),
        ),
    )(input)
}

/// A function declaration followed by a body, which is skipped whole.
#[instrument(level = "debug", skip(input))]
pub fn function_definition(input: Span) -> ParserResult<RawFunction> {
    context(
        "function definition",
        map(
            tuple((
                function_declaration,
                opt(initializer_list),
                ws(balanced('{', '}')),
            )),
            |(function, _, _)| function,
        ),
    )(input)
}

/// Function declaration followed by `;`.
#[instrument(level = "debug", skip(input))]
pub fn function_statement(input: Span) -> ParserResult<RawFunction> {
    terminated(function_declaration, ws(char(';')))(input)
}
