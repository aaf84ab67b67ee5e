use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt, value},
    error::context,
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
};
use tracing::instrument;

use crate::ast::{PointerKind, Type, TypeExpression};
use crate::builders::{build_pointer_type, build_type_expression, RawPointer, RawTypeExpression};
use crate::tokenizer::{
    keyword::{cv_qualifier, elaborated_prefix, primitive_type_name, type_qualifier},
    literal::{integer_literal, qualified_name},
    symbol, ws, ParserResult, Span,
};

/// `static const unsigned int`, `std::vector<Foo*>`, `int const`.
#[instrument(level = "debug", skip(input))]
pub fn type_expression(input: Span) -> ParserResult<TypeExpression> {
    context(
        "type expression",
        map(
            tuple((
                many0(ws(type_qualifier)),
                ws(type_name),
                opt(template_arguments),
                many0(ws(cv_qualifier)),
            )),
            |(leading, name, template_arguments, trailing)| {
                build_type_expression(RawTypeExpression {
                    leading,
                    name,
                    template_arguments,
                    trailing,
                })
            },
        ),
    )(input)
}

/// A primitive keyword combination, or a qualified name after an optional
/// `class`/`struct`/`union`/`enum`/`typename` prefix, which is dropped.
#[instrument(level = "debug", skip(input))]
fn type_name(input: Span) -> ParserResult<String> {
    alt((
        primitive_type_name,
        preceded(opt(ws(elaborated_prefix)), qualified_name),
    ))(input)
}

#[instrument(level = "debug", skip(input))]
fn template_arguments(input: Span) -> ParserResult<Vec<Type>> {
    context(
        "template arguments",
        delimited(
            symbol('<'),
            separated_list0(symbol(','), template_argument),
            symbol('>'),
        ),
    )(input)
}

/// A type with its own pointer chain, or a numeric constant (`array<int, 4>`).
#[instrument(level = "debug", skip(input))]
fn template_argument(input: Span) -> ParserResult<Type> {
    alt((
        pointer_type,
        map(ws(integer_literal), |literal| {
            TypeExpression::named(literal).into()
        }),
    ))(input)
}

/// One `*` or `&` with an optional trailing `const`/`volatile`.
#[instrument(level = "debug", skip(input))]
pub fn pointer_level(input: Span) -> ParserResult<RawPointer> {
    map(
        pair(
            ws(alt((
                value(PointerKind::Pointer, char('*')),
                value(PointerKind::Reference, char('&')),
            ))),
            opt(ws(cv_qualifier)),
        ),
        |(kind, qualifier)| RawPointer { kind, qualifier },
    )(input)
}

#[instrument(level = "debug", skip(input))]
pub fn pointer_chain(input: Span) -> ParserResult<Vec<RawPointer>> {
    many0(pointer_level)(input)
}

/// A type expression decorated by its pointer chain.
#[instrument(level = "debug", skip(input))]
pub fn pointer_type(input: Span) -> ParserResult<Type> {
    context(
        "type",
        map(pair(type_expression, pointer_chain), |(base, pointers)| {
            build_pointer_type(base, &pointers)
        }),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CvQualifier, TypeQualifier};

    fn parse(text: &str) -> Type {
        let (rest, ty) = pointer_type(Span::new(text)).unwrap();
        assert!(rest.fragment().is_empty(), "unparsed: {:?}", rest.fragment());
        ty
    }

    #[test]
    fn test_primitive_combination() {
        let ty = parse("static const unsigned  long");
        let base = ty.base();
        assert_eq!(base.name, "unsigned long");
        assert!(base.qualifiers.contains(TypeQualifier::Static));
        assert!(base.qualifiers.contains(TypeQualifier::Const));
    }

    #[test]
    fn test_qualified_template() {
        let ty = parse("std::vector<Foo*>");
        let base = ty.base();
        assert_eq!(base.name, "std::vector");
        assert_eq!(base.template_arguments.len(), 1);
        let argument = &base.template_arguments[0];
        assert!(argument.is_pointer());
        assert_eq!(argument.content_name(), "Foo");
    }

    #[test]
    fn test_nested_templates_close() {
        let ty = parse("std::map<std::string, std::vector<int>>");
        let base = ty.base();
        assert_eq!(base.template_arguments.len(), 2);
        assert_eq!(base.template_arguments[1].base().template_arguments.len(), 1);
    }

    #[test]
    fn test_numeric_template_argument() {
        let ty = parse("std::array<int, 4>");
        assert_eq!(ty.base().template_arguments[1].content_name(), "4");
    }

    #[test]
    fn test_pointer_levels_in_source_order() {
        let ty = parse("char * const * &");
        assert_eq!(ty.depth(), 3);
        let Type::Pointer(outer) = &ty else {
            panic!("expected pointer");
        };
        assert_eq!(outer.kind, PointerKind::Reference);
        let Type::Pointer(middle) = outer.inner.as_ref() else {
            panic!("expected pointer");
        };
        assert_eq!(middle.qualifier, None);
        let Type::Pointer(innermost) = middle.inner.as_ref() else {
            panic!("expected pointer");
        };
        assert_eq!(innermost.qualifier, Some(CvQualifier::Const));
    }

    #[test]
    fn test_elaborated_prefix_dropped() {
        assert_eq!(parse("struct Node*").content_name(), "Node");
        assert_eq!(parse("typename T::value_type").content_name(), "T::value_type");
    }

    #[test]
    fn test_east_const() {
        let ty = parse("int const");
        assert!(ty.base().qualifiers.contains(TypeQualifier::Const));
    }

    #[test]
    fn test_keyword_is_not_a_type() {
        assert!(type_expression(Span::new("public")).is_err());
        assert!(type_expression(Span::new("const")).is_err());
    }
}
