use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace1, satisfy},
    combinator::{map, not, value},
    multi::separated_list1,
    sequence::terminated,
};

use super::{is_identifier_char, ParserResult, Span};
use crate::ast::{CvQualifier, FunctionFlag, HierarchicalKind, TypeQualifier, Visibility};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    // qualifiers
    Const,
    Volatile,
    Static,
    // function specifiers
    Virtual,
    Inline,
    Explicit,
    Constexpr,
    Override,
    Final,
    Noexcept,
    Default,
    Delete,
    // declarations
    Class,
    Struct,
    Union,
    Enum,
    Typedef,
    Friend,
    Using,
    Template,
    Typename,
    Operator,
    // visibility
    Public,
    Protected,
    Private,
    // primitive types
    Signed,
    Unsigned,
    Short,
    Long,
    Int,
    Char,
    Float,
    Double,
    Void,
    Bool,
}

impl Keyword {
    /// Context-sensitive keywords that remain valid identifiers.
    pub fn is_contextual(self) -> bool {
        matches!(self, Keyword::Override | Keyword::Final)
    }

    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            Keyword::Signed
                | Keyword::Unsigned
                | Keyword::Short
                | Keyword::Long
                | Keyword::Int
                | Keyword::Char
                | Keyword::Float
                | Keyword::Double
                | Keyword::Void
                | Keyword::Bool
        )
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Whether `word` can never be an identifier.
pub fn is_reserved(word: &str) -> bool {
    Keyword::from_str(word).is_ok_and(|kw| !kw.is_contextual())
}

/// Matches `kw` as a whole word; `int` does not match the start of `integer`.
pub fn keyword<'a>(kw: Keyword) -> impl FnMut(Span<'a>) -> ParserResult<'a, Keyword> {
    let word = kw.as_str();
    move |input: Span<'a>| {
        value(kw, terminated(tag(word), not(satisfy(is_identifier_char))))(input)
    }
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn type_qualifier(input: Span) -> ParserResult<TypeQualifier> {
    alt((
        value(TypeQualifier::Static, keyword(Keyword::Static)),
        value(TypeQualifier::Const, keyword(Keyword::Const)),
        value(TypeQualifier::Volatile, keyword(Keyword::Volatile)),
    ))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn cv_qualifier(input: Span) -> ParserResult<CvQualifier> {
    alt((
        value(CvQualifier::Const, keyword(Keyword::Const)),
        value(CvQualifier::Volatile, keyword(Keyword::Volatile)),
    ))(input)
}

/// Leading function specifiers. `explicit` and `constexpr` are accepted but
/// carry no flag.
#[tracing::instrument(level = "debug", skip(input))]
pub fn function_specifier(input: Span) -> ParserResult<Option<FunctionFlag>> {
    alt((
        value(Some(FunctionFlag::Virtual), keyword(Keyword::Virtual)),
        value(Some(FunctionFlag::Inline), keyword(Keyword::Inline)),
        value(None, keyword(Keyword::Explicit)),
        value(None, keyword(Keyword::Constexpr)),
    ))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn visibility(input: Span) -> ParserResult<Visibility> {
    alt((
        value(Visibility::Private, keyword(Keyword::Private)),
        value(Visibility::Public, keyword(Keyword::Public)),
        value(Visibility::Protected, keyword(Keyword::Protected)),
    ))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn hierarchical_kind(input: Span) -> ParserResult<HierarchicalKind> {
    alt((
        value(HierarchicalKind::Class, keyword(Keyword::Class)),
        value(HierarchicalKind::Struct, keyword(Keyword::Struct)),
        value(HierarchicalKind::Union, keyword(Keyword::Union)),
    ))(input)
}

/// `class`, `struct`, `union`, `enum` or `typename` in front of a type name.
#[tracing::instrument(level = "debug", skip(input))]
pub fn elaborated_prefix(input: Span) -> ParserResult<Keyword> {
    alt((
        keyword(Keyword::Class),
        keyword(Keyword::Struct),
        keyword(Keyword::Union),
        keyword(Keyword::Enum),
        keyword(Keyword::Typename),
    ))(input)
}

fn primitive_keyword(input: Span) -> ParserResult<Keyword> {
    alt((
        keyword(Keyword::Signed),
        keyword(Keyword::Unsigned),
        keyword(Keyword::Short),
        keyword(Keyword::Long),
        keyword(Keyword::Int),
        keyword(Keyword::Char),
        keyword(Keyword::Float),
        keyword(Keyword::Double),
        keyword(Keyword::Void),
        keyword(Keyword::Bool),
    ))(input)
}

/// One or more primitive keywords, normalized to single-space separation
/// (`unsigned   long\nint` becomes `"unsigned long int"`).
#[tracing::instrument(level = "debug", skip(input))]
pub fn primitive_type_name(input: Span) -> ParserResult<String> {
    map(
        separated_list1(multispace1, primitive_keyword),
        |keywords| {
            keywords
                .into_iter()
                .map(Keyword::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        },
    )(input)
}
