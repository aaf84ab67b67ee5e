use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{map, not, opt, peek, recognize},
    error::context,
    multi::{many0, many1_count, separated_list1},
    sequence::{pair, preceded, terminated, tuple},
};
use nom_locate::position;
use tracing::instrument;

use super::{
    declaration::declaration_list,
    function::{function_definition, function_statement},
    types::type_expression,
};
use crate::ast::{ForwardDeclaration, HierarchicalTypeDefinition, TypeDefinition, Visibility};
use crate::builders::{
    build_hierarchical_type, build_typedef, RawBase, RawHierarchicalType, RawMemberEntry,
    RawSection, RawTypedef, UnmodeledKind,
};
use crate::diagnostic::{Built, Position};
use crate::tokenizer::{
    keyword::{hierarchical_kind, keyword, visibility, Keyword},
    literal::name,
    scope::{balanced, skip_until, statement, statement_piece},
    symbol, ws, ParserResult, Span,
};

/// `public:`, `protected:` or `private:`.
#[instrument(level = "debug", skip(input))]
fn visibility_label(input: Span) -> ParserResult<Visibility> {
    terminated(ws(visibility), symbol(':'))(input)
}

/// Text up to and including the next top-level `;`.
fn to_semicolon(input: Span) -> ParserResult<Span> {
    recognize(pair(skip_until(";"), char(';')))(input)
}

/// A statement that may also end right before a visibility label, for
/// macros such as `Q_OBJECT` that carry no `;` of their own.
fn unlabeled_statement(input: Span) -> ParserResult<Span> {
    recognize(pair(
        many1_count(preceded(not(visibility_label), statement_piece)),
        alt((
            recognize(char(';')),
            balanced('{', '}'),
            recognize(peek(visibility_label)),
        )),
    ))(input)
}

fn tagged<'a>(kind: UnmodeledKind) -> impl FnMut(Span<'a>) -> (UnmodeledKind, Span<'a>) {
    move |text| (kind, text)
}

/// Entries recognized only so the body can be stepped over.
#[instrument(level = "debug", skip(input))]
fn unmodeled_entry(input: Span) -> ParserResult<(UnmodeledKind, Span)> {
    alt((
        map(
            recognize(preceded(
                keyword(Keyword::Friend),
                alt((recognize(function_definition), statement)),
            )),
            tagged(UnmodeledKind::Friend),
        ),
        map(
            recognize(preceded(hierarchical_kind, to_semicolon)),
            tagged(UnmodeledKind::NestedType),
        ),
        map(
            recognize(preceded(keyword(Keyword::Enum), to_semicolon)),
            tagged(UnmodeledKind::Enum),
        ),
        map(
            recognize(preceded(keyword(Keyword::Typedef), to_semicolon)),
            tagged(UnmodeledKind::Typedef),
        ),
        map(
            recognize(preceded(keyword(Keyword::Using), to_semicolon)),
            tagged(UnmodeledKind::Using),
        ),
        map(
            recognize(tuple((
                keyword(Keyword::Template),
                ws(balanced('<', '>')),
                member_entry,
            ))),
            tagged(UnmodeledKind::Template),
        ),
        map(
            recognize(pair(name, symbol(';'))),
            tagged(UnmodeledKind::Identifier),
        ),
        map(recognize(char(';')), tagged(UnmodeledKind::Empty)),
        map(
            preceded(not(visibility_label), unlabeled_statement),
            tagged(UnmodeledKind::Other),
        ),
    ))(input)
}

/// One entry of a type body: a function definition, a function declaration,
/// a variable declaration list, or something stepped over.
#[instrument(level = "debug", skip(input))]
pub fn member_entry(input: Span) -> ParserResult<RawMemberEntry> {
    let (input, _) = multispace0(input)?;
    let (input, start) = position(input)?;
    let (input, entry) = alt((
        map(function_definition, RawMemberEntry::Definition),
        map(function_statement, RawMemberEntry::Function),
        map(
            terminated(declaration_list, symbol(';')),
            RawMemberEntry::Variables,
        ),
        map(unmodeled_entry, |(kind, text)| RawMemberEntry::Unmodeled {
            position: Position::from(start),
            kind,
            text: text.fragment().to_string(),
        }),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, entry))
}

#[instrument(level = "debug", skip(input))]
fn labeled_section(input: Span) -> ParserResult<RawSection> {
    map(
        pair(visibility_label, many0(member_entry)),
        |(visibility, entries)| RawSection {
            visibility,
            entries,
        },
    )(input)
}

/// `[visibility] [virtual] [visibility] type`. Every part is optional so a
/// malformed entry still reaches the builder, which drops it.
#[instrument(level = "debug", skip(input))]
fn base_entry(input: Span) -> ParserResult<RawBase> {
    let (input, _) = multispace0(input)?;
    let (input, start) = position(input)?;
    map(
        tuple((
            opt(ws(visibility)),
            opt(ws(keyword(Keyword::Virtual))),
            opt(ws(visibility)),
            opt(type_expression),
        )),
        move |(before, _, after, base)| RawBase {
            position: Position::from(start),
            visibility: before.or(after).unwrap_or_default(),
            name: base.map(|ty| ty.to_string()).unwrap_or_default(),
        },
    )(input)
}

#[instrument(level = "debug", skip(input))]
fn base_list(input: Span) -> ParserResult<Vec<RawBase>> {
    context(
        "base list",
        preceded(symbol(':'), separated_list1(symbol(','), base_entry)),
    )(input)
}

/// `class|struct|union Name [final] [: bases] { ... }`.
///
/// Entries before the first label form the default section. Any entry that
/// fails to match, or a missing `}`, fails the whole definition.
#[instrument(level = "debug", skip(input))]
pub fn hierarchical_type_definition(
    input: Span,
) -> ParserResult<Built<HierarchicalTypeDefinition>> {
    let (input, _) = multispace0(input)?;
    let (input, start) = position(input)?;
    let (input, kind) = hierarchical_kind(input)?;
    let (input, type_name) = ws(name)(input)?;
    context(
        "type body",
        map(
            tuple((
                opt(ws(keyword(Keyword::Final))),
                opt(base_list),
                symbol('{'),
                many0(member_entry),
                many0(labeled_section),
                char('}'),
            )),
            move |(_, bases, _, default_entries, labeled, _)| {
                let mut sections = vec![RawSection {
                    visibility: Visibility::Default,
                    entries: default_entries,
                }];
                sections.extend(labeled);
                build_hierarchical_type(RawHierarchicalType {
                    position: Position::from(start),
                    kind,
                    name: type_name.clone(),
                    bases: bases.unwrap_or_default(),
                    sections,
                })
            },
        ),
    )(input)
}

/// `class|struct|union Name;`
#[instrument(level = "debug", skip(input))]
pub fn hierarchical_type_declaration(input: Span) -> ParserResult<ForwardDeclaration> {
    context(
        "forward declaration",
        map(
            terminated(pair(ws(hierarchical_kind), ws(name)), char(';')),
            |(kind, name)| ForwardDeclaration { kind, name },
        ),
    )(input)
}

/// `enum class` or `enum struct`, so the search never takes the rest for a
/// class.
pub fn scoped_enum_head(input: Span) -> ParserResult<Span> {
    recognize(pair(keyword(Keyword::Enum), ws(hierarchical_kind)))(input)
}

/// `typedef <type expression> <alias>;`
#[instrument(level = "debug", skip(input))]
pub fn typedef_declaration(input: Span) -> ParserResult<TypeDefinition> {
    context(
        "typedef",
        map(
            terminated(
                preceded(
                    ws(keyword(Keyword::Typedef)),
                    pair(type_expression, ws(name)),
                ),
                char(';'),
            ),
            |(underlying_type, alias_name)| {
                build_typedef(RawTypedef {
                    underlying_type,
                    alias_name,
                })
            },
        ),
    )(input)
}
