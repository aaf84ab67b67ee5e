//! # Builders
//!
//! Pure reductions from the raw matches produced by [`crate::parser`] into
//! [`crate::ast`] nodes. The grammar owns recognition; everything that
//! decides what a match *means* lives here:
//!
//! * pointer chains fold left to right, so the first `*`/`&` in the source
//!   becomes the innermost wrapper
//! * every specifier a function signature matched is OR-ed into one
//!   [`FunctionFlags`] set
//! * body entries are partitioned into variables and functions, each member
//!   tagged with the visibility label in effect
//!
//! Builders never fail. Partial entries they cannot represent are dropped,
//! logged and reported as a [`Diagnostic`] alongside the node.

use tracing::warn;

use crate::ast::{
    CvQualifier, FunctionDeclaration, FunctionDefinition, FunctionFlag, FunctionFlags,
    HierarchicalKind, HierarchicalTypeDefinition, Inheritance, Member, MemberDeclaration,
    PointerExpression, PointerKind, Type, TypeDefinition, TypeExpression, TypeQualifier,
    TypeQualifiers, VarDeclaration, Visibility,
};
use crate::diagnostic::{Built, Diagnostic, DiagnosticKind, Position};

/// One `*`/`&` level as written, with its trailing qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPointer {
    pub kind: PointerKind,
    pub qualifier: Option<CvQualifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTypeExpression {
    pub leading: Vec<TypeQualifier>,
    pub name: String,
    pub template_arguments: Option<Vec<Type>>,
    /// East-const qualifiers after the name.
    pub trailing: Vec<CvQualifier>,
}

/// Pointer chain and name of one entry in a declaration list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDeclarator {
    pub pointers: Vec<RawPointer>,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawDeclarationList {
    pub base: TypeExpression,
    pub declarators: Vec<RawDeclarator>,
}

/// Which alternative of the function signature rule matched.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFunctionShape {
    /// Return type plus name.
    Named(VarDeclaration),
    /// `~`? plus a bare type: a destructor or a constructor.
    Special {
        destructor: bool,
        owner: TypeExpression,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawFunction {
    pub position: Position,
    /// Leading specifiers; `None` for accepted keywords without a flag.
    pub leading: Vec<Option<FunctionFlag>>,
    pub shape: RawFunctionShape,
    pub parameters: Vec<VarDeclaration>,
    pub trailing: Vec<Option<FunctionFlag>>,
}

/// Body entries the grammar recognizes only to step over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum UnmodeledKind {
    Friend,
    NestedType,
    Enum,
    Typedef,
    Using,
    Template,
    /// `identifier;`
    Identifier,
    /// A statement no other rule recognized.
    Other,
    /// A stray `;`.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawMemberEntry {
    Variables(Vec<VarDeclaration>),
    Function(RawFunction),
    Definition(RawFunction),
    Unmodeled {
        position: Position,
        kind: UnmodeledKind,
        text: String,
    },
}

/// Entries under one visibility label, or before the first label.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub visibility: Visibility,
    pub entries: Vec<RawMemberEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawBase {
    pub position: Position,
    pub visibility: Visibility,
    /// Empty when the list entry carried no type.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawHierarchicalType {
    pub position: Position,
    pub kind: HierarchicalKind,
    pub name: String,
    pub bases: Vec<RawBase>,
    pub sections: Vec<RawSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTypedef {
    pub underlying_type: TypeExpression,
    pub alias_name: String,
}

pub fn build_type_expression(raw: RawTypeExpression) -> TypeExpression {
    let qualifiers: TypeQualifiers = raw
        .leading
        .into_iter()
        .chain(raw.trailing.into_iter().map(TypeQualifier::from))
        .collect();

    TypeExpression::named(raw.name)
        .with_qualifiers(qualifiers)
        .with_template_arguments(raw.template_arguments.unwrap_or_default())
}

/// Wraps `base` once per pointer level, in source order.
pub fn build_pointer_type(base: impl Into<Type>, pointers: &[RawPointer]) -> Type {
    pointers.iter().fold(base.into(), |inner, pointer| {
        PointerExpression::new(inner, pointer.kind, pointer.qualifier).into()
    })
}

pub fn build_var_declaration(base: &TypeExpression, declarator: RawDeclarator) -> VarDeclaration {
    VarDeclaration::new(
        build_pointer_type(base.clone(), &declarator.pointers),
        declarator.identifier,
    )
}

/// One variable per declarator, each with its own pointer chain over the
/// shared base type.
pub fn build_declaration_list(raw: RawDeclarationList) -> Vec<VarDeclaration> {
    let RawDeclarationList { base, declarators } = raw;
    declarators
        .into_iter()
        .map(|declarator| build_var_declaration(&base, declarator))
        .collect()
}

pub fn build_function(raw: RawFunction) -> Built<FunctionDeclaration> {
    let mut flags: FunctionFlags = raw
        .leading
        .iter()
        .chain(raw.trailing.iter())
        .flatten()
        .copied()
        .collect();
    let mut diagnostics = Vec::new();

    let (name, return_type, constructed_type) = match raw.shape {
        RawFunctionShape::Named(declaration) => {
            let name = if declaration.identifier.is_empty() {
                warn!(position = %raw.position, "Function signature without a name");
                diagnostics.push(Diagnostic::new(
                    raw.position,
                    DiagnosticKind::UnnamedFunction,
                    "function signature has no name",
                ));
                None
            } else {
                Some(declaration.identifier)
            };
            (name, Some(declaration.data_type), None)
        }
        RawFunctionShape::Special { destructor, owner } => {
            flags |= FunctionFlag::Constructor;
            if destructor {
                flags |= FunctionFlag::Destructor;
            }
            (None, None, Some(owner))
        }
    };

    Built {
        node: FunctionDeclaration {
            name,
            return_type,
            constructed_type,
            parameters: raw.parameters,
            flags,
        },
        diagnostics,
    }
}

pub fn build_function_definition(raw: RawFunction) -> Built<FunctionDefinition> {
    let Built { node, diagnostics } = build_function(raw);
    Built {
        node: FunctionDefinition::new(node),
        diagnostics,
    }
}

/// `None` for a base entry without a name.
pub fn build_inheritance(raw: RawBase) -> Built<Option<Inheritance>> {
    if raw.name.trim().is_empty() {
        warn!(position = %raw.position, "Dropped base type without a name");
        return Built {
            node: None,
            diagnostics: vec![Diagnostic::new(
                raw.position,
                DiagnosticKind::EmptyBaseName,
                "base type entry has no name",
            )],
        };
    }
    Built::clean(Some(Inheritance::new(raw.name, raw.visibility)))
}

pub fn build_hierarchical_type(raw: RawHierarchicalType) -> Built<HierarchicalTypeDefinition> {
    let mut definition = HierarchicalTypeDefinition::new(raw.kind, raw.name);
    let mut diagnostics = Vec::new();

    for base in raw.bases {
        let built = build_inheritance(base);
        diagnostics.extend(built.diagnostics);
        definition.base_types.extend(built.node);
    }

    for section in raw.sections {
        let visibility = section.visibility;
        for entry in section.entries {
            match entry {
                RawMemberEntry::Variables(variables) => {
                    definition.member_variables.extend(variables.into_iter().map(|variable| {
                        Member::new(MemberDeclaration::Variable(variable), visibility)
                    }));
                }
                RawMemberEntry::Function(function) => {
                    let built = build_function(function);
                    diagnostics.extend(built.diagnostics);
                    definition.member_functions.push(Member::new(
                        MemberDeclaration::Function(built.node),
                        visibility,
                    ));
                }
                RawMemberEntry::Definition(function) => {
                    let built = build_function_definition(function);
                    diagnostics.extend(built.diagnostics);
                    definition.member_functions.push(Member::new(
                        MemberDeclaration::Definition(built.node),
                        visibility,
                    ));
                }
                RawMemberEntry::Unmodeled {
                    kind: UnmodeledKind::Empty,
                    ..
                } => {}
                RawMemberEntry::Unmodeled {
                    position,
                    kind,
                    text,
                } => {
                    warn!(
                        %position,
                        %kind,
                        owner = %definition.name,
                        "Dropped unmodeled member"
                    );
                    diagnostics.push(Diagnostic::new(
                        position,
                        DiagnosticKind::UnmodeledMember,
                        format!(
                            "{} `{}` in `{}` dropped",
                            kind,
                            abbreviate(&text),
                            definition.name
                        ),
                    ));
                }
            }
        }
    }

    Built {
        node: definition,
        diagnostics,
    }
}

pub fn build_typedef(raw: RawTypedef) -> TypeDefinition {
    TypeDefinition {
        underlying_type: raw.underlying_type,
        alias_name: raw.alias_name,
    }
}

/// `text` with whitespace collapsed, cut at 60 characters.
fn abbreviate(text: &str) -> String {
    const LIMIT: usize = 60;
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= LIMIT {
        collapsed
    } else {
        let cut: String = collapsed.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}
