//! # Declaration AST
//!
//! Immutable value trees produced by the grammar rules in [`crate::parser`]
//! through the reductions in [`crate::builders`]. Nodes never point back at
//! their parents, so sharing a subtree (a base type reused by several pointer
//! wrappers, for instance) is just a clone.
//!
//! ```text
//! HierarchicalTypeDefinition
//! ├── base_types: Vec<Inheritance>
//! ├── member_variables: Vec<Member>   (MemberDeclaration::Variable)
//! └── member_functions: Vec<Member>   (MemberDeclaration::Function | Definition)
//!
//! Type = TypeExpression | PointerExpression(inner: Type)
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{BitOr, BitOrAssign};

use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;

/// A single bit in a [`FlagSet`].
pub trait Flag: Copy + IntoEnumIterator + fmt::Debug + fmt::Display + 'static {
    fn bit(self) -> u8;
}

/// Set of flags combined by bitwise OR.
///
/// Inserting the same flag twice is a no-op, so qualifiers repeated in the
/// source never double count.
pub struct FlagSet<F> {
    bits: u8,
    _flag: PhantomData<F>,
}

impl<F: Flag> FlagSet<F> {
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _flag: PhantomData,
        }
    }

    pub fn contains(&self, flag: F) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: F) {
        self.bits |= flag.bit();
    }

    pub fn with(mut self, flag: F) -> Self {
        self.insert(flag);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates the contained flags in declaration order of `F`.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::iter().filter(move |flag| self.contains(*flag))
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FlagSet<F> {}

impl<F> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F> Eq for FlagSet<F> {}

impl<F> Hash for FlagSet<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: Flag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        Self::empty().with(flag)
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<T: IntoIterator<Item = F>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |set, flag| set.with(flag))
    }
}

impl<F: Flag> BitOr<F> for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: F) -> Self {
        self.with(rhs)
    }
}

impl<F: Flag> BitOr for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
            _flag: PhantomData,
        }
    }
}

impl<F: Flag> BitOrAssign<F> for FlagSet<F> {
    fn bitor_assign(&mut self, rhs: F) {
        self.insert(rhs);
    }
}

impl<F: Flag> Serialize for FlagSet<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|flag| flag.to_string()))
    }
}

macro_rules! flag_enum {
    ($flag:ty) => {
        impl Flag for $flag {
            fn bit(self) -> u8 {
                1 << (self as u8)
            }
        }

        impl BitOr for $flag {
            type Output = FlagSet<$flag>;

            fn bitor(self, rhs: Self) -> FlagSet<$flag> {
                FlagSet::from(self) | rhs
            }
        }
    };
}

/// Qualifier keywords of a type expression.
///
/// Variants are declared in the order the printer emits them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum TypeQualifier {
    Static,
    Const,
    Volatile,
}

flag_enum!(TypeQualifier);

pub type TypeQualifiers = FlagSet<TypeQualifier>;

/// Qualifier trailing a single `*`/`&` level.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CvQualifier {
    Const,
    Volatile,
}

impl From<CvQualifier> for TypeQualifier {
    fn from(qualifier: CvQualifier) -> Self {
        match qualifier {
            CvQualifier::Const => TypeQualifier::Const,
            CvQualifier::Volatile => TypeQualifier::Volatile,
        }
    }
}

/// Semantic shape of a function declaration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum FunctionFlag {
    Const,
    Virtual,
    Constructor,
    Destructor,
    PureVirtual,
    Inline,
}

flag_enum!(FunctionFlag);

pub type FunctionFlags = FlagSet<FunctionFlag>;

/// A type name with qualifiers and template arguments, before any
/// pointer/reference decoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeExpression {
    /// Either a primitive keyword combination (`"unsigned int"`) or a
    /// possibly `::`-qualified identifier.
    pub name: String,
    pub qualifiers: TypeQualifiers,
    /// Empty unless the source carried `<...>`.
    pub template_arguments: Vec<Type>,
}

impl TypeExpression {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifiers: TypeQualifiers::empty(),
            template_arguments: Vec::new(),
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: TypeQualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn with_template_arguments(mut self, arguments: Vec<Type>) -> Self {
        self.template_arguments = arguments;
        self
    }

    pub fn is_template(&self) -> bool {
        !self.template_arguments.is_empty()
    }

    pub fn content_name(&self) -> &str {
        &self.name
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PointerKind {
    Pointer,
    Reference,
}

impl PointerKind {
    pub fn token(self) -> char {
        match self {
            PointerKind::Pointer => '*',
            PointerKind::Reference => '&',
        }
    }
}

/// One `*` or `&` level wrapped around an inner type.
///
/// Chains nest right-associatively: in `int * * const`, the first `*` wraps
/// `int` and the const-qualified second `*` wraps that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PointerExpression {
    pub inner: Box<Type>,
    pub kind: PointerKind,
    pub qualifier: Option<CvQualifier>,
}

impl PointerExpression {
    pub fn new(inner: impl Into<Type>, kind: PointerKind, qualifier: Option<CvQualifier>) -> Self {
        Self {
            inner: Box::new(inner.into()),
            kind,
            qualifier,
        }
    }

    pub fn content_name(&self) -> &str {
        self.inner.content_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Type {
    Expression(TypeExpression),
    Pointer(PointerExpression),
}

impl Type {
    /// Name of the underlying type expression, unwrapping every pointer and
    /// reference level.
    pub fn content_name(&self) -> &str {
        match self {
            Type::Expression(expression) => expression.content_name(),
            Type::Pointer(pointer) => pointer.content_name(),
        }
    }

    /// The type expression at the bottom of the pointer chain.
    pub fn base(&self) -> &TypeExpression {
        match self {
            Type::Expression(expression) => expression,
            Type::Pointer(pointer) => pointer.inner.base(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    /// Number of `*`/`&` levels.
    pub fn depth(&self) -> usize {
        match self {
            Type::Expression(_) => 0,
            Type::Pointer(pointer) => 1 + pointer.inner.depth(),
        }
    }
}

impl From<TypeExpression> for Type {
    fn from(expression: TypeExpression) -> Self {
        Type::Expression(expression)
    }
}

impl From<PointerExpression> for Type {
    fn from(pointer: PointerExpression) -> Self {
        Type::Pointer(pointer)
    }
}

/// `type identifier`. Array suffixes are recognized and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VarDeclaration {
    pub data_type: Type,
    /// Empty for unnamed parameters.
    pub identifier: String,
}

impl VarDeclaration {
    pub fn new(data_type: impl Into<Type>, identifier: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            identifier: identifier.into(),
        }
    }

    pub fn content_name(&self) -> &str {
        self.data_type.content_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionDeclaration {
    /// Absent for constructors and destructors.
    pub name: Option<String>,
    /// Absent for constructors and destructors.
    pub return_type: Option<Type>,
    /// The type named by a constructor or destructor signature.
    pub constructed_type: Option<TypeExpression>,
    pub parameters: Vec<VarDeclaration>,
    pub flags: FunctionFlags,
}

impl FunctionDeclaration {
    pub fn is_const(&self) -> bool {
        self.flags.contains(FunctionFlag::Const)
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.contains(FunctionFlag::Virtual)
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.contains(FunctionFlag::Constructor)
    }

    pub fn is_destructor(&self) -> bool {
        self.flags.contains(FunctionFlag::Destructor)
    }

    pub fn is_pure_virtual(&self) -> bool {
        self.flags.contains(FunctionFlag::PureVirtual)
    }

    pub fn is_inline(&self) -> bool {
        self.flags.contains(FunctionFlag::Inline)
    }

    /// The declared name, or the constructed type's name for constructors
    /// and destructors.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.constructed_type.as_ref().map(|ty| ty.name.as_str()))
    }
}

/// A function declaration followed by a body. The body is never looked into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionDefinition {
    pub declaration: FunctionDeclaration,
}

impl FunctionDefinition {
    pub fn new(declaration: FunctionDeclaration) -> Self {
        Self { declaration }
    }

    pub fn declaration(&self) -> &FunctionDeclaration {
        &self.declaration
    }
}

impl AsRef<FunctionDeclaration> for FunctionDefinition {
    fn as_ref(&self) -> &FunctionDeclaration {
        &self.declaration
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    /// No label was in effect yet.
    #[default]
    Default,
    Private,
    Protected,
    Public,
}

impl Visibility {
    /// Group order used when printing a type body.
    pub const PRINT_ORDER: [Visibility; 4] = [
        Visibility::Default,
        Visibility::Public,
        Visibility::Protected,
        Visibility::Private,
    ];

    /// Source keyword, `None` for [`Visibility::Default`].
    pub fn label(self) -> Option<&'static str> {
        match self {
            Visibility::Default => None,
            Visibility::Private => Some("private"),
            Visibility::Protected => Some("protected"),
            Visibility::Public => Some("public"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberDeclaration {
    Variable(VarDeclaration),
    Function(FunctionDeclaration),
    Definition(FunctionDefinition),
}

impl MemberDeclaration {
    pub fn as_variable(&self) -> Option<&VarDeclaration> {
        match self {
            MemberDeclaration::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// The function signature, for both declarations and definitions.
    pub fn as_function(&self) -> Option<&FunctionDeclaration> {
        match self {
            MemberDeclaration::Variable(_) => None,
            MemberDeclaration::Function(function) => Some(function),
            MemberDeclaration::Definition(definition) => Some(definition.declaration()),
        }
    }

    pub fn is_definition(&self) -> bool {
        matches!(self, MemberDeclaration::Definition(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Member {
    pub declaration: MemberDeclaration,
    pub visibility: Visibility,
}

impl Member {
    pub fn new(declaration: MemberDeclaration, visibility: Visibility) -> Self {
        Self {
            declaration,
            visibility,
        }
    }

    /// Declared identifier of a variable, or the function's display name.
    pub fn identifier(&self) -> Option<&str> {
        match &self.declaration {
            MemberDeclaration::Variable(variable) => Some(variable.identifier.as_str()),
            other => other.as_function().and_then(|f| f.display_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Inheritance {
    pub base_name: String,
    pub visibility: Visibility,
}

impl Inheritance {
    pub fn new(base_name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            base_name: base_name.into(),
            visibility,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HierarchicalKind {
    Class,
    Struct,
    Union,
}

/// A `class`, `struct` or `union` definition.
///
/// Variables and functions are kept in separate sequences, each in source
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HierarchicalTypeDefinition {
    pub kind: HierarchicalKind,
    pub name: String,
    pub base_types: Vec<Inheritance>,
    pub member_variables: Vec<Member>,
    pub member_functions: Vec<Member>,
}

impl HierarchicalTypeDefinition {
    pub fn new(kind: HierarchicalKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            base_types: Vec::new(),
            member_variables: Vec::new(),
            member_functions: Vec::new(),
        }
    }

    pub fn variables_with(&self, visibility: Visibility) -> impl Iterator<Item = &Member> {
        self.member_variables
            .iter()
            .filter(move |member| member.visibility == visibility)
    }

    pub fn functions_with(&self, visibility: Visibility) -> impl Iterator<Item = &Member> {
        self.member_functions
            .iter()
            .filter(move |member| member.visibility == visibility)
    }

    pub fn is_empty(&self) -> bool {
        self.member_variables.is_empty() && self.member_functions.is_empty()
    }
}

/// `class|struct|union <name>;` with no body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ForwardDeclaration {
    pub kind: HierarchicalKind,
    pub name: String,
}

/// `typedef <underlying_type> <alias_name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDefinition {
    pub underlying_type: TypeExpression,
    pub alias_name: String,
}
