use std::fmt;

use serde::Serialize;

use crate::tokenizer::Span;

/// 1-based line and column in the text the grammar ran over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: usize,
}

impl Position {
    pub fn new(line: u32, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<Span<'_>> for Position {
    fn from(span: Span<'_>) -> Self {
        Self {
            line: span.location_line(),
            column: span.get_utf8_column(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosticKind {
    /// A body entry the grammar recognized but the AST does not model.
    UnmodeledMember,
    /// A base type entry without a name.
    EmptyBaseName,
    /// A function signature whose name slot came out empty.
    UnnamedFunction,
}

/// Non-fatal finding raised while reducing a match. The node it belongs to
/// is still produced, minus the offending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub position: Position,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(position: Position, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.kind, self.message)
    }
}

/// A reduced node plus the diagnostics raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Built<T> {
    pub node: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Built<T> {
    pub fn clean(node: T) -> Self {
        Self {
            node,
            diagnostics: Vec::new(),
        }
    }

    pub fn into_node(self) -> T {
        self.node
    }
}
