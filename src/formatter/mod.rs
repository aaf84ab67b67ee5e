//! # Printer
//!
//! Renders AST nodes back to source-like text. Printing then re-parsing a
//! node yields a node equal in every modeled field; original formatting is
//! not preserved.
//!
//! Every node also implements [`std::fmt::Display`] with the default
//! [`FormatterConfig`].

pub mod config;
pub mod visitor;

use std::fmt;

pub use config::FormatterConfig;
pub use visitor::FormatterVisitor;

use crate::ast::{
    ForwardDeclaration, FunctionDeclaration, FunctionDefinition, HierarchicalTypeDefinition,
    Inheritance, Member, MemberDeclaration, PointerExpression, Type, TypeDefinition,
    TypeExpression, VarDeclaration,
};

/// A node the printer knows how to render.
pub trait Render {
    fn render_into(&self, visitor: &mut FormatterVisitor);
}

pub fn render<T: Render + ?Sized>(node: &T) -> String {
    render_with(node, &FormatterConfig::default())
}

pub fn render_with<T: Render + ?Sized>(node: &T, config: &FormatterConfig) -> String {
    let mut visitor = FormatterVisitor::new(config.clone());
    node.render_into(&mut visitor);
    visitor.finish()
}

macro_rules! render_node {
    ($node:ty, $method:ident) => {
        impl Render for $node {
            fn render_into(&self, visitor: &mut FormatterVisitor) {
                visitor.$method(self);
            }
        }

        impl fmt::Display for $node {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&render(self))
            }
        }
    };
}

render_node!(Type, format_type);
render_node!(TypeExpression, format_type_expression);
render_node!(PointerExpression, format_pointer);
render_node!(VarDeclaration, format_var_declaration);
render_node!(FunctionDeclaration, format_function_declaration);
render_node!(MemberDeclaration, format_member_declaration);
render_node!(Inheritance, format_inheritance);
render_node!(HierarchicalTypeDefinition, format_hierarchical_type);
render_node!(ForwardDeclaration, format_forward_declaration);
render_node!(TypeDefinition, format_typedef);

impl Render for FunctionDefinition {
    fn render_into(&self, visitor: &mut FormatterVisitor) {
        visitor.format_function_declaration(self.declaration());
    }
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl Render for Member {
    fn render_into(&self, visitor: &mut FormatterVisitor) {
        visitor.format_member_declaration(&self.declaration);
    }
}
