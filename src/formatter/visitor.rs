use crate::ast::{
    ForwardDeclaration, FunctionDeclaration, HierarchicalTypeDefinition, Inheritance, Member,
    MemberDeclaration, PointerExpression, Type, TypeDefinition, TypeExpression, VarDeclaration,
    Visibility,
};
use crate::formatter::config::FormatterConfig;

/// Walks AST nodes and appends their source form to a buffer.
pub struct FormatterVisitor {
    config: FormatterConfig,
    output: String,
}

impl FormatterVisitor {
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn format_type(&mut self, ty: &Type) {
        match ty {
            Type::Expression(expression) => self.format_type_expression(expression),
            Type::Pointer(pointer) => self.format_pointer(pointer),
        }
    }

    /// `static const volatile name<args>`; qualifiers always in that order.
    pub fn format_type_expression(&mut self, expression: &TypeExpression) {
        for qualifier in expression.qualifiers.iter() {
            self.write(qualifier.into());
            self.write(" ");
        }
        self.write(&expression.name);

        if expression.is_template() {
            self.write("<");
            for (i, argument) in expression.template_arguments.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.format_type(argument);
            }
            self.write(">");
        }
    }

    /// Only the first level is set apart from the base type; later levels
    /// and their qualifiers follow without a gap (`char *const*&`).
    pub fn format_pointer(&mut self, pointer: &PointerExpression) {
        self.format_type(&pointer.inner);
        if let Type::Expression(_) = pointer.inner.as_ref() {
            self.write(" ");
        }
        self.output.push(pointer.kind.token());
        if let Some(qualifier) = pointer.qualifier {
            self.write(qualifier.into());
        }
    }

    pub fn format_var_declaration(&mut self, declaration: &VarDeclaration) {
        self.format_type(&declaration.data_type);
        if !declaration.identifier.is_empty() {
            self.write(" ");
            self.write(&declaration.identifier);
        }
    }

    pub fn format_function_declaration(&mut self, function: &FunctionDeclaration) {
        let mut wrote_word = false;
        let mut separate = |visitor: &mut Self| {
            if wrote_word {
                visitor.write(" ");
            }
            wrote_word = true;
        };

        if function.is_inline() {
            separate(self);
            self.write("inline");
        }
        if function.is_virtual() {
            separate(self);
            self.write("virtual");
        }
        if let Some(return_type) = &function.return_type {
            separate(self);
            self.format_type(return_type);
        } else if let Some(owner) = &function.constructed_type {
            separate(self);
            if function.is_destructor() {
                self.write("~");
            }
            self.format_type_expression(owner);
        }
        if let Some(name) = &function.name {
            separate(self);
            self.write(name);
        }

        self.write("(");
        for (i, parameter) in function.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.format_var_declaration(parameter);
        }
        self.write(")");

        if function.is_const() {
            self.write(" const");
        }
        if function.is_pure_virtual() {
            self.write(" = 0");
        }
    }

    /// Definitions print as their declaration; the body is never kept.
    pub fn format_member_declaration(&mut self, declaration: &MemberDeclaration) {
        match declaration {
            MemberDeclaration::Variable(variable) => self.format_var_declaration(variable),
            MemberDeclaration::Function(function) => self.format_function_declaration(function),
            MemberDeclaration::Definition(definition) => {
                self.format_function_declaration(definition.declaration())
            }
        }
    }

    pub fn format_inheritance(&mut self, inheritance: &Inheritance) {
        if let Some(label) = inheritance.visibility.label() {
            self.write(label);
            self.write(" ");
        }
        self.write(&inheritance.base_name);
    }

    /// Members grouped by visibility (default, public, protected, private),
    /// variables before functions inside each group, one per line.
    pub fn format_hierarchical_type(&mut self, definition: &HierarchicalTypeDefinition) {
        self.write(&definition.kind.to_string());
        self.write(" ");
        self.write(&definition.name);
        self.write(" ");

        if !definition.base_types.is_empty() {
            self.write(": ");
            for (i, base) in definition.base_types.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.format_inheritance(base);
            }
            self.write(" ");
        }

        self.write("{");
        for visibility in Visibility::PRINT_ORDER {
            let members: Vec<&Member> = definition
                .variables_with(visibility)
                .chain(definition.functions_with(visibility))
                .collect();
            if members.is_empty() {
                continue;
            }
            if let Some(label) = visibility.label() {
                self.newline();
                self.write(label);
                self.write(":");
            }
            for member in members {
                self.newline();
                self.indent();
                self.format_member_declaration(&member.declaration);
                self.write(";");
            }
        }
        self.newline();
        self.write("}");
    }

    pub fn format_forward_declaration(&mut self, declaration: &ForwardDeclaration) {
        self.write(&declaration.kind.to_string());
        self.write(" ");
        self.write(&declaration.name);
    }

    pub fn format_typedef(&mut self, typedef: &TypeDefinition) {
        self.write("typedef ");
        self.format_type_expression(&typedef.underlying_type);
        self.write(" ");
        self.write(&typedef.alias_name);
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn indent(&mut self) {
        self.output.push_str(&self.config.indent);
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }
}
