mod common;

use classdecl::{
    diagnostic::DiagnosticKind, find_all_type_definitions, find_all_typedefs, parse_declaration,
    parse_function, parse_source, parse_type, parse_type_definition, render, sanitize,
    CvQualifier, FunctionFlag, HierarchicalKind, Inheritance, MemberDeclaration, PointerKind,
    Type, TypeQualifier, Visibility,
};
use pretty_assertions::assert_eq;

const SHAPES_H: &str = r#"#ifndef SHAPES_H
#define SHAPES_H

#include <string>
#include <vector>

namespace geo {

/* Base of every drawable thing. */
class Shape {
public:
    Shape();
    virtual ~Shape();
    virtual double area() const = 0;
    const std::string& name() const { return name_; }

protected:
    std::string name_;   // display name
    static int count;
};

struct Point { double x, y; };

class Polygon : public Shape, private Named {
public:
    explicit Polygon(const std::vector<Point>& points);
    double area() const override;
    inline int size() const { return points_.size(); }
private:
    std::vector<Point> points_;
    Point* origin;
    Style const& style;
};

typedef std::vector<Polygon*> PolygonList;

}  // namespace geo

#endif
"#;

#[test]
fn it_finds_every_class_in_a_header() {
    let unit = parse_source(SHAPES_H);
    let names: Vec<_> = unit
        .type_definitions
        .iter()
        .map(|definition| (definition.kind, definition.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (HierarchicalKind::Class, "Shape"),
            (HierarchicalKind::Struct, "Point"),
            (HierarchicalKind::Class, "Polygon"),
        ]
    );
    assert_eq!(unit.typedefs.len(), 1);
    assert_eq!(unit.typedefs[0].alias_name, "PolygonList");
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
}

#[test]
fn it_classifies_shape_members() {
    let unit = parse_source(SHAPES_H);
    let shape = &unit.type_definitions[0];

    let functions: Vec<_> = shape
        .member_functions
        .iter()
        .map(|member| match &member.declaration {
            MemberDeclaration::Function(f) => (f.display_name(), f.flags, false),
            MemberDeclaration::Definition(d) => {
                (d.declaration.display_name(), d.declaration.flags, true)
            }
            MemberDeclaration::Variable(v) => panic!("variable among functions: {v:?}"),
        })
        .collect();
    assert_eq!(
        functions,
        vec![
            (Some("Shape"), FunctionFlag::Constructor.into(), false),
            (
                Some("Shape"),
                FunctionFlag::Virtual | FunctionFlag::Constructor | FunctionFlag::Destructor,
                false
            ),
            (
                Some("area"),
                FunctionFlag::Virtual | FunctionFlag::Const | FunctionFlag::PureVirtual,
                false
            ),
            (Some("name"), FunctionFlag::Const.into(), true),
        ]
    );
    assert!(shape
        .member_functions
        .iter()
        .all(|member| member.visibility == Visibility::Public));

    let variables: Vec<_> = shape
        .member_variables
        .iter()
        .map(|member| (member.identifier().unwrap_or_default(), member.visibility))
        .collect();
    assert_eq!(
        variables,
        vec![
            ("name_", Visibility::Protected),
            ("count", Visibility::Protected)
        ]
    );
    let count = shape.member_variables[1].declaration.as_variable().unwrap();
    assert!(count
        .data_type
        .base()
        .qualifiers
        .contains(TypeQualifier::Static));
}

#[test]
fn it_reads_inheritance_and_member_types() {
    let unit = parse_source(SHAPES_H);
    let polygon = &unit.type_definitions[2];

    assert_eq!(
        polygon.base_types,
        vec![
            Inheritance::new("Shape", Visibility::Public),
            Inheritance::new("Named", Visibility::Private),
        ]
    );
    let member_types: Vec<_> = polygon
        .member_variables
        .iter()
        .filter_map(|member| member.declaration.as_variable())
        .map(|variable| (variable.identifier.as_str(), variable.content_name()))
        .collect();
    assert_eq!(
        member_types,
        vec![
            ("points_", "std::vector"),
            ("origin", "Point"),
            ("style", "Style"),
        ]
    );
}

#[test]
fn it_renders_a_found_class() {
    let unit = parse_source(SHAPES_H);
    assert_eq!(
        render(&unit.type_definitions[0]),
        "class Shape {
public:
\tShape();
\tvirtual ~Shape();
\tvirtual double area() const = 0;
\tconst std::string & name() const;
protected:
\tstd::string name_;
\tstatic int count;
}"
    );
    assert_eq!(render(&unit.type_definitions[1]), "struct Point {\n\tdouble x;\n\tdouble y;\n}");
}

#[test]
fn it_parses_pointer_to_pointer_const() {
    let variables = parse_declaration("int * * const p;").unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].identifier, "p");

    let Type::Pointer(outer) = &variables[0].data_type else {
        panic!("expected a pointer");
    };
    assert_eq!(outer.kind, PointerKind::Pointer);
    assert_eq!(outer.qualifier, Some(CvQualifier::Const));
    let Type::Pointer(inner) = outer.inner.as_ref() else {
        panic!("expected a nested pointer");
    };
    assert_eq!(inner.qualifier, None);
    assert_eq!(*inner.inner, Type::from(classdecl::TypeExpression::named("int")));
}

#[test]
fn it_parses_pure_virtual_const() {
    let function = parse_function("virtual void foo() const = 0;").unwrap();
    assert_eq!(
        function.flags,
        FunctionFlag::Virtual | FunctionFlag::Const | FunctionFlag::PureVirtual
    );
    assert_eq!(function.name.as_deref(), Some("foo"));
    assert!(!function.is_constructor());
    assert!(!function.is_destructor());
}

#[test]
fn it_places_members_by_label() {
    let definition = parse_type_definition(
        "class A : public B, C { public: int x; void f(); private: int y; };",
    )
    .unwrap();
    assert_eq!(
        definition.base_types,
        vec![
            Inheritance::new("B", Visibility::Public),
            Inheritance::new("C", Visibility::Default),
        ]
    );
    let variables: Vec<_> = definition
        .member_variables
        .iter()
        .map(|member| (member.identifier().unwrap_or_default(), member.visibility))
        .collect();
    assert_eq!(
        variables,
        vec![("x", Visibility::Public), ("y", Visibility::Private)]
    );
    assert_eq!(definition.member_functions[0].identifier(), Some("f"));
    assert_eq!(definition.member_functions[0].visibility, Visibility::Public);
}

#[test]
fn it_keeps_labels_after_a_bare_macro() {
    let definition = parse_type_definition(
        "class Dialog : public QDialog {\n    Q_OBJECT\npublic:\n    explicit Dialog(QWidget* parent);\nprivate:\n    int result;\n};",
    )
    .unwrap();
    assert_eq!(definition.member_functions.len(), 1);
    assert_eq!(definition.member_functions[0].visibility, Visibility::Public);
    assert_eq!(definition.member_variables[0].identifier(), Some("result"));
    assert_eq!(definition.member_variables[0].visibility, Visibility::Private);
}

#[test]
fn it_keeps_members_after_template_initializers() {
    let definition = parse_type_definition(
        "class Cache {
            std::map<int, int> hits = std::map<int, int>();
            int limit;
            void resize(std::pair<int, int> bounds = std::pair<int, int>(1, 2));
        };",
    )
    .unwrap();
    let variables: Vec<_> = definition
        .member_variables
        .iter()
        .filter_map(|member| member.identifier())
        .collect();
    assert_eq!(variables, vec!["hits", "limit"]);
    let MemberDeclaration::Function(resize) = &definition.member_functions[0].declaration else {
        panic!("expected a function declaration");
    };
    assert_eq!(resize.parameters.len(), 1);
    assert_eq!(resize.parameters[0].identifier, "bounds");
}

#[test]
fn it_round_trips_an_empty_class() {
    let definition = parse_type_definition("class Empty {};").unwrap();
    assert!(definition.member_variables.is_empty());
    assert!(definition.member_functions.is_empty());
    assert!(definition.base_types.is_empty());
    assert_eq!(render(&definition), "class Empty {\n}");
}

#[test]
fn it_survives_a_class_missing_its_brace() {
    let text = "class First { int a; };\nclass Broken { int b;\n\nclass Last { int c; };\n";
    let names: Vec<_> = find_all_type_definitions(text)
        .into_iter()
        .map(|definition| definition.name)
        .collect();
    assert_eq!(names, vec!["First", "Last"]);
}

#[test]
fn it_parses_template_pointer_argument() {
    let ty = parse_type("std::vector<Foo*>").unwrap();
    let Type::Expression(expression) = &ty else {
        panic!("expected a bare type expression");
    };
    assert_eq!(expression.name, "std::vector");
    assert_eq!(expression.template_arguments.len(), 1);
    let Type::Pointer(argument) = &expression.template_arguments[0] else {
        panic!("expected a pointer argument");
    };
    assert_eq!(argument.kind, PointerKind::Pointer);
    assert_eq!(argument.inner.content_name(), "Foo");
}

#[test]
fn it_keeps_comment_markers_inside_literals() {
    let text = "class Url { const char* scheme = \"http://\"; int port; };";
    let definitions = find_all_type_definitions(&sanitize(text));
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].member_variables.len(), 2);
}

#[test]
fn it_reports_unmodeled_members() {
    let unit = parse_source(
        "class Node {\n    friend class Tree;\n    enum Color { Red, Black };\n    Node* parent;\n};\n",
    );
    let definition = &unit.type_definitions[0];
    assert_eq!(definition.member_variables.len(), 1);

    let found: Vec<_> = unit
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.position.line))
        .collect();
    assert_eq!(
        found,
        vec![
            (DiagnosticKind::UnmodeledMember, 2),
            (DiagnosticKind::UnmodeledMember, 3),
        ]
    );
}

#[test]
fn it_finds_typedefs_only_of_plain_types() {
    let typedefs = find_all_typedefs(
        "typedef unsigned long Size;\ntypedef Node *NodePtr;\ntypedef std::map<int, Node*> Index;",
    );
    let names: Vec<_> = typedefs
        .iter()
        .map(|typedef| (typedef.alias_name.as_str(), typedef.underlying_type.name.as_str()))
        .collect();
    assert_eq!(names, vec![("Size", "unsigned long"), ("Index", "std::map")]);
}
