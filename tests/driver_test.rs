mod common;

use std::fs;

use classdecl::{
    config::ScanConfig,
    diagram::class_diagram,
    driver::{collect_source_files, parse_file, parse_files},
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn source_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("model")).unwrap();
    fs::create_dir_all(root.join("view")).unwrap();
    fs::write(
        root.join("model/account.hpp"),
        "#pragma once\n// accounts\nclass Account {\n    Owner* owner;\n    double balance;\n};\n",
    )
    .unwrap();
    fs::write(
        root.join("model/owner.hpp"),
        "struct Owner { std::string name; int age; };\n",
    )
    .unwrap();
    fs::write(
        root.join("view/panel.cc"),
        "class Panel : public Widget {\npublic:\n    void draw() const;\nprivate:\n    Account* account;\n};\n",
    )
    .unwrap();
    fs::write(root.join("view/notes.txt"), "class Ignored {};").unwrap();
    dir
}

#[test]
fn it_parses_a_single_file() {
    let dir = source_tree();
    let parsed = parse_file(&dir.path().join("view/panel.cc"), &ScanConfig::default()).unwrap();
    assert_eq!(parsed.unit.type_definitions.len(), 1);
    let panel = &parsed.unit.type_definitions[0];
    assert_eq!(panel.name, "Panel");
    assert_eq!(panel.member_functions.len(), 1);
    assert_eq!(panel.member_variables.len(), 1);
}

#[test]
fn it_honors_a_configured_source_pattern() {
    let dir = source_tree();
    let config = ScanConfig::from_str(r#"{ "source_pattern": "\\.txt$" }"#).unwrap();
    let files = collect_source_files(dir.path(), &config).unwrap();
    assert_eq!(files, vec![dir.path().join("view/notes.txt")]);
}

#[tokio::test]
async fn it_draws_a_tree() {
    let dir = source_tree();
    let root = dir.path();
    let config = ScanConfig::default();

    let files = collect_source_files(root, &config).unwrap();
    assert_eq!(files.len(), 3);
    let parsed = parse_files(files, &config).await;
    let dot = class_diagram(root, &parsed, &config);

    let model = root.join("model").display().to_string();
    let view = root.join("view").display().to_string();
    let expected = format!(
        "digraph G {{
\tsubgraph \"cluster_{model}\" {{
\tlabel = \"{model}\";
\tsubgraph \"cluster_account.hpp\" {{
\t\tlabel = \"account.hpp\";
\t\t\"Account\" [shape=box];
\t\t\"Account\" -> \"Owner\";
\t}}
\tsubgraph \"cluster_owner.hpp\" {{
\t\tlabel = \"owner.hpp\";
\t\t\"Owner\" [shape=box];
\t}}
\t}}
\tsubgraph \"cluster_{view}\" {{
\tlabel = \"{view}\";
\tsubgraph \"cluster_panel.cc\" {{
\t\tlabel = \"panel.cc\";
\t\t\"Panel\" [shape=box];
\t\t\"Panel\" -> \"Widget\" [arrowhead=onormal];
\t\t\"Panel\" -> \"Account\";
\t}}
\t}}
}}
"
    );
    assert_eq!(dot, expected);
}

#[tokio::test]
async fn it_draws_a_single_file_without_directory_cluster() {
    let dir = source_tree();
    let file = dir.path().join("model/owner.hpp");
    let config = ScanConfig::default();

    let files = collect_source_files(&file, &config).unwrap();
    let parsed = parse_files(files, &config).await;
    assert_eq!(
        class_diagram(&file, &parsed, &config),
        "digraph G {\n\tsubgraph \"cluster_owner.hpp\" {\n\t\tlabel = \"owner.hpp\";\n\t\t\"Owner\" [shape=box];\n\t}\n}\n"
    );
}
