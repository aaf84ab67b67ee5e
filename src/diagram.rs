//! Graphviz class diagrams.
//!
//! Every class becomes a box, forward-declared ones included. Inheritance
//! draws a hollow-arrow edge to the base type; a member variable draws a
//! plain edge to its type unless the type is builtin. Classes are clustered
//! by file, files by directory.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{config::ScanConfig, driver::ParsedFile};

/// The graph lines for one file, without indentation.
pub fn file_lines(file: &ParsedFile, config: &ScanConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for class in &file.unit.type_definitions {
        if class.name.is_empty() {
            warn!("No class name in {}", file.path.display());
            continue;
        }
        let name = quote(&class.name);
        lines.push(format!("{name} [shape=box];"));

        for base in &class.base_types {
            if base.base_name.is_empty() {
                warn!(
                    "No base class name in {}:{}",
                    file.path.display(),
                    class.name
                );
                continue;
            }
            lines.push(format!(
                "{name} -> {} [arrowhead=onormal];",
                quote(&base.base_name)
            ));
        }

        for member in &class.member_variables {
            let Some(variable) = member.declaration.as_variable() else {
                warn!(
                    "Missing member declaration in {}:{}",
                    file.path.display(),
                    class.name
                );
                continue;
            };
            let type_name = variable.content_name();
            if !config.is_builtin(type_name) {
                lines.push(format!("{name} -> {};", quote(type_name)));
            }
        }
    }
    for declaration in &file.unit.forward_declarations {
        lines.push(format!("{} [shape=box];", quote(&declaration.name)));
    }
    lines
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

fn write_file_cluster(output: &mut String, file: &ParsedFile, config: &ScanConfig) {
    let lines = file_lines(file, config);
    if lines.is_empty() {
        return;
    }
    let label = file
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.push_str(&format!("\tsubgraph {} {{\n", quote(&format!("cluster_{label}"))));
    output.push_str(&format!("\t\tlabel = {};\n", quote(&label)));
    for line in lines {
        output.push_str(&format!("\t\t{line}\n"));
    }
    output.push_str("\t}\n");
}

/// Renders `files` as a `digraph G`.
///
/// When `root` is itself the only file, its cluster sits directly in the
/// graph; otherwise files are grouped under one cluster per directory.
pub fn class_diagram(root: &Path, files: &[ParsedFile], config: &ScanConfig) -> String {
    let mut output = String::from("digraph G {\n");

    if let [file] = files {
        if file.path == root {
            write_file_cluster(&mut output, file, config);
            output.push_str("}\n");
            return output;
        }
    }

    let mut directories: BTreeMap<PathBuf, Vec<&ParsedFile>> = BTreeMap::new();
    for file in files {
        let directory = file.path.parent().unwrap_or(root).to_path_buf();
        directories.entry(directory).or_default().push(file);
    }

    for (directory, files) in directories {
        let label = directory.to_string_lossy();
        debug!("Diagram cluster {} with {} files", label, files.len());
        output.push_str(&format!("\tsubgraph {} {{\n", quote(&format!("cluster_{label}"))));
        output.push_str(&format!("\tlabel = {};\n", quote(&label)));
        for file in files {
            write_file_cluster(&mut output, file, config);
        }
        output.push_str("\t}\n");
    }

    output.push_str("}\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use pretty_assertions::assert_eq;

    fn parsed(path: &str, text: &str) -> ParsedFile {
        ParsedFile {
            path: PathBuf::from(path),
            unit: parse_source(text),
        }
    }

    #[test]
    fn test_file_lines() {
        let file = parsed(
            "src/shape.h",
            "class Circle : public Shape, private Named {
                int radius;
                Point* center;
                std::string label;
                const Style& style;
            };",
        );
        assert_eq!(
            file_lines(&file, &ScanConfig::default()),
            vec![
                "\"Circle\" [shape=box];",
                "\"Circle\" -> \"Shape\" [arrowhead=onormal];",
                "\"Circle\" -> \"Named\" [arrowhead=onormal];",
                "\"Circle\" -> \"Point\";",
                "\"Circle\" -> \"Style\";",
            ]
        );
    }

    #[test]
    fn test_single_file_has_no_directory_cluster() {
        let file = parsed("shape.h", "struct Shape { Point origin; };");
        let dot = class_diagram(Path::new("shape.h"), &[file], &ScanConfig::default());
        assert_eq!(
            dot,
            "digraph G {\n\
             \tsubgraph \"cluster_shape.h\" {\n\
             \t\tlabel = \"shape.h\";\n\
             \t\t\"Shape\" [shape=box];\n\
             \t\t\"Shape\" -> \"Point\";\n\
             \t}\n\
             }\n"
        );
    }

    #[test]
    fn test_directories_cluster_files() {
        let files = [
            parsed("src/a.h", "class A {};"),
            parsed("src/empty.h", "int x;"),
            parsed("src/gui/b.h", "class B : A {};"),
        ];
        let dot = class_diagram(Path::new("src"), &files, &ScanConfig::default());
        assert_eq!(
            dot,
            "digraph G {\n\
             \tsubgraph \"cluster_src\" {\n\
             \tlabel = \"src\";\n\
             \tsubgraph \"cluster_a.h\" {\n\
             \t\tlabel = \"a.h\";\n\
             \t\t\"A\" [shape=box];\n\
             \t}\n\
             \t}\n\
             \tsubgraph \"cluster_src/gui\" {\n\
             \tlabel = \"src/gui\";\n\
             \tsubgraph \"cluster_b.h\" {\n\
             \t\tlabel = \"b.h\";\n\
             \t\t\"B\" [shape=box];\n\
             \t\t\"B\" -> \"A\" [arrowhead=onormal];\n\
             \t}\n\
             \t}\n\
             }\n"
        );
    }

    #[test]
    fn test_forward_declarations_are_boxes() {
        let file = parsed(
            "a.h",
            "class Engine;\nstruct Wheel;\nclass Car { Engine* engine; };\n",
        );
        assert_eq!(
            file_lines(&file, &ScanConfig::default()),
            vec![
                "\"Car\" [shape=box];",
                "\"Car\" -> \"Engine\";",
                "\"Engine\" [shape=box];",
                "\"Wheel\" [shape=box];",
            ]
        );

        let only_declared = parsed("b.h", "class Pending;");
        let dot = class_diagram(Path::new("b.h"), &[only_declared], &ScanConfig::default());
        assert!(dot.contains("\t\t\"Pending\" [shape=box];\n"));
    }

    #[test]
    fn test_builtin_prefixes_are_configurable() {
        let file = parsed("a.h", "class A { QString name; std::string label; };");
        let config = ScanConfig {
            builtin_prefixes: vec!["Q".to_string()],
            ..ScanConfig::default()
        };
        assert_eq!(
            file_lines(&file, &config),
            vec!["\"A\" [shape=box];", "\"A\" -> \"std::string\";"]
        );
    }
}
