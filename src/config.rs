use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{formatter::config::FormatterConfig, InternalResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    #[serde(default)]
    pub formatter: FormatterConfig,

    /// Regex matched against a file name to decide whether it is a source
    /// file.
    #[serde(default = "default_source_pattern")]
    pub source_pattern: String,

    /// Member types the class diagram never draws an edge to.
    #[serde(default = "default_builtin_types")]
    pub builtin_types: Vec<String>,

    /// Name prefixes treated like builtin types (`std::string`).
    #[serde(default = "default_builtin_prefixes")]
    pub builtin_prefixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::default(),
            formatter: FormatterConfig::default(),
            source_pattern: default_source_pattern(),
            builtin_types: default_builtin_types(),
            builtin_prefixes: default_builtin_prefixes(),
        }
    }
}

impl ScanConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }

    pub fn from_str(s: &str) -> InternalResult<Self> {
        from_str(s)
    }

    pub fn is_builtin(&self, type_name: &str) -> bool {
        self.builtin_types.iter().any(|builtin| builtin == type_name)
            || self
                .builtin_prefixes
                .iter()
                .any(|prefix| type_name.starts_with(prefix.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    #[serde(default = "default_true")]
    pub strip_comments: bool,

    /// Lines whose first non-blank character is `#`, with their `\`
    /// continuations.
    #[serde(default = "default_true")]
    pub strip_directives: bool,

    /// Copy string and character literals verbatim so `"// x"` survives.
    #[serde(default = "default_true")]
    pub literal_aware: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            strip_comments: default_true(),
            strip_directives: default_true(),
            literal_aware: default_true(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_source_pattern() -> String {
    r"\.(h|hh|hpp|hxx|c|cc|cpp|cxx)$".to_string()
}

fn default_builtin_types() -> Vec<String> {
    ["int", "float", "double", "long", "char", "bool"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_builtin_prefixes() -> Vec<String> {
    vec!["std::".to_string()]
}
