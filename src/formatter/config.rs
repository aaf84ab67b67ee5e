use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Prefix of every member line inside a rendered type body.
    #[serde(default = "default_indent")]
    pub indent: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_indent() -> String {
    "\t".to_string()
}
