use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, line_ending},
    combinator::recognize,
    multi::many0_count,
    sequence::pair,
    Slice,
};
use tracing::debug;

use crate::config::SanitizerConfig;
use crate::tokenizer::{
    comment::{parse_comment, CommentType},
    literal::{char_literal, string_literal},
    ParserResult, Span,
};

/// Strips comments and preprocessor directives before any grammar rule runs.
///
/// Removed text is replaced by the line breaks it contained, so every line
/// of code stays on its original line number. A block comment without line
/// breaks becomes a single space to keep the tokens around it apart.
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(SanitizerConfig::default())
    }
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn process(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut rest = Span::new(input);
        // only blanks seen since the last line break
        let mut line_start = true;

        while let Some(c) = rest.fragment().chars().next() {
            if self.config.literal_aware {
                if let Ok((next, literal)) = alt((string_literal, char_literal))(rest) {
                    output.push_str(literal.fragment());
                    rest = next;
                    line_start = false;
                    continue;
                }
            }

            if self.config.strip_comments {
                if let Ok((next, comment)) = parse_comment(rest) {
                    match comment.comment_type {
                        CommentType::Block if comment.line_breaks() == 0 => output.push(' '),
                        _ => output.push_str(&"\n".repeat(comment.line_breaks())),
                    }
                    if comment.line_breaks() > 0 {
                        line_start = false;
                    }
                    rest = next;
                    continue;
                }
            }

            if self.config.strip_directives && line_start && c == '#' {
                if let Ok((next, text)) = directive(rest) {
                    debug!(line = rest.location_line(), "Dropped directive");
                    output.push_str(&"\n".repeat(text.fragment().matches('\n').count()));
                    rest = next;
                    continue;
                }
            }

            output.push(c);
            line_start = match c {
                '\n' => true,
                ' ' | '\t' | '\r' => line_start,
                _ => false,
            };
            rest = rest.slice(c.len_utf8()..);
        }

        output
    }
}

/// `#` up to the end of the line, following `\` continuations. The final line
/// break is left in place.
fn directive(input: Span) -> ParserResult<Span> {
    recognize(pair(
        char('#'),
        many0_count(alt((
            recognize(pair(char('\\'), line_ending)),
            is_not("\\\n"),
            tag("\\"),
        ))),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(input: &str) -> String {
        Sanitizer::default().process(input)
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(sanitize("int x; // count\nint y;"), "int x; \nint y;");
    }

    #[test]
    fn test_block_comment_keeps_lines() {
        let output = sanitize("int/*a*/x;\n/* one\ntwo */int y;");
        assert_eq!(output, "int x;\n\nint y;");
    }

    #[test]
    fn test_directives() {
        let input = "#include <vector>\n  #define MAX(a, b) \\\n    ((a) > (b))\nclass A {};";
        assert_eq!(sanitize(input), "\n  \n\nclass A {};");
    }

    #[test]
    fn test_hash_inside_line_is_kept() {
        assert_eq!(sanitize("x = a # b;"), "x = a # b;");
    }

    #[test]
    fn test_literal_awareness() {
        let input = r#"const char* url = "http://x/*y*/"; // tail"#;
        assert_eq!(sanitize(input), r#"const char* url = "http://x/*y*/"; "#);
    }

    #[test]
    fn test_literals_not_protected_when_disabled() {
        let sanitizer = Sanitizer::new(SanitizerConfig {
            literal_aware: false,
            ..SanitizerConfig::default()
        });
        assert_eq!(sanitizer.process(r#"s = "a//b";"#), r#"s = "a"#);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_eq!(sanitize("int x; /* open\nint y;"), "int x; \n");
    }
}
