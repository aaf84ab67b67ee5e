use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{char, multispace1, none_of},
    combinator::{opt, recognize},
    error::context,
    multi::many0_count,
    sequence::{delimited, pair},
};

use super::{
    is_identifier_char,
    literal::{char_literal, string_literal},
    ParserResult, Span,
};

/// `open ... close` with nested pairs of the same delimiters counted.
/// String and character literals inside are skipped whole, so a quoted `}`
/// never closes a body. Fails when the input ends before the matching
/// `close`.
pub fn balanced<'a>(open: char, close: char) -> impl FnMut(Span<'a>) -> ParserResult<'a, Span<'a>> {
    move |input| balanced_scope(open, close, input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn balanced_scope(open: char, close: char, input: Span) -> ParserResult<Span> {
    let plain: String = [open, close, '"', '\''].iter().collect();
    let result = context(
        "balanced scope",
        recognize(delimited(
            char(open),
            many0_count(alt((
                balanced(open, close),
                string_literal,
                char_literal,
                is_not(plain.as_str()),
            ))),
            char(close),
        )),
    )(input);
    result
}

fn is_word_char(c: char) -> bool {
    is_identifier_char(c) || c == ':'
}

/// `<...>` with nested pairs counted. Never crosses `;` or a brace.
fn angle_brackets(input: Span) -> ParserResult<Span> {
    recognize(delimited(
        char('<'),
        many0_count(alt((
            angle_brackets,
            balanced('(', ')'),
            is_not("<>(){};"),
        ))),
        char('>'),
    ))(input)
}

/// A possibly qualified word with the template argument list glued to it:
/// `std::map<int, int>`. A `<` that never closes is left alone.
fn word_with_arguments(input: Span) -> ParserResult<Span> {
    recognize(pair(take_while1(is_word_char), opt(angle_brackets)))(input)
}

/// Skips text up to, not including, the first character of `stops` that is
/// not nested inside `()`, `[]`, `{}` or the `<>` right after a word. An
/// unmatched closing delimiter also ends the skip. May match nothing.
pub fn skip_until<'a>(stops: &'static str) -> impl FnMut(Span<'a>) -> ParserResult<'a, Span<'a>> {
    move |input| skip_until_stop(stops, input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn skip_until_stop<'a>(stops: &str, input: Span<'a>) -> ParserResult<'a, Span<'a>> {
    let result = recognize(many0_count(alt((
        balanced('(', ')'),
        balanced('[', ']'),
        balanced('{', '}'),
        string_literal,
        char_literal,
        word_with_arguments,
        take_while1(|c: char| {
            !is_word_char(c) && !stops.contains(c) && !"()[]{}<\"'".contains(c)
        }),
        recognize(char('<')),
    ))))(input);
    result
}

/// One piece of a statement that may lack its terminator: a `()`/`[]`
/// group, a literal, a word, a whitespace run or any other single
/// character except `;`, braces and unmatched closers.
pub fn statement_piece(input: Span) -> ParserResult<Span> {
    alt((
        balanced('(', ')'),
        balanced('[', ']'),
        string_literal,
        char_literal,
        take_while1(is_identifier_char),
        multispace1,
        recognize(none_of(";{}()[]\"'")),
    ))(input)
}

/// Text up to and including a top-level `;`, or up to and including a `{}`
/// block when one opens first. Fails on `}` or at the end of the input.
#[tracing::instrument(level = "debug", skip(input))]
pub fn statement(input: Span) -> ParserResult<Span> {
    context(
        "statement",
        recognize(pair(
            many0_count(alt((
                balanced('(', ')'),
                balanced('[', ']'),
                string_literal,
                char_literal,
                is_not(";{}()[]\"'"),
            ))),
            alt((recognize(char(';')), balanced('{', '}'))),
        )),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_nested() {
        let input = Span::new("{ if (a) { b(); } else { c(); } } rest");
        let (rest, body) = balanced('{', '}')(input).unwrap();
        assert_eq!(*body.fragment(), "{ if (a) { b(); } else { c(); } }");
        assert_eq!(*rest.fragment(), " rest");
    }

    #[test]
    fn test_balanced_skips_literals() {
        let input = Span::new(r#"{ puts("}"); char c = '{'; }x"#);
        let (rest, _) = balanced('{', '}')(input).unwrap();
        assert_eq!(*rest.fragment(), "x");
    }

    #[test]
    fn test_balanced_empty() {
        let (rest, body) = balanced('(', ')')(Span::new("()const")).unwrap();
        assert_eq!(*body.fragment(), "()");
        assert_eq!(*rest.fragment(), "const");
    }

    #[test]
    fn test_balanced_unterminated() {
        assert!(balanced('{', '}')(Span::new("{ int x; { }")).is_err());
        assert!(balanced('[', ']')(Span::new("[N")).is_err());
    }

    #[test]
    fn test_skip_until() {
        let (rest, skipped) = skip_until(",)")(Span::new("f(1, 2) + a[3], int y)")).unwrap();
        assert_eq!(*skipped.fragment(), "f(1, 2) + a[3]");
        assert_eq!(*rest.fragment(), ", int y)");

        let (rest, skipped) = skip_until(",;")(Span::new("; next")).unwrap();
        assert!(skipped.fragment().is_empty());
        assert_eq!(*rest.fragment(), "; next");
    }

    #[test]
    fn test_skip_until_keeps_template_commas() {
        let (rest, skipped) =
            skip_until(",;")(Span::new("std::map<int, std::vector<int>>(), next;")).unwrap();
        assert_eq!(*skipped.fragment(), "std::map<int, std::vector<int>>()");
        assert_eq!(*rest.fragment(), ", next;");

        let (rest, skipped) = skip_until(",)")(Span::new("a < b, c)")).unwrap();
        assert_eq!(*skipped.fragment(), "a < b");
        assert_eq!(*rest.fragment(), ", c)");

        let (rest, skipped) = skip_until(",;")(Span::new("a<b; std::vector<int> v;")).unwrap();
        assert_eq!(*skipped.fragment(), "a<b");
        assert_eq!(*rest.fragment(), "; std::vector<int> v;");
    }

    #[test]
    fn test_statement_piece() {
        let (rest, piece) = statement_piece(Span::new("Q_OBJECT public:")).unwrap();
        assert_eq!(*piece.fragment(), "Q_OBJECT");
        assert_eq!(*rest.fragment(), " public:");
        assert!(statement_piece(Span::new("}")).is_err());
        assert!(statement_piece(Span::new(";")).is_err());
    }

    #[test]
    fn test_skip_until_stops_at_unmatched_closer() {
        let (rest, _) = skip_until(",;")(Span::new("3 } int y;")).unwrap();
        assert_eq!(*rest.fragment(), "} int y;");
    }

    #[test]
    fn test_statement() {
        let (rest, text) = statement(Span::new("Q_DECLARE(a; b) x; int y;")).unwrap();
        assert_eq!(*text.fragment(), "Q_DECLARE(a; b) x;");
        assert_eq!(*rest.fragment(), " int y;");

        let (rest, text) = statement(Span::new("bool operator==(A a) { return true; } int y;")).unwrap();
        assert_eq!(*text.fragment(), "bool operator==(A a) { return true; }");
        assert_eq!(*rest.fragment(), " int y;");

        assert!(statement(Span::new("}")).is_err());
        assert!(statement(Span::new("no terminator")).is_err());
    }
}
