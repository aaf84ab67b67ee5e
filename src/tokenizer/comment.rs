use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::not_line_ending,
    combinator::{map, recognize, rest},
    error::context,
    sequence::{delimited, preceded},
};

use super::{ParserResult, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentType {
    Line,  // //
    Block, // /* */
}

/// A recognized comment; `text` spans the whole comment including its
/// delimiters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comment<'a> {
    pub comment_type: CommentType,
    pub text: Span<'a>,
}

impl Comment<'_> {
    /// Line breaks inside the comment. A line comment never contains one.
    pub fn line_breaks(&self) -> usize {
        self.text.fragment().matches('\n').count()
    }
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_line_comment(input: Span) -> ParserResult<Comment> {
    context(
        "line comment",
        map(recognize(preceded(tag("//"), not_line_ending)), |text| {
            Comment {
                comment_type: CommentType::Line,
                text,
            }
        }),
    )(input)
}

/// An unterminated block comment runs to the end of the input.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_block_comment(input: Span) -> ParserResult<Comment> {
    context(
        "block comment",
        map(
            recognize(alt((
                delimited(tag("/*"), take_until("*/"), tag("*/")),
                preceded(tag("/*"), rest),
            ))),
            |text| Comment {
                comment_type: CommentType::Block,
                text,
            },
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_comment(input: Span) -> ParserResult<Comment> {
    context("comment", alt((parse_block_comment, parse_line_comment)))(input)
}
