//! Parse failures, with the position they occurred at.

use alloc::string::String;

use thiserror::Error;

/// What went wrong, without position information.
///
/// The `Display` text of each variant is the stable message prefix; the
/// enclosing [`ParseError`] appends the position suffix.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Misshaped tag")]
    MisshapedTag,
    #[error("Misshaped meta tag")]
    MisshapedMetaTag,
    #[error("Misshaped close tag")]
    MisshapedCloseTag,
    #[error("Misplaced '<'")]
    MisplacedLt,
    #[error("Expected 'CDATA['")]
    ExpectedCdata,
    #[error("Unclosed CDATA")]
    UnclosedCdata,
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Missing value")]
    MissingValue,
    #[error("Missing ';' in XML entity: &{0}")]
    UnterminatedEntity(String),
    #[error("Mismatched close tag {0}")]
    MismatchedCloseTag(String),
    #[error("Mismatched {open} and {close}")]
    MismatchedTags { open: String, close: String },
    #[error("Unclosed tag {0}")]
    UnclosedTag(String),
}

/// An error raised while parsing XML.
///
/// Syntax errors carry the scalar offset (count of scalars consumed), the
/// 1-based line and the 1-based column of the offending scalar, rendered as
/// `<message> at <offset> [character <column> line <line>]`. The nesting
/// bound renders without a position.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{kind} at {offset} [character {column} line {line}]")]
    Syntax {
        kind: SyntaxError,
        offset: usize,
        line: usize,
        column: usize,
    },
    #[error("Maximum nesting depth of {0} reached")]
    DepthExceeded(usize),
}

impl ParseError {
    /// Returns the syntax-error kind, if this is a positioned syntax error.
    #[must_use]
    pub fn kind(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax { kind, .. } => Some(kind),
            Self::DepthExceeded(_) => None,
        }
    }
}
