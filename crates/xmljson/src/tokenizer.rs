//! The streaming XML tokenizer.
//!
//! [`Tokenizer`] pulls scalars from the character source and produces the
//! structural tokens the projection folds over: element boundaries, text
//! runs and CDATA sections. Comments, processing instructions and DOCTYPE
//! declarations are recognized and discarded here; entity references in text
//! and quoted attribute values are resolved here as well.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::entities::resolve_entity;
use crate::error::{ParseError, SyntaxError};
use crate::source::CharSource;

/// A structural token.
///
/// Attribute values are raw decoded strings; primitive coercion happens
/// downstream. An attribute written without `= value` carries its own name
/// as its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlToken {
    StartElement {
        name: String,
        attrs: Vec<(String, String)>,
    },
    EmptyElement {
        name: String,
        attrs: Vec<(String, String)>,
    },
    EndElement {
        name: String,
    },
    /// A run of character data with entities resolved and surrounding
    /// whitespace trimmed. Never empty, and never emitted outside an
    /// element.
    Text(String),
    /// A CDATA section body, verbatim. May be empty.
    CData(String),
}

/// The token read inside a tag, between `<` and `>`.
enum TagToken {
    /// A bare name: tag name, attribute name, or unquoted attribute value.
    Name(String),
    /// A quoted attribute value with entities resolved.
    Quoted(String),
    Gt,
    Slash,
    Eq,
    Bang,
    Quest,
}

/// What content scanning found next.
enum Content {
    Text(String),
    Lt,
    Eof,
}

/// A token read inside a `<!` meta construct.
enum MetaToken {
    Lt,
    Gt,
    Other,
}

/// A pull tokenizer over one XML document.
///
/// Iteration order is document order; [`next_token`] returns `Ok(None)` at
/// end of input. Text outside any element is skipped without inspection
/// (only CDATA is surfaced at the top level), matching the projection rules.
///
/// [`next_token`]: Tokenizer::next_token
#[derive(Debug)]
pub struct Tokenizer<'a> {
    src: CharSource<'a>,
    /// Count of elements currently open, as seen by this tokenizer.
    depth: usize,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            src: CharSource::new(input),
            depth: 0,
        }
    }

    /// Builds a positioned error at the current source location.
    pub(crate) fn error(&self, kind: SyntaxError) -> ParseError {
        ParseError::Syntax {
            kind,
            offset: self.src.offset(),
            line: self.src.line(),
            column: self.src.column(),
        }
    }

    fn error_at(&self, kind: SyntaxError, position: (usize, usize, usize)) -> ParseError {
        let (offset, line, column) = position;
        ParseError::Syntax {
            kind,
            offset,
            line,
            column,
        }
    }

    fn position(&self) -> (usize, usize, usize) {
        (self.src.offset(), self.src.line(), self.src.column())
    }

    /// Returns the next structural token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<XmlToken>, ParseError> {
        loop {
            let construct = if self.depth == 0 {
                if !self.skip_to_lt() {
                    return Ok(None);
                }
                self.tag()?
            } else {
                match self.content()? {
                    Content::Eof => return Ok(None),
                    Content::Text(text) => {
                        if text.is_empty() {
                            continue;
                        }
                        return Ok(Some(XmlToken::Text(text)));
                    }
                    Content::Lt => self.tag()?,
                }
            };
            if let Some(token) = construct {
                match &token {
                    XmlToken::StartElement { .. } => self.depth += 1,
                    XmlToken::EndElement { .. } => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                return Ok(Some(token));
            }
        }
    }

    /// Discards input up to and including the next `<`. Returns `false` when
    /// the input ends first.
    fn skip_to_lt(&mut self) -> bool {
        while let Some(c) = self.src.next() {
            if c == '<' {
                return true;
            }
        }
        false
    }

    /// Parses the construct following a consumed `<`. Returns `None` for
    /// comments, processing instructions and meta declarations.
    fn tag(&mut self) -> Result<Option<XmlToken>, ParseError> {
        let c = loop {
            match self.src.next() {
                None => return Err(self.error(SyntaxError::MisshapedMetaTag)),
                Some(c) if c.is_whitespace() => {}
                Some(c) => break c,
            }
        };
        match c {
            '!' => self.bang(),
            '?' => {
                self.skip_past("?>");
                Ok(None)
            }
            '/' => self.close_tag().map(Some),
            '<' => Err(self.error(SyntaxError::MisplacedLt)),
            '>' | '=' | '"' | '\'' | '[' | ']' => Err(self.error(SyntaxError::MisshapedTag)),
            c => self.open_tag(c).map(Some),
        }
    }

    /// Handles `<!`: comments, CDATA sections, and `<`/`>`-balanced meta
    /// declarations such as DOCTYPE.
    fn bang(&mut self) -> Result<Option<XmlToken>, ParseError> {
        match self.src.next() {
            Some('-') => {
                if self.src.peek() == Some('-') {
                    self.src.next();
                    self.skip_past("-->");
                    return Ok(None);
                }
                // Not a comment; the `-` was the first meta scalar.
            }
            Some('[') => {
                for expected in ['C', 'D', 'A', 'T', 'A', '['] {
                    match self.src.next() {
                        Some(c) if c == expected => {}
                        _ => return Err(self.error(SyntaxError::ExpectedCdata)),
                    }
                }
                return self.cdata_body().map(|body| Some(XmlToken::CData(body)));
            }
            // Anything else is the first meta token; it stays consumed.
            Some(_) | None => {}
        }
        let mut balance = 1usize;
        while balance > 0 {
            match self.meta_token()? {
                MetaToken::Lt => balance += 1,
                MetaToken::Gt => balance -= 1,
                MetaToken::Other => {}
            }
        }
        Ok(None)
    }

    /// Accumulates a CDATA body up to the closing `]]>`.
    fn cdata_body(&mut self) -> Result<String, ParseError> {
        let mut body = String::new();
        loop {
            match self.src.next() {
                None => return Err(self.error(SyntaxError::UnclosedCdata)),
                Some(c) => {
                    body.push(c);
                    if body.ends_with("]]>") {
                        body.truncate(body.len() - 3);
                        return Ok(body);
                    }
                }
            }
        }
    }

    /// Parses `</name >` after the consumed `</`. Close-tag names obey the
    /// same rules as open-tag names.
    fn close_tag(&mut self) -> Result<XmlToken, ParseError> {
        let first = loop {
            match self.src.next() {
                None => return Err(self.error(SyntaxError::MisshapedMetaTag)),
                Some(c) if c.is_whitespace() => {}
                Some(c) => break c,
            }
        };
        if first == '<' {
            return Err(self.error(SyntaxError::MisplacedLt));
        }
        let name = self.tag_name(first)?;
        match self.in_tag_token()? {
            TagToken::Gt => Ok(XmlToken::EndElement { name }),
            _ => Err(self.error(SyntaxError::MisshapedCloseTag)),
        }
    }

    /// Parses an open tag from its first name scalar through `>` or `/>`.
    fn open_tag(&mut self, first: char) -> Result<XmlToken, ParseError> {
        let name = self.tag_name(first)?;
        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut pending: Option<TagToken> = None;
        loop {
            let token = match pending.take() {
                Some(token) => token,
                None => self.in_tag_token()?,
            };
            match token {
                TagToken::Name(attr) => match self.in_tag_token()? {
                    TagToken::Eq => match self.in_tag_token()? {
                        TagToken::Quoted(value) | TagToken::Name(value) => {
                            attrs.push((attr, value));
                        }
                        _ => return Err(self.error(SyntaxError::MissingValue)),
                    },
                    other => {
                        // No `=`: the attribute value defaults to its name.
                        let value = attr.clone();
                        attrs.push((attr, value));
                        pending = Some(other);
                    }
                },
                TagToken::Slash => {
                    let slash = self.position();
                    return match self.in_tag_token()? {
                        TagToken::Gt => Ok(XmlToken::EmptyElement { name, attrs }),
                        _ => Err(self.error_at(SyntaxError::MisshapedTag, slash)),
                    };
                }
                TagToken::Gt => return Ok(XmlToken::StartElement { name, attrs }),
                _ => return Err(self.error(SyntaxError::MisshapedTag)),
            }
        }
    }

    /// Scans a tag name whose first scalar is already consumed, validating
    /// the NameStartChar/NameChar rules as it goes.
    fn tag_name(&mut self, first: char) -> Result<String, ParseError> {
        if !(first.is_alphabetic() || first == '_' || first == ':') {
            return Err(self.error(SyntaxError::MisshapedTag));
        }
        let mut name = String::new();
        name.push(first);
        loop {
            match self.src.next() {
                None => return Ok(name),
                Some(c) if c.is_whitespace() => return Ok(name),
                Some(c @ ('>' | '/' | '=' | '!' | '?' | '[' | ']')) => {
                    self.src.back(c);
                    return Ok(name);
                }
                Some('<') => return Err(self.error(SyntaxError::MisplacedLt)),
                Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.') => {
                    name.push(c);
                }
                Some(_) => return Err(self.error(SyntaxError::MisshapedTag)),
            }
        }
    }

    /// Reads one token inside a tag: a punctuation scalar, a quoted string,
    /// or a bare name run.
    fn in_tag_token(&mut self) -> Result<TagToken, ParseError> {
        let c = loop {
            match self.src.next() {
                None => return Err(self.error(SyntaxError::MisshapedMetaTag)),
                Some(c) if c.is_whitespace() => {}
                Some(c) => break c,
            }
        };
        match c {
            '<' => Err(self.error(SyntaxError::MisplacedLt)),
            '>' => Ok(TagToken::Gt),
            '/' => Ok(TagToken::Slash),
            '=' => Ok(TagToken::Eq),
            '!' => Ok(TagToken::Bang),
            '?' => Ok(TagToken::Quest),
            quote @ ('"' | '\'') => {
                let mut value = String::new();
                loop {
                    match self.src.next() {
                        None => return Err(self.error(SyntaxError::UnterminatedString)),
                        Some(c) if c == quote => return Ok(TagToken::Quoted(value)),
                        Some('&') => {
                            let decoded = self.entity()?;
                            value.push_str(&decoded);
                        }
                        Some(c) => value.push(c),
                    }
                }
            }
            c => {
                let mut name = String::new();
                name.push(c);
                loop {
                    match self.src.next() {
                        None => return Ok(TagToken::Name(name)),
                        Some(c) if c.is_whitespace() => return Ok(TagToken::Name(name)),
                        Some(c @ ('>' | '/' | '=' | '!' | '?' | '[' | ']')) => {
                            self.src.back(c);
                            return Ok(TagToken::Name(name));
                        }
                        Some('<') => return Err(self.error(SyntaxError::MisplacedLt)),
                        Some('"' | '\'') => return Err(self.error(SyntaxError::MisshapedTag)),
                        Some(c) => name.push(c),
                    }
                }
            }
        }
    }

    /// Scans element content up to the next `<`, resolving entities and
    /// trimming surrounding whitespace.
    fn content(&mut self) -> Result<Content, ParseError> {
        let mut c = loop {
            match self.src.next() {
                None => return Ok(Content::Eof),
                Some(c) if c.is_whitespace() => {}
                Some(c) => break c,
            }
        };
        if c == '<' {
            return Ok(Content::Lt);
        }
        let mut text = String::new();
        loop {
            match c {
                '<' => {
                    self.src.back('<');
                    break;
                }
                '&' => {
                    let decoded = self.entity()?;
                    text.push_str(&decoded);
                }
                c => text.push(c),
            }
            match self.src.next() {
                None => break,
                Some(next) => c = next,
            }
        }
        let trimmed = text.trim();
        Ok(Content::Text(if trimmed.len() == text.len() {
            text
        } else {
            String::from(trimmed)
        }))
    }

    /// Resolves an entity reference after its consumed `&`. The body folds
    /// to ASCII lowercase before lookup; unknown references come back
    /// verbatim (folded).
    fn entity(&mut self) -> Result<String, ParseError> {
        let mut body = String::new();
        loop {
            match self.src.next() {
                Some(c) if c.is_alphanumeric() || c == '#' => {
                    body.push(c.to_ascii_lowercase());
                }
                Some(';') => break,
                Some(_) | None => {
                    return Err(self.error(SyntaxError::UnterminatedEntity(body)));
                }
            }
        }
        Ok(resolve_entity(&body).unwrap_or_else(|| format!("&{body};")))
    }

    /// Reads one token of a meta declaration: quoted strings and bare runs
    /// collapse to [`MetaToken::Other`]; only `<` and `>` are significant.
    fn meta_token(&mut self) -> Result<MetaToken, ParseError> {
        let c = loop {
            match self.src.next() {
                None => return Err(self.error(SyntaxError::MisshapedMetaTag)),
                Some(c) if c.is_whitespace() => {}
                Some(c) => break c,
            }
        };
        match c {
            '<' => Ok(MetaToken::Lt),
            '>' => Ok(MetaToken::Gt),
            '/' | '=' | '!' | '?' | '[' | ']' => Ok(MetaToken::Other),
            quote @ ('"' | '\'') => loop {
                match self.src.next() {
                    None => return Err(self.error(SyntaxError::UnterminatedString)),
                    Some(c) if c == quote => return Ok(MetaToken::Other),
                    Some(_) => {}
                }
            },
            _ => loop {
                match self.src.next() {
                    None => return Ok(MetaToken::Other),
                    Some(c) if c.is_whitespace() => return Ok(MetaToken::Other),
                    Some(c @ ('<' | '>' | '/' | '=' | '!' | '?' | '"' | '\'')) => {
                        self.src.back(c);
                        return Ok(MetaToken::Other);
                    }
                    Some(_) => {}
                }
            },
        }
    }

    /// Discards input through the next occurrence of `needle`, or to end of
    /// input when it never appears.
    fn skip_past(&mut self, needle: &str) {
        let pattern: Vec<char> = needle.chars().collect();
        let mut window: VecDeque<char> = VecDeque::with_capacity(pattern.len());
        while let Some(c) = self.src.next() {
            if window.len() == pattern.len() {
                window.pop_front();
            }
            window.push_back(c);
            if window.len() == pattern.len() && window.iter().eq(pattern.iter()) {
                return;
            }
        }
    }
}
