//! Character-level markup scanner.
//!
//! Markup text is not lexable as script, so elements are scanned byte by
//! byte. Embedded `{...}` expressions are delegated back to the parser's
//! token cursor, which in turn recurses into nested markup.

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;

pub(crate) struct MarkupScanner<'p, 'src> {
    parser: &'p Parser<'src>,
    source: &'src str,
    pos: usize,
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'.' | b':' | b'-')
}

impl<'p, 'src> MarkupScanner<'p, 'src> {
    pub(crate) fn new(parser: &'p Parser<'src>, pos: usize) -> Self {
        Self {
            parser,
            source: parser.source,
            pos,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn found(&self) -> String {
        match self.source[self.pos..].chars().next() {
            Some(c) => c.to_string(),
            None => "end of file".to_string(),
        }
    }

    fn expect_byte(&mut self, byte: u8, expected: &str) -> ParseResult<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(ParseError::unexpected_token(self.pos, expected, self.found())),
            None => Err(ParseError::unexpected_eof(self.pos, expected)),
        }
    }

    /// Skip whitespace and script comments inside a tag
    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                self.pos += 1;
            }
            let rest = &self.source[self.pos..];
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                self.pos += rest[2..].find("*/").map(|i| i + 4).unwrap_or(rest.len());
            } else {
                return;
            }
        }
    }

    fn read_name(&mut self) -> ParseResult<&'src str> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_name_start(b) => {}
            Some(_) => return Err(ParseError::unexpected_token(self.pos, "name", self.found())),
            None => return Err(ParseError::unexpected_eof(self.pos, "name")),
        }
        while self.peek().is_some_and(is_name_char) {
            self.pos += 1;
        }
        Ok(&self.source[start..self.pos])
    }

    /// Parse an element or fragment starting at `<`
    pub(crate) fn parse_node(&mut self) -> ParseResult<Markup> {
        let start = self.pos;
        self.expect_byte(b'<', "<")?;
        self.skip_trivia();

        if self.peek() == Some(b'>') {
            self.pos += 1;
            let opening = self.source[start..self.pos].to_string();
            let (children, closing) = self.parse_children(start, "")?;
            return Ok(Markup::Fragment(Fragment {
                opening,
                children,
                closing,
                span: Some(self.parser.lines.span(start, self.pos)),
            }));
        }

        let name = self.read_name()?;
        let attributes = self.parse_attributes()?;

        let self_closing = self.source[..self.pos].ends_with("/>");
        let opening = self.source[start..self.pos].to_string();

        let (children, closing) = if self_closing {
            (Vec::new(), None)
        } else {
            let (children, closing) = self.parse_children(start, name)?;
            (children, Some(closing))
        };

        Ok(Markup::Element(Element {
            name: ElementName::parse(name),
            attributes,
            children,
            self_closing,
            opening: Some(opening),
            closing,
            span: Some(self.parser.lines.span(start, self.pos)),
        }))
    }

    /// Attributes up to and including `>` or `/>`
    fn parse_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();

        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.pos, "> or />")),
                Some(b'/') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(attributes);
                }
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(attributes);
                }
                Some(b'{') => {
                    let raw = self.read_braced()?;
                    attributes.push(Attribute::Spread { raw });
                }
                Some(b) if is_name_start(b) => {
                    let name = self.read_name()?.to_string();
                    self.skip_trivia();
                    let value = if self.peek() == Some(b'=') {
                        self.pos += 1;
                        self.skip_trivia();
                        Some(self.parse_attribute_value()?)
                    } else {
                        None
                    };
                    attributes.push(Attribute::Named { name, value });
                }
                Some(_) => return Err(ParseError::unexpected_token(self.pos, "attribute", self.found())),
            }
        }
    }

    fn parse_attribute_value(&mut self) -> ParseResult<AttributeValue> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let open = self.pos;
                self.pos += 1;
                let end = self.source[self.pos..]
                    .find(quote as char)
                    .map(|i| self.pos + i)
                    .ok_or_else(|| ParseError::unterminated(open, "attribute string"))?;
                let value = self.source[self.pos..end].to_string();
                self.pos = end + 1;
                Ok(AttributeValue::String {
                    value,
                    quote: quote as char,
                })
            }
            Some(b'{') => Ok(AttributeValue::Expression {
                raw: self.read_braced()?,
            }),
            Some(b'<') => {
                let start = self.pos;
                self.parse_node()?;
                Ok(AttributeValue::Expression {
                    raw: self.source[start..self.pos].to_string(),
                })
            }
            Some(_) => Err(ParseError::unexpected_token(self.pos, "attribute value", self.found())),
            None => Err(ParseError::unexpected_eof(self.pos, "attribute value")),
        }
    }

    fn read_braced(&mut self) -> ParseResult<String> {
        let start = self.pos;
        let end = self.parser.skip_braced(start)?;
        self.pos = end;
        Ok(self.source[start..end].to_string())
    }

    /// Children up to the closing tag for `name` (empty for fragments)
    fn parse_children(&mut self, open: usize, name: &str) -> ParseResult<(Vec<Markup>, String)> {
        let mut children = Vec::new();

        loop {
            let text_start = self.pos;
            while self.peek().is_some_and(|b| b != b'<' && b != b'{') {
                self.pos += 1;
            }
            if self.pos > text_start {
                children.push(Markup::Text(Text {
                    value: self.source[text_start..self.pos].to_string(),
                    span: Some(self.parser.lines.span(text_start, self.pos)),
                }));
            }

            match self.peek() {
                None => {
                    let construct = if name.is_empty() { "fragment" } else { "element" };
                    return Err(ParseError::unterminated(open, construct));
                }
                Some(b'{') => {
                    let start = self.pos;
                    let raw = self.read_braced()?;
                    let span = Some(self.parser.lines.span(start, self.pos));
                    let is_spread = raw[1..].trim_start().starts_with("...");
                    children.push(if is_spread {
                        Markup::Spread(SpreadChild { raw, span })
                    } else {
                        Markup::Expression(ExpressionContainer { raw, span })
                    });
                }
                Some(_) => {
                    let start = self.pos;
                    self.pos += 1;
                    self.skip_trivia();
                    if self.peek() == Some(b'/') {
                        self.pos += 1;
                        self.skip_trivia();
                        let found = if self.peek() == Some(b'>') {
                            ""
                        } else {
                            self.read_name()?
                        };
                        if found != name {
                            return Err(ParseError::MismatchedClosingTag {
                                pos: start,
                                expected: name.to_string(),
                                found: found.to_string(),
                            });
                        }
                        self.skip_trivia();
                        self.expect_byte(b'>', ">")?;
                        return Ok((children, self.source[start..self.pos].to_string()));
                    }
                    self.pos = start;
                    children.push(self.parse_node()?);
                }
            }
        }
    }
}
