//! Script-level lexer using logos
//!
//! Only the tokens needed to split statements, track nesting and find
//! markup are distinguished; everything else is `Punct`. Markup itself is
//! scanned character by character in `markup.rs`.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f\u{feff}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // Keywords
    #[token("import")]
    Import,

    #[token("export")]
    Export,

    #[token("default")]
    Default,

    #[token("function")]
    Function,

    #[token("const")]
    Const,

    #[token("let")]
    Let,

    #[token("var")]
    Var,

    #[token("return")]
    Return,

    #[token("async")]
    Async,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    String,

    #[regex(r"`([^`\\]|\\.)*`")]
    Template,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]+)?([eE][+-]?[0-9]+)?n?")]
    Number,

    // Symbols
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token("=>")]
    Arrow,

    #[token("=")]
    Eq,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("??")]
    Nullish,

    #[token("!")]
    Bang,

    #[token("...")]
    Ellipsis,

    #[regex(r"[.+\-*/%^~|&@#]")]
    Punct,
}

impl Token {
    /// Whether a `<` following this token starts markup rather than a comparison
    pub fn precedes_expression(self) -> bool {
        matches!(
            self,
            Token::LParen
                | Token::LBracket
                | Token::LBrace
                | Token::Comma
                | Token::Eq
                | Token::Colon
                | Token::Question
                | Token::AndAnd
                | Token::OrOr
                | Token::Nullish
                | Token::Bang
                | Token::Arrow
                | Token::Return
                | Token::Default
                | Token::Semicolon
                | Token::RBrace
        )
    }

    /// Keywords that start a new top-level statement
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Token::Import
                | Token::Export
                | Token::Function
                | Token::Const
                | Token::Let
                | Token::Var
                | Token::Async
        )
    }
}

pub type SpannedToken = (Token, Range<usize>);

/// Lazy token stream over a source that can be restarted at any byte offset.
///
/// The parser restarts the stream after skipping markup, since JSX text is
/// not lexable as script.
pub struct Cursor<'src> {
    source: &'src str,
    lexer: logos::Lexer<'src, Token>,
    base: usize,
    peeked: Option<SpannedToken>,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str, offset: usize) -> Self {
        Self {
            source,
            lexer: Token::lexer(&source[offset..]),
            base: offset,
            peeked: None,
        }
    }

    /// Continue lexing from `offset`, discarding any peeked token
    pub fn restart(&mut self, offset: usize) {
        self.lexer = Token::lexer(&self.source[offset..]);
        self.base = offset;
        self.peeked = None;
    }

    pub fn next_token(&mut self) -> Option<SpannedToken> {
        if let Some(token) = self.peeked.take() {
            return Some(token);
        }
        let result = self.lexer.next()?;
        let span = self.lexer.span();
        Some((
            result.unwrap_or(Token::Punct),
            span.start + self.base..span.end + self.base,
        ))
    }

    pub fn peek(&mut self) -> Option<&SpannedToken> {
        if self.peeked.is_none() {
            self.peeked = self.next_token();
        }
        self.peeked.as_ref()
    }

    pub fn source(&self) -> &'src str {
        self.source
    }
}

/// Tokenize a source slice, offsetting spans by `base`.
///
/// Characters the lexer does not recognize are reported as `Punct`.
pub fn tokenize_from(source: &str, base: usize) -> Vec<SpannedToken> {
    let mut cursor = Cursor::new(source, base);
    std::iter::from_fn(|| cursor.next_token()).collect()
}

/// Tokenize a complete source
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    tokenize_from(source, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("export default function App() {}"),
            vec![
                Token::Export,
                Token::Default,
                Token::Function,
                Token::Ident,
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
            ]
        );
        assert_eq!(kinds("imports"), vec![Token::Ident]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("const /* a */ x = 1 // trailing\n;"),
            vec![Token::Const, Token::Ident, Token::Eq, Token::Number, Token::Semicolon]
        );
    }

    #[test]
    fn test_strings_hide_braces() {
        assert_eq!(
            kinds(r#"f("{", '}', `{`)"#),
            vec![
                Token::Ident,
                Token::LParen,
                Token::String,
                Token::Comma,
                Token::String,
                Token::Comma,
                Token::Template,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_offsets_are_absolute() {
        let source = "abc = <div/>";
        let tokens = tokenize_from(source, 4);
        assert_eq!(tokens[0], (Token::Eq, 4..5));
        assert_eq!(tokens[1], (Token::LAngle, 6..7));
    }
}
