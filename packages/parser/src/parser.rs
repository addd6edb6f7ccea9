use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Cursor, SpannedToken, Token};
use crate::line_index::LineIndex;
use crate::markup::MarkupScanner;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Source dialect switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Recognize markup (`<div>...</div>`) in expression position
    pub jsx: bool,
    /// Treat `<T,>` and `<T extends U>` as type parameters rather than markup
    pub typescript: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            jsx: true,
            typescript: true,
        }
    }
}

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "with"];
const BLOCK_STATEMENTS: &[&str] = &[
    "class",
    "interface",
    "enum",
    "namespace",
    "module",
    "declare",
    "abstract",
    "if",
    "for",
    "while",
    "switch",
    "try",
    "do",
];
const BLOCK_CONTINUATIONS: &[&str] = &["else", "catch", "finally", "while"];
const STATEMENT_IDENTS: &[&str] = &[
    "class",
    "interface",
    "type",
    "enum",
    "declare",
    "namespace",
    "abstract",
];
const HEAD_TOKENS: usize = 6;

#[derive(Debug, Clone, Copy)]
enum Delimiter {
    Paren { control: bool, pos: usize },
    Bracket { pos: usize },
    Brace { function: bool, pos: usize },
}

impl Delimiter {
    fn pos(&self) -> usize {
        match self {
            Delimiter::Paren { pos, .. }
            | Delimiter::Bracket { pos }
            | Delimiter::Brace { pos, .. } => *pos,
        }
    }

    fn construct(&self) -> &'static str {
        match self {
            Delimiter::Paren { .. } => "parenthesis",
            Delimiter::Bracket { .. } => "bracket",
            Delimiter::Brace { .. } => "block",
        }
    }
}

#[derive(Debug, Default)]
struct Header {
    import: bool,
    export: Option<ExportKind>,
    keyword: Option<DeclarationKeyword>,
    name: Option<String>,
    block_bodied: bool,
}

/// Parser for JSX/TSX modules.
///
/// Statements are split with a token scanner and kept verbatim; markup is
/// parsed structurally wherever it appears in expression position.
pub struct Parser<'src> {
    pub(crate) source: &'src str,
    pub(crate) lines: LineIndex<'src>,
    pub(crate) options: ParseOptions,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            options,
        }
    }

    /// Parse a complete file
    pub fn parse_file(&self) -> ParseResult<File> {
        let mut file = File::new();
        let mut cursor = Cursor::new(self.source, 0);
        let mut last_end = 0;

        while let Some((_, span)) = cursor.peek().cloned() {
            let start = span.start;
            let (kind, end) = self.parse_statement(&mut cursor, start)?;

            file.statements.push(Statement {
                leading: self.source[last_end..start].to_string(),
                kind,
                span: self.lines.span(start, end),
            });
            last_end = end;
        }

        file.trailing = self.source[last_end..].to_string();
        Ok(file)
    }

    /// Collect every outermost markup node whose `<` lies inside `range`
    pub fn scan_markup(&self, range: Range<usize>) -> ParseResult<Vec<(Range<usize>, Markup)>> {
        let mut cursor = Cursor::new(self.source, range.start);
        let mut found = Vec::new();
        let mut prev: Option<Token> = None;

        while let Some((token, span)) = cursor.next_token() {
            if span.start >= range.end {
                break;
            }
            if token == Token::LAngle && self.starts_markup(prev, span.start) {
                let (markup, end) = self.parse_markup_at(span.start)?;
                found.push((span.start..end, markup));
                cursor.restart(end);
                prev = Some(Token::RParen);
                continue;
            }
            prev = Some(token);
        }

        Ok(found)
    }

    fn parse_statement(&self, cursor: &mut Cursor<'src>, start: usize) -> ParseResult<(StatementKind, usize)> {
        let mut head: Vec<SpannedToken> = Vec::with_capacity(HEAD_TOKENS);
        let mut stack: Vec<Delimiter> = Vec::new();
        let mut function_depth = 0usize;
        let mut pending_root = false;
        let mut signature_open = false;
        let mut roots: Vec<(Range<usize>, Markup)> = Vec::new();
        let mut last_string: Option<Range<usize>> = None;
        let mut prev: Option<Token> = None;
        let mut prev_span = start..start;
        let mut prev_end = start;

        let end = loop {
            let (token, span) = match cursor.peek().cloned() {
                Some(next) => next,
                None => {
                    if let Some(open) = stack.last() {
                        return Err(ParseError::unterminated(open.pos(), open.construct()));
                    }
                    break prev_end;
                }
            };

            if stack.is_empty() && self.ends_before(prev, prev_end, token, &span) {
                break prev_end;
            }
            cursor.next_token();

            if head.len() < HEAD_TOKENS {
                head.push((token, span.clone()));
            }

            match token {
                Token::Semicolon if stack.is_empty() => break span.end,
                Token::String => last_string = Some(span.clone()),
                Token::LParen => {
                    let control = prev == Some(Token::Ident)
                        && CONTROL_KEYWORDS.contains(&&self.source[prev_span.clone()]);
                    stack.push(Delimiter::Paren {
                        control,
                        pos: span.start,
                    });
                }
                Token::RParen => match stack.pop() {
                    Some(Delimiter::Paren { control, .. }) => {
                        prev = Some(token);
                        prev_end = span.end;
                        prev_span = span;
                        pending_root = false;
                        signature_open = !control;
                        continue;
                    }
                    _ => return Err(ParseError::unexpected_token(span.start, "matching delimiter", ")")),
                },
                Token::LBracket => stack.push(Delimiter::Bracket { pos: span.start }),
                Token::RBracket => match stack.pop() {
                    Some(Delimiter::Bracket { .. }) => {}
                    _ => return Err(ParseError::unexpected_token(span.start, "matching delimiter", "]")),
                },
                Token::LBrace => {
                    let function = prev == Some(Token::Arrow) || signature_open;
                    if function {
                        function_depth += 1;
                    }
                    stack.push(Delimiter::Brace {
                        function,
                        pos: span.start,
                    });
                }
                Token::RBrace => match stack.pop() {
                    Some(Delimiter::Brace { function, .. }) => {
                        if function {
                            function_depth -= 1;
                        }
                        if stack.is_empty()
                            && self.derive_header(&head).block_bodied
                            && !self.continues_block(cursor)
                        {
                            break span.end;
                        }
                    }
                    _ => return Err(ParseError::unexpected_token(span.start, "matching delimiter", "}")),
                },
                Token::LAngle if self.starts_markup(prev, span.start) => {
                    let (markup, end) = self.parse_markup_at(span.start)?;
                    if pending_root {
                        roots.push((span.start..end, markup));
                    }
                    cursor.restart(end);
                    prev = Some(Token::RParen);
                    prev_span = span.start..end;
                    prev_end = end;
                    pending_root = false;
                    signature_open = false;
                    continue;
                }
                _ => {}
            }

            pending_root = match token {
                Token::Return => function_depth == 1,
                Token::Arrow => function_depth == 0,
                Token::LParen => pending_root,
                _ => false,
            };
            signature_open = signature_open
                && matches!(
                    token,
                    Token::Colon
                        | Token::Ident
                        | Token::Punct
                        | Token::LAngle
                        | Token::RAngle
                        | Token::Comma
                        | Token::LBracket
                        | Token::RBracket
                );
            prev = Some(token);
            prev_end = span.end;
            prev_span = span;
        };

        let header = self.derive_header(&head);
        let text = &self.source[start..end];

        let kind = if header.import {
            StatementKind::Import {
                text: text.to_string(),
                source: last_string.map(|range| unquote(&self.source[range]).to_string()),
            }
        } else if let Some(keyword) = header.keyword {
            let mut segments = Vec::with_capacity(roots.len() + 1);
            let mut returns = Vec::with_capacity(roots.len());
            let mut cursor_pos = start;
            for (range, markup) in roots {
                segments.push(self.source[cursor_pos..range.start].to_string());
                returns.push(markup);
                cursor_pos = range.end;
            }
            segments.push(self.source[cursor_pos..end].to_string());

            StatementKind::Declaration(Declaration {
                name: header.name,
                keyword,
                export: header.export,
                returns,
                segments,
                span: self.lines.span(start, end),
            })
        } else {
            StatementKind::Other {
                text: text.to_string(),
            }
        };

        Ok((kind, end))
    }

    /// Automatic statement termination at depth zero: a statement keyword on
    /// a new line after a token that cannot continue an expression.
    fn ends_before(&self, prev: Option<Token>, prev_end: usize, token: Token, span: &Range<usize>) -> bool {
        let Some(prev) = prev else {
            return false;
        };
        if continues_expression(prev) {
            return false;
        }
        if !self.source[prev_end..span.start].contains('\n') {
            return false;
        }
        token.starts_statement()
            || (token == Token::Ident && STATEMENT_IDENTS.contains(&&self.source[span.clone()]))
    }

    fn continues_block(&self, cursor: &mut Cursor<'src>) -> bool {
        match cursor.peek() {
            Some((Token::Ident, span)) => BLOCK_CONTINUATIONS.contains(&&self.source[span.clone()]),
            _ => false,
        }
    }

    fn derive_header(&self, head: &[SpannedToken]) -> Header {
        let mut header = Header::default();
        let token_at = |i: usize| head.get(i).map(|(t, _)| *t);
        let text_at = |i: usize| head.get(i).map(|(_, span)| &self.source[span.clone()]);

        let mut i = 0;
        match token_at(0) {
            Some(Token::Import) => {
                header.import = true;
                return header;
            }
            Some(Token::LBrace) => {
                header.block_bodied = true;
                return header;
            }
            Some(Token::Export) => {
                header.export = Some(ExportKind::Named);
                i += 1;
                if token_at(i) == Some(Token::Default) {
                    header.export = Some(ExportKind::Default);
                    i += 1;
                }
            }
            _ => {}
        }

        if token_at(i) == Some(Token::Async) {
            i += 1;
        }

        match token_at(i) {
            Some(Token::Function) => {
                i += 1;
                if text_at(i) == Some("*") {
                    i += 1;
                }
                header.keyword = Some(DeclarationKeyword::Function);
                header.block_bodied = true;
                if token_at(i) == Some(Token::Ident) {
                    header.name = text_at(i).map(str::to_string);
                }
            }
            Some(keyword @ (Token::Const | Token::Let | Token::Var)) => {
                header.keyword = Some(match keyword {
                    Token::Const => DeclarationKeyword::Const,
                    Token::Let => DeclarationKeyword::Let,
                    _ => DeclarationKeyword::Var,
                });
                if token_at(i + 1) == Some(Token::Ident) {
                    header.name = text_at(i + 1).map(str::to_string);
                }
            }
            Some(Token::Ident) => {
                header.block_bodied = text_at(i).is_some_and(|text| BLOCK_STATEMENTS.contains(&text));
            }
            _ => {}
        }

        header
    }

    /// Whether a `<` at `pos` (after `prev`) opens markup
    pub(crate) fn starts_markup(&self, prev: Option<Token>, pos: usize) -> bool {
        if !self.options.jsx || !prev.map_or(true, Token::precedes_expression) {
            return false;
        }

        let rest = &self.source[pos + 1..];
        match rest.chars().next() {
            Some('>') => return true,
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            _ => return false,
        }

        if self.options.typescript {
            // `<T,>(...) =>` and `<T extends U>(...) =>` are type parameters
            let name_len = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .unwrap_or(rest.len());
            let after = rest[name_len..].trim_start();
            if after.starts_with(',') || after.starts_with("extends ") {
                return false;
            }
        }

        true
    }

    /// Parse the markup node starting at `lt`, returning it and its end offset
    pub(crate) fn parse_markup_at(&self, lt: usize) -> ParseResult<(Markup, usize)> {
        let mut scanner = MarkupScanner::new(self, lt);
        let markup = scanner.parse_node()?;
        Ok((markup, scanner.pos()))
    }

    /// Skip a braced expression whose `{` is at `open`; returns the offset after `}`
    pub(crate) fn skip_braced(&self, open: usize) -> ParseResult<usize> {
        let mut cursor = Cursor::new(self.source, open + 1);
        let mut depth = 0usize;
        let mut prev = Some(Token::LBrace);

        while let Some((token, span)) = cursor.next_token() {
            match token {
                Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
                Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
                Token::RBrace if depth == 0 => return Ok(span.end),
                Token::RBrace => depth -= 1,
                Token::LAngle if self.starts_markup(prev, span.start) => {
                    let (_, end) = self.parse_markup_at(span.start)?;
                    cursor.restart(end);
                    prev = Some(Token::RParen);
                    continue;
                }
                _ => {}
            }
            prev = Some(token);
        }

        Err(ParseError::unterminated(open, "expression container"))
    }
}

fn continues_expression(token: Token) -> bool {
    matches!(
        token,
        Token::Eq
            | Token::Arrow
            | Token::Comma
            | Token::Colon
            | Token::Question
            | Token::AndAnd
            | Token::OrOr
            | Token::Nullish
            | Token::Bang
            | Token::Punct
            | Token::Ellipsis
            | Token::Export
            | Token::Default
            | Token::Async
            | Token::Return
            | Token::Import
            | Token::Function
            | Token::Const
            | Token::Let
            | Token::Var
    )
}

fn unquote(literal: &str) -> &str {
    literal
        .get(1..literal.len().saturating_sub(1))
        .unwrap_or(literal)
}

/// Parse a source file with the default JSX + TypeScript dialect
pub fn parse(source: &str) -> ParseResult<File> {
    parse_with_options(source, ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult<File> {
    Parser::new(source, options).parse_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(file: &File, index: usize) -> &Declaration {
        match &file.statements[index].kind {
            StatementKind::Declaration(decl) => decl,
            other => panic!("expected declaration, found {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_component() {
        let source = r#"import React from "react";

export default function App() {
  return (
    <div className="p-4">
      Hello
    </div>
  );
}
"#;
        let file = parse(source).expect("Parse failed");
        assert_eq!(file.statements.len(), 2);

        match &file.statements[0].kind {
            StatementKind::Import { source, .. } => assert_eq!(source.as_deref(), Some("react")),
            other => panic!("expected import, found {:?}", other),
        }

        let app = declaration(&file, 1);
        assert_eq!(app.name.as_deref(), Some("App"));
        assert_eq!(app.keyword, DeclarationKeyword::Function);
        assert_eq!(app.export, Some(ExportKind::Default));
        assert_eq!(app.returns.len(), 1);
        assert_eq!(app.segments.len(), 2);
        assert_eq!(file.trailing, "\n");
    }

    #[test]
    fn test_parse_arrow_component_without_semicolon() {
        let source = "const Card = ({ title }) => (\n  <section>{title}</section>\n)\nexport default Card\n";
        let file = parse(source).expect("Parse failed");
        assert_eq!(file.statements.len(), 2);

        let card = declaration(&file, 0);
        assert_eq!(card.name.as_deref(), Some("Card"));
        assert_eq!(card.keyword, DeclarationKeyword::Const);
        assert_eq!(card.returns.len(), 1);

        assert!(matches!(file.statements[1].kind, StatementKind::Other { .. }));
    }

    #[test]
    fn test_nested_function_markup_is_not_a_root() {
        let source = r#"function List({ items }) {
  const rows = items.map((item) => <li key={item}>{item}</li>);
  function Inner() {
    return <b>inner</b>;
  }
  if (items.length === 0) {
    return <p>empty</p>;
  }
  return <ul>{rows}</ul>;
}"#;
        let file = parse(source).expect("Parse failed");
        let list = declaration(&file, 0);
        assert_eq!(list.returns.len(), 2);
        assert!(matches!(&list.returns[0], Markup::Element(e) if e.name.as_str() == "p"));
        assert!(matches!(&list.returns[1], Markup::Element(e) if e.name.as_str() == "ul"));
    }

    #[test]
    fn test_typescript_return_annotation() {
        let source = "export function Badge(props: Props): JSX.Element {\n  return <span>{props.label}</span>;\n}\n";
        let file = parse(source).expect("Parse failed");
        let badge = declaration(&file, 0);
        assert_eq!(badge.export, Some(ExportKind::Named));
        assert_eq!(badge.returns.len(), 1);
    }

    #[test]
    fn test_comparison_is_not_markup() {
        let source = "const small = a < b && c > d;\nconst Box = () => <div />;\n";
        let file = parse(source).expect("Parse failed");
        assert_eq!(file.statements.len(), 2);
        assert_eq!(declaration(&file, 0).returns.len(), 0);
        assert_eq!(declaration(&file, 1).returns.len(), 1);
    }

    #[test]
    fn test_generic_arrow_is_not_markup() {
        let source = "const id = <T,>(value: T) => value;\n";
        let file = parse(source).expect("Parse failed");
        assert_eq!(file.statements.len(), 1);
        assert_eq!(declaration(&file, 0).returns.len(), 0);
    }

    #[test]
    fn test_jsx_disabled_treats_angle_as_operator() {
        let options = ParseOptions {
            jsx: false,
            typescript: true,
        };
        let file = parse_with_options("const x = (a) => (b < c);\n", options).expect("Parse failed");
        assert_eq!(declaration(&file, 0).returns.len(), 0);
    }

    #[test]
    fn test_unbalanced_block_is_an_error() {
        let result = parse("function App() {\n  return <div />;\n");
        assert!(matches!(result, Err(ParseError::Unterminated { pos: 15, .. })));
    }

    #[test]
    fn test_stray_closing_brace_is_an_error() {
        let result = parse("const a = 1;\n}\n");
        assert!(matches!(result, Err(ParseError::UnexpectedToken { pos: 13, .. })));
    }

    #[test]
    fn test_leading_trivia_and_comments() {
        let source = "// header\n\nconst a = 1; /* tail */\nclass Foo {\n  bar() {}\n}\n";
        let file = parse(source).expect("Parse failed");
        assert_eq!(file.statements.len(), 2);
        assert_eq!(file.statements[0].leading, "// header\n\n");
        assert_eq!(file.statements[1].leading, " /* tail */\n");
        match &file.statements[1].kind {
            StatementKind::Other { text } => assert_eq!(text, "class Foo {\n  bar() {}\n}"),
            other => panic!("expected class statement, found {:?}", other),
        }
    }

    #[test]
    fn test_statement_spans_have_locations() {
        let source = "\n\nconst A = () => <a />;\n";
        let file = parse(source).expect("Parse failed");
        let span = file.statements[0].span;
        assert_eq!(span.loc_start, Position::new(3, 0));
        assert_eq!(span.start, 2);
    }

    #[test]
    fn test_scan_markup_finds_all_outermost_nodes() {
        let source = "const a = <A />;\nfunction f() { return cond ? <B /> : <C>{x}</C>; }\n";
        let parser = Parser::new(source, ParseOptions::default());
        let found = parser.scan_markup(0..source.len()).expect("scan failed");
        let names: Vec<&str> = found
            .iter()
            .map(|(_, markup)| match markup {
                Markup::Element(e) => e.name.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
