use crate::context::{CompilerContext, TranspileOptions};
use crate::error::CompileResult;
use inspect_parser::{
    Attribute, AttributeValue, Element, ElementName, Fragment, Markup, ParseOptions, Parser, Span,
};
use std::ops::Range;

/// Compile a JSX/TSX module to plain calls of the configured pragma.
///
/// Everything outside markup is copied through untouched, so type
/// annotations survive; only markup is rewritten.
pub fn compile_to_react(source: &str, options: &TranspileOptions) -> CompileResult<String> {
    let ctx = CompilerContext::new(options.clone());
    let unit = Unit::new(source);

    unit.compile_range(0..source.len(), &ctx)?;

    Ok(ctx.get_output())
}

/// A piece of source text and a parser over it
struct Unit<'src> {
    source: &'src str,
    parser: Parser<'src>,
}

impl<'src> Unit<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            parser: Parser::new(source, ParseOptions::default()),
        }
    }

    /// Copy `range` to the output with each markup node replaced by its call
    fn compile_range(&self, range: Range<usize>, ctx: &CompilerContext) -> CompileResult<()> {
        let mut last = range.start;

        for (span, markup) in self.parser.scan_markup(range.clone())? {
            ctx.add(&self.source[last..span.start]);
            self.compile_markup(&markup, ctx)?;
            last = span.end;
        }

        ctx.add(&self.source[last..range.end]);
        Ok(())
    }

    /// Compile a markup node in expression position
    fn compile_markup(&self, markup: &Markup, ctx: &CompilerContext) -> CompileResult<()> {
        match markup {
            Markup::Element(element) => self.compile_element(element, ctx),
            Markup::Fragment(fragment) => self.compile_fragment(fragment, ctx),
            Markup::Text(text) => {
                ctx.add(&js_string(&text.value));
                Ok(())
            }
            Markup::Expression(container) => {
                self.compile_embedded(container.expression(), container.span.as_ref(), 1, ctx)
            }
            Markup::Spread(spread) => {
                self.compile_embedded(spread.expression(), None, 0, ctx)
            }
        }
    }

    fn compile_element(&self, element: &Element, ctx: &CompilerContext) -> CompileResult<()> {
        ctx.add(&ctx.options.pragma);
        ctx.add("(");
        ctx.add(&element_type(&element.name));
        ctx.add(", ");
        self.compile_props(element, ctx)?;
        self.compile_children(&element.children, ctx)?;
        ctx.add(")");
        Ok(())
    }

    fn compile_fragment(&self, fragment: &Fragment, ctx: &CompilerContext) -> CompileResult<()> {
        ctx.add(&ctx.options.pragma);
        ctx.add("(");
        ctx.add(&ctx.options.pragma_frag);
        ctx.add(", null");
        self.compile_children(&fragment.children, ctx)?;
        ctx.add(")");
        Ok(())
    }

    fn compile_props(&self, element: &Element, ctx: &CompilerContext) -> CompileResult<()> {
        let location = element.span.as_ref().filter(|_| ctx.options.source_locations);

        if element.attributes.is_empty() && location.is_none() {
            ctx.add("null");
            return Ok(());
        }

        ctx.add("{");
        for (i, attribute) in element.attributes.iter().enumerate() {
            if i > 0 {
                ctx.add(", ");
            }
            self.compile_attribute(attribute, ctx)?;
        }

        if let Some(span) = location {
            if !element.attributes.is_empty() {
                ctx.add(", ");
            }
            ctx.add(&format!(
                "__source: {{fileName: {}, lineNumber: {}, columnNumber: {}}}",
                js_string(&ctx.options.file_name),
                span.loc_start.line,
                span.loc_start.column + 1
            ));
        }
        ctx.add("}");
        Ok(())
    }

    fn compile_attribute(&self, attribute: &Attribute, ctx: &CompilerContext) -> CompileResult<()> {
        match attribute {
            Attribute::Named { name, value } => {
                ctx.add(&prop_key(name));
                ctx.add(": ");
                match value {
                    None => ctx.add("true"),
                    Some(AttributeValue::String { value, .. }) => {
                        ctx.add(&js_string(&decode_entities(value)))
                    }
                    Some(AttributeValue::Expression { raw }) => {
                        let code = raw
                            .strip_prefix('{')
                            .and_then(|inner| inner.strip_suffix('}'))
                            .unwrap_or(raw);
                        compile_snippet(code, ctx)?;
                    }
                }
            }
            Attribute::Spread { raw } => {
                let code = raw
                    .strip_prefix('{')
                    .and_then(|inner| inner.strip_suffix('}'))
                    .unwrap_or(raw)
                    .trim();
                compile_snippet(code, ctx)?;
            }
        }
        Ok(())
    }

    fn compile_children(&self, children: &[Markup], ctx: &CompilerContext) -> CompileResult<()> {
        for child in children {
            match child {
                Markup::Text(text) => {
                    if let Some(cleaned) = clean_text(&text.value) {
                        ctx.add(", ");
                        ctx.add(&js_string(&decode_entities(&cleaned)));
                    }
                }
                Markup::Expression(container) => {
                    if is_empty_expression(container.expression()) {
                        continue;
                    }
                    ctx.add(", ");
                    self.compile_markup(child, ctx)?;
                }
                Markup::Spread(_) => {
                    ctx.add(", ...");
                    self.compile_markup(child, ctx)?;
                }
                Markup::Element(_) | Markup::Fragment(_) => {
                    ctx.add(", ");
                    self.compile_markup(child, ctx)?;
                }
            }
        }
        Ok(())
    }

    /// Compile code embedded in markup. When the original span is known the
    /// code is compiled in place so nested elements keep their file
    /// positions; otherwise it is compiled as a detached snippet.
    fn compile_embedded(
        &self,
        code: &str,
        span: Option<&Span>,
        prefix: usize,
        ctx: &CompilerContext,
    ) -> CompileResult<()> {
        match span {
            Some(span) if span.end >= span.start + prefix * 2 => {
                let range = span.start + prefix..span.end - prefix;
                if self.source.get(range.clone()) == Some(code) {
                    return self.compile_range(range, ctx);
                }
                compile_snippet(code, ctx)
            }
            _ => compile_snippet(code, ctx),
        }
    }
}

fn compile_snippet(code: &str, ctx: &CompilerContext) -> CompileResult<()> {
    let unit = Unit::new(code);
    unit.compile_range(0..code.len(), &ctx.without_locations())
}

/// Lowercase and dashed names are host elements, passed by string
fn element_type(name: &ElementName) -> String {
    match name {
        ElementName::Identifier(name) => {
            let host = name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase())
                || name.contains('-');
            if host {
                js_string(name)
            } else {
                name.clone()
            }
        }
        ElementName::Member(name) => name.clone(),
        ElementName::Namespaced(name) => js_string(name),
    }
}

fn prop_key(name: &str) -> String {
    let mut chars = name.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');

    if identifier {
        name.to_string()
    } else {
        js_string(name)
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// JSX text whitespace rules: lines are trimmed where they meet a line
/// break, blank lines are dropped and the rest are joined by single spaces.
fn clean_text(raw: &str) -> Option<String> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last_non_empty = lines
        .iter()
        .rposition(|line| line.chars().any(|c| c != ' ' && c != '\t'))?;

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut trimmed: &str = line;
        let expanded;
        if trimmed.contains('\t') {
            expanded = trimmed.replace('\t', " ");
            trimmed = &expanded;
        }
        if i > 0 {
            trimmed = trimmed.trim_start_matches(' ');
        }
        if i + 1 < lines.len() {
            trimmed = trimmed.trim_end_matches(' ');
        }
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            if i != last_non_empty {
                out.push(' ');
            }
        }
    }

    Some(out)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(decimal) = name.strip_prefix('#') {
        return decimal.parse().ok().and_then(char::from_u32);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        "hellip" => Some('\u{2026}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        _ => None,
    }
}

/// `{}` and `{/* comment */}` produce no child
fn is_empty_expression(code: &str) -> bool {
    let mut rest = code.trim();

    loop {
        if rest.is_empty() {
            return true;
        }
        if let Some(body) = rest.strip_prefix("/*") {
            match body.find("*/") {
                Some(end) => rest = body[end + 2..].trim_start(),
                None => return false,
            }
        } else if let Some(body) = rest.strip_prefix("//") {
            match body.find('\n') {
                Some(end) => rest = body[end + 1..].trim_start(),
                None => return true,
            }
        } else {
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("Hello"), Some("Hello".to_string()));
        assert_eq!(clean_text("\n    "), None);
        assert_eq!(
            clean_text("\n    Hello\n    world  \n  "),
            Some("Hello world".to_string())
        );
        assert_eq!(clean_text("  a  "), Some("  a  ".to_string()));
        assert_eq!(clean_text(" #"), Some(" #".to_string()));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_element_type() {
        assert_eq!(element_type(&ElementName::parse("div")), "\"div\"");
        assert_eq!(element_type(&ElementName::parse("my-widget")), "\"my-widget\"");
        assert_eq!(element_type(&ElementName::parse("Button")), "Button");
        assert_eq!(element_type(&ElementName::parse("Foo.Bar")), "Foo.Bar");
        assert_eq!(element_type(&ElementName::parse("svg:rect")), "\"svg:rect\"");
    }

    #[test]
    fn test_prop_key() {
        assert_eq!(prop_key("className"), "className");
        assert_eq!(prop_key("data-id"), "\"data-id\"");
        assert_eq!(prop_key("xlink:href"), "\"xlink:href\"");
    }

    #[test]
    fn test_empty_expression() {
        assert!(is_empty_expression(""));
        assert!(is_empty_expression(" /* note */ "));
        assert!(is_empty_expression("// note\n"));
        assert!(!is_empty_expression("/* note */ value"));
        assert!(!is_empty_expression("value"));
    }
}
