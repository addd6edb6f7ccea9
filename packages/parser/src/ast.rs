use serde::{Deserialize, Serialize};

/// Line/column position. Lines are 1-based, columns are 0-based character offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub loc_start: Position,
    pub loc_end: Position,
}

impl Span {
    pub fn new(start: usize, end: usize, loc_start: Position, loc_end: Position) -> Self {
        Self {
            start,
            end,
            loc_start,
            loc_end,
        }
    }
}

/// Root of a parsed source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub statements: Vec<Statement>,
    /// Whitespace and comments after the last statement
    pub trailing: String,
}

impl File {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declarations in source order, paired with their statement index
    pub fn declarations(&self) -> impl Iterator<Item = (usize, &Declaration)> {
        self.statements
            .iter()
            .enumerate()
            .filter_map(|(index, statement)| match &statement.kind {
                StatementKind::Declaration(decl) => Some((index, decl)),
                _ => None,
            })
    }
}

/// Top-level statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Whitespace and comments preceding the statement
    pub leading: String,
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatementKind {
    /// `import ...` kept verbatim
    Import { text: String, source: Option<String> },

    /// Function or variable declaration
    Declaration(Declaration),

    /// Anything else, kept verbatim
    Other { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKeyword {
    Function,
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    Named,
    Default,
}

/// Function or variable declaration.
///
/// The declaration text is `segments[0] + returns[0] + segments[1] + ... + segments[n]`,
/// so `segments.len() == returns.len() + 1` for a well-formed declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: Option<String>,
    pub keyword: DeclarationKeyword,
    pub export: Option<ExportKind>,
    /// Markup returned by the declaration body (or its concise arrow body)
    pub returns: Vec<Markup>,
    pub segments: Vec<String>,
    pub span: Span,
}

/// Markup node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Markup {
    Element(Element),
    Text(Text),
    Expression(ExpressionContainer),
    Spread(SpreadChild),
    Fragment(Fragment),
}

impl Markup {
    pub fn span(&self) -> Option<&Span> {
        match self {
            Markup::Element(e) => e.span.as_ref(),
            Markup::Text(t) => t.span.as_ref(),
            Markup::Expression(e) => e.span.as_ref(),
            Markup::Spread(s) => s.span.as_ref(),
            Markup::Fragment(f) => f.span.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name")]
pub enum ElementName {
    /// `div`, `Button`
    Identifier(String),
    /// `Foo.Bar`
    Member(String),
    /// `svg:rect`
    Namespaced(String),
}

impl ElementName {
    pub fn as_str(&self) -> &str {
        match self {
            ElementName::Identifier(name)
            | ElementName::Member(name)
            | ElementName::Namespaced(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        if name.contains('.') {
            ElementName::Member(name.to_string())
        } else if name.contains(':') {
            ElementName::Namespaced(name.to_string())
        } else {
            ElementName::Identifier(name.to_string())
        }
    }
}

/// Element (`<div ...>...</div>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: ElementName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Markup>,
    pub self_closing: bool,
    /// Original opening tag text; cleared when attributes change
    pub opening: Option<String>,
    /// Original closing tag text
    pub closing: Option<String>,
    /// Absent for elements created by edits
    pub span: Option<Span>,
}

impl Element {
    /// Create a synthetic element with no source text
    pub fn new(name: &str) -> Self {
        Self {
            name: ElementName::parse(name),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
            opening: None,
            closing: None,
            span: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name() == Some(name))
    }

    /// Static string value of an attribute, if it has one.
    ///
    /// Accepts `name="value"` as well as `name={"value"}` and template
    /// literals without substitutions.
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        match self.attribute(name)? {
            Attribute::Named {
                value: Some(value), ..
            } => value.static_string(),
            _ => None,
        }
    }

    /// Set a string attribute. Returns false when the value was already current.
    pub fn set_string_attribute(&mut self, name: &str, value: &str, quote: char) -> bool {
        if let Some(Attribute::Named {
            value: Some(AttributeValue::String { value: current, .. }),
            ..
        }) = self.attribute(name)
        {
            if current == value {
                return false;
            }
        }

        let new_value = AttributeValue::String {
            value: value.to_string(),
            quote,
        };
        let existing = self
            .attributes
            .iter_mut()
            .find(|attr| attr.name() == Some(name));

        match existing {
            Some(Attribute::Named { value: slot, .. }) => {
                // Keep the author's quote style when replacing a literal
                let quote = match slot {
                    Some(AttributeValue::String { quote, .. }) => *quote,
                    _ => quote,
                };
                *slot = Some(AttributeValue::String {
                    value: value.to_string(),
                    quote,
                });
            }
            _ => self.attributes.push(Attribute::Named {
                name: name.to_string(),
                value: Some(new_value),
            }),
        }

        self.opening = None;
        true
    }

    /// Remove an attribute. Returns false when it was not present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|attr| attr.name() != Some(name));
        let removed = self.attributes.len() != before;
        if removed {
            self.opening = None;
        }
        removed
    }

    /// Replace the children list
    pub fn set_children(&mut self, children: Vec<Markup>) {
        self.children = children;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Attribute {
    /// `name`, `name="value"`, `name={expr}`
    Named {
        name: String,
        value: Option<AttributeValue>,
    },

    /// `{...props}`, raw text including braces
    Spread { raw: String },
}

impl Attribute {
    pub fn name(&self) -> Option<&str> {
        match self {
            Attribute::Named { name, .. } => Some(name),
            Attribute::Spread { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeValue {
    /// Quoted literal; `value` is the text between the quotes
    String { value: String, quote: char },

    /// `{...}`, raw text including braces
    Expression { raw: String },
}

impl AttributeValue {
    pub fn static_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String { value, .. } => Some(value),
            AttributeValue::Expression { raw } => {
                let inner = raw.strip_prefix('{')?.strip_suffix('}')?.trim();
                let mut chars = inner.chars();
                let quote = chars.next()?;
                if !matches!(quote, '"' | '\'' | '`') || inner.len() < 2 || !inner.ends_with(quote) {
                    return None;
                }
                let body = &inner[1..inner.len() - 1];
                if body.contains(quote) || body.contains('\\') || (quote == '`' && body.contains("${")) {
                    return None;
                }
                Some(body)
            }
        }
    }
}

/// JSX text, kept raw (including whitespace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub span: Option<Span>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            span: None,
        }
    }
}

/// `{expression}`, raw text including braces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionContainer {
    pub raw: String,
    pub span: Option<Span>,
}

impl ExpressionContainer {
    /// Expression text between the braces
    pub fn expression(&self) -> &str {
        self.raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(&self.raw)
    }
}

/// `{...children}`, raw text including braces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadChild {
    pub raw: String,
    pub span: Option<Span>,
}

impl SpreadChild {
    /// Spread operand text (after `...`)
    pub fn expression(&self) -> &str {
        let inner = self
            .raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(&self.raw)
            .trim_start();
        inner.strip_prefix("...").unwrap_or(inner)
    }
}

/// `<>...</>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub opening: String,
    pub children: Vec<Markup>,
    pub closing: String,
    pub span: Option<Span>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, value: AttributeValue) -> Attribute {
        Attribute::Named {
            name: name.to_string(),
            value: Some(value),
        }
    }

    #[test]
    fn test_element_name_classification() {
        assert_eq!(ElementName::parse("div"), ElementName::Identifier("div".into()));
        assert_eq!(ElementName::parse("Foo.Bar"), ElementName::Member("Foo.Bar".into()));
        assert_eq!(ElementName::parse("svg:rect"), ElementName::Namespaced("svg:rect".into()));
    }

    #[test]
    fn test_static_string_from_expression() {
        let value = AttributeValue::Expression {
            raw: "{\"p-4 flex\"}".to_string(),
        };
        assert_eq!(value.static_string(), Some("p-4 flex"));

        let template = AttributeValue::Expression {
            raw: "{`p-4 ${extra}`}".to_string(),
        };
        assert_eq!(template.static_string(), None);

        let call = AttributeValue::Expression {
            raw: "{cx(a, b)}".to_string(),
        };
        assert_eq!(call.static_string(), None);
    }

    #[test]
    fn test_set_string_attribute_unchanged_keeps_opening() {
        let mut element = Element::new("div");
        element.attributes.push(named(
            "className",
            AttributeValue::String {
                value: "p-4".into(),
                quote: '\'',
            },
        ));
        element.opening = Some("<div className='p-4'>".into());

        assert!(!element.set_string_attribute("className", "p-4", '"'));
        assert!(element.opening.is_some());

        assert!(element.set_string_attribute("className", "p-2", '"'));
        assert!(element.opening.is_none());
        match element.attribute("className") {
            Some(Attribute::Named {
                value: Some(AttributeValue::String { value, quote }),
                ..
            }) => {
                assert_eq!(value, "p-2");
                assert_eq!(*quote, '\'');
            }
            other => panic!("unexpected attribute {:?}", other),
        }
    }

    #[test]
    fn test_remove_attribute() {
        let mut element = Element::new("div");
        element.attributes.push(Attribute::Named {
            name: "hidden".into(),
            value: None,
        });
        element.opening = Some("<div hidden>".into());

        assert!(!element.remove_attribute("className"));
        assert!(element.opening.is_some());
        assert!(element.remove_attribute("hidden"));
        assert!(element.opening.is_none());
    }

    #[test]
    fn test_spread_child_expression() {
        let spread = SpreadChild {
            raw: "{ ...items }".into(),
            span: None,
        };
        assert_eq!(spread.expression(), "items ");
    }
}
