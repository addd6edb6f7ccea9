use crate::ast::*;
use crate::error::PrintError;
use serde::{Deserialize, Serialize};

pub type PrintResult<T> = Result<T, PrintError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Quote {
    #[default]
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    /// Quote for new attribute literals, and the first fallback when a
    /// literal's own quote appears in its value
    pub quote: Quote,
}

/// Lossless printer.
///
/// Every fragment keeps the verbatim text it was parsed from; only element
/// opening tags whose attributes changed are regenerated. An unmodified file
/// prints byte-identically to its source.
pub struct Printer {
    options: PrintOptions,
}

impl Printer {
    pub fn new(options: PrintOptions) -> Self {
        Self { options }
    }

    pub fn print_file(&self, file: &File) -> PrintResult<String> {
        let mut output = String::new();

        for statement in &file.statements {
            output.push_str(&statement.leading);
            match &statement.kind {
                StatementKind::Import { text, .. } | StatementKind::Other { text } => {
                    output.push_str(text)
                }
                StatementKind::Declaration(decl) => self.print_declaration(decl, &mut output)?,
            }
        }

        output.push_str(&file.trailing);
        Ok(output)
    }

    pub fn print_declaration(&self, decl: &Declaration, output: &mut String) -> PrintResult<()> {
        if decl.segments.len() != decl.returns.len() + 1 {
            return Err(PrintError::DetachedMarkup {
                name: decl.name.clone().unwrap_or_else(|| "<anonymous>".to_string()),
                segments: decl.segments.len(),
                roots: decl.returns.len(),
            });
        }

        for (segment, markup) in decl.segments.iter().zip(&decl.returns) {
            output.push_str(segment);
            self.print_markup(markup, output)?;
        }
        if let Some(last) = decl.segments.last() {
            output.push_str(last);
        }
        Ok(())
    }

    pub fn print_markup(&self, markup: &Markup, output: &mut String) -> PrintResult<()> {
        match markup {
            Markup::Element(element) => self.print_element(element, output)?,
            Markup::Text(text) => output.push_str(&text.value),
            Markup::Expression(expr) => output.push_str(&expr.raw),
            Markup::Spread(spread) => output.push_str(&spread.raw),
            Markup::Fragment(fragment) => {
                output.push_str(&fragment.opening);
                for child in &fragment.children {
                    self.print_markup(child, output)?;
                }
                output.push_str(&fragment.closing);
            }
        }
        Ok(())
    }

    fn print_element(&self, element: &Element, output: &mut String) -> PrintResult<()> {
        // A self-closing element that gained children must grow a closing tag
        let closes = !element.self_closing || !element.children.is_empty();

        match &element.opening {
            Some(opening) if !(element.self_closing && closes) => output.push_str(opening),
            _ => self.print_opening(element, !closes, output)?,
        }

        for child in &element.children {
            self.print_markup(child, output)?;
        }

        if closes {
            match &element.closing {
                Some(closing) => output.push_str(closing),
                None => {
                    output.push_str("</");
                    output.push_str(element.name.as_str());
                    output.push('>');
                }
            }
        }
        Ok(())
    }

    fn print_opening(&self, element: &Element, self_closing: bool, output: &mut String) -> PrintResult<()> {
        let name = element.name.as_str();
        if name.is_empty() {
            return Err(PrintError::EmptyTagName);
        }

        output.push('<');
        output.push_str(name);
        for attribute in &element.attributes {
            output.push(' ');
            self.print_attribute(attribute, output)?;
        }
        output.push_str(if self_closing { " />" } else { ">" });
        Ok(())
    }

    fn print_attribute(&self, attribute: &Attribute, output: &mut String) -> PrintResult<()> {
        match attribute {
            Attribute::Spread { raw } => output.push_str(raw),
            Attribute::Named { name, value } => {
                output.push_str(name);
                match value {
                    None => {}
                    Some(AttributeValue::Expression { raw }) => {
                        output.push('=');
                        output.push_str(raw);
                    }
                    Some(AttributeValue::String { value, quote }) => {
                        let quote = self.pick_quote(name, value, *quote)?;
                        output.push('=');
                        output.push(quote);
                        output.push_str(value);
                        output.push(quote);
                    }
                }
            }
        }
        Ok(())
    }

    fn pick_quote(&self, name: &str, value: &str, preferred: char) -> PrintResult<char> {
        let preferred_option = self.options.quote.as_char();
        [preferred, preferred_option, '"', '\'']
            .into_iter()
            .find(|quote| !value.contains(*quote))
            .ok_or_else(|| PrintError::UnrepresentableAttribute {
                name: name.to_string(),
            })
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintOptions::default())
    }
}

/// Print a file with default options
pub fn print(file: &File) -> PrintResult<String> {
    Printer::default().print_file(file)
}

pub fn print_with_options(file: &File, options: &PrintOptions) -> PrintResult<String> {
    Printer::new(*options).print_file(file)
}
