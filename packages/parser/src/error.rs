use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Unterminated {construct} starting at {pos}")]
    Unterminated { pos: usize, construct: &'static str },

    #[error("Mismatched closing tag at {pos}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        pos: usize,
        expected: String,
        found: String,
    },
}

impl ParseError {
    pub fn unexpected_token(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn unterminated(pos: usize, construct: &'static str) -> Self {
        Self::Unterminated { pos, construct }
    }

    /// Byte offset the error points at
    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::UnexpectedEof { pos, .. }
            | ParseError::Unterminated { pos, .. }
            | ParseError::MismatchedClosingTag { pos, .. } => *pos,
        }
    }
}

/// Errors raised while printing fragments back to text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrintError {
    #[error("Attribute {name} has a value containing both quote characters")]
    UnrepresentableAttribute { name: String },

    #[error("Declaration {name} has {segments} text segments for {roots} markup roots")]
    DetachedMarkup {
        name: String,
        segments: usize,
        roots: usize,
    },

    #[error("Element has an empty tag name")]
    EmptyTagName,
}

/// Pretty-print errors with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub mod pretty {
    use super::ParseError;
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};

    pub fn format_error(error: &ParseError, filename: &str, source: &str) -> String {
        let start = error.pos().min(source.len());
        let end = (start + 1).min(source.len()).max(start);

        let label = match error {
            ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
            ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::Unterminated { construct, .. } => format!("{} never closed", construct),
            ParseError::MismatchedClosingTag { expected, .. } => {
                format!("should close <{}>", expected)
            }
        };

        let mut output = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_config(Config::default().with_color(false))
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, start..end))
                    .with_color(Color::Red)
                    .with_message(label),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output);

        match written {
            Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
            Err(_) => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_position() {
        let err = ParseError::unterminated(12, "expression container");
        assert_eq!(err.pos(), 12);
        assert_eq!(
            err.to_string(),
            "Unterminated expression container starting at 12"
        );
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_pretty_report_mentions_file() {
        let source = "const App = () => <div>;\n";
        let err = ParseError::unexpected_eof(source.len(), "</div>");
        let report = pretty::format_error(&err, "App.tsx", source);
        assert!(report.contains("App.tsx"));
        assert!(report.contains("expected </div>"));
    }
}
