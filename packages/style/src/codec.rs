//! Utility class codecs.
//!
//! A codec maps one class token to a `(key, value)` pair and back. Tokens a
//! codec does not recognize are kept by the style model as opaque entries.

use crate::property::{self, Property, DEFAULT, PREFIXES};
use serde::{Deserialize, Serialize};

/// Property plus the variant chain it applies under (`md:hover:`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtilityKey {
    pub property: Property,
    pub variants: Vec<String>,
}

impl UtilityKey {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            variants: Vec::new(),
        }
    }

    pub fn with_variants<I, S>(property: Property, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            property,
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Utility value. Negative values carry a leading `-` (`-2` for `-mt-2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleValue {
    pub value: String,
    pub important: bool,
}

impl StyleValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            important: false,
        }
    }

    pub fn important(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            important: true,
        }
    }
}

pub trait UtilityCodec: Send + Sync {
    /// Decode a class token; `None` for tokens this codec does not know
    fn decode(&self, token: &str) -> Option<(UtilityKey, StyleValue)>;

    /// Encode a declaration back into a single class token
    fn encode(&self, key: &UtilityKey, value: &StyleValue) -> String;
}

/// Split `md:hover:p-4` into `["md", "hover"]` and `p-4`.
/// Colons inside arbitrary values (`[...]`) do not separate variants.
pub fn split_variants(token: &str) -> (Vec<&str>, &str) {
    let mut variants = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in token.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                variants.push(&token[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    (variants, &token[start..])
}

/// Codec for Tailwind CSS utility classes
#[derive(Debug, Clone, Copy, Default)]
pub struct TailwindCodec;

impl TailwindCodec {
    fn decode_body(body: &str) -> Option<(Property, String)> {
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        if !negative {
            if let Some((property, value)) = property::keyword(body) {
                return Some((property, value.to_string()));
            }
        }

        let (prefix, value) = PREFIXES
            .iter()
            .filter_map(|prefix| {
                let value = body.strip_prefix(prefix)?.strip_prefix('-')?;
                Some((*prefix, value))
            })
            .max_by_key(|(prefix, _)| prefix.len())?;

        // `DEFAULT` is the stored form of a bare keyword and never a written suffix
        if value.is_empty() || value == DEFAULT || value.starts_with('-') || !balanced(value) {
            return None;
        }

        let property = property::resolve(prefix, value)?;
        let value = if negative {
            format!("-{}", value)
        } else {
            value.to_string()
        };
        Some((property, value))
    }
}

fn balanced(value: &str) -> bool {
    let mut depth = 0i32;
    for c in value.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

impl UtilityCodec for TailwindCodec {
    fn decode(&self, token: &str) -> Option<(UtilityKey, StyleValue)> {
        let (variants, body) = split_variants(token);
        if variants.iter().any(|variant| variant.is_empty()) {
            return None;
        }

        let (important, body) = match body.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let (property, value) = Self::decode_body(body)?;
        Some((
            UtilityKey::with_variants(property, variants),
            StyleValue { value, important },
        ))
    }

    fn encode(&self, key: &UtilityKey, value: &StyleValue) -> String {
        let mut token = String::new();
        for variant in &key.variants {
            token.push_str(variant);
            token.push(':');
        }
        if value.important {
            token.push('!');
        }

        let (negative, raw) = match value.value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.value.as_str()),
        };

        match key.property.prefix() {
            None => token.push_str(raw),
            Some(prefix) if raw == DEFAULT => {
                if negative {
                    token.push('-');
                }
                token.push_str(prefix);
            }
            Some(prefix) => {
                if negative {
                    token.push('-');
                }
                token.push_str(prefix);
                token.push('-');
                token.push_str(raw);
            }
        }

        token
    }
}
