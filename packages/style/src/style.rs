use crate::codec::{StyleValue, UtilityCodec, UtilityKey};
use std::collections::BTreeMap;
use tracing::debug;

/// Canonical identity of a declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclarationKey {
    Utility(UtilityKey),
    /// Token the codec did not recognize, keyed by its literal text
    Opaque(String),
}

/// Borrowed view of one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleDeclaration<'a> {
    Utility(&'a UtilityKey, &'a StyleValue),
    Opaque(&'a str),
}

/// Structured set of utility declarations behind a class-list string.
///
/// Utilities serialize in canonical key order (property order, then variant
/// chain); opaque tokens follow in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    utilities: BTreeMap<UtilityKey, StyleValue>,
    opaque: Vec<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str, codec: &dyn UtilityCodec) -> Self {
        let mut style = Self::new();
        style.load_from_text(text, codec);
        style
    }

    /// Replace every declaration with those parsed from `text`
    pub fn load_from_text(&mut self, text: &str, codec: &dyn UtilityCodec) {
        self.clear();
        self.merge_from_text(text, codec);
        debug!(
            utilities = self.utilities.len(),
            opaque = self.opaque.len(),
            "loaded style from class list"
        );
    }

    /// Apply every token in `text` over the existing declarations
    pub fn merge_from_text(&mut self, text: &str, codec: &dyn UtilityCodec) {
        for token in text.split_whitespace() {
            self.apply_token(token, codec);
        }
    }

    /// Apply one class token. Returns the key it was stored under.
    pub fn apply_token(&mut self, token: &str, codec: &dyn UtilityCodec) -> DeclarationKey {
        match codec.decode(token) {
            Some((key, value)) => {
                self.utilities.insert(key.clone(), value);
                DeclarationKey::Utility(key)
            }
            None => {
                if !self.opaque.iter().any(|existing| existing == token) {
                    self.opaque.push(token.to_string());
                }
                DeclarationKey::Opaque(token.to_string())
            }
        }
    }

    /// Remove the declaration a token stands for, if present with that value
    pub fn remove_token(&mut self, token: &str, codec: &dyn UtilityCodec) -> bool {
        match codec.decode(token) {
            Some((key, value)) if self.utilities.get(&key) == Some(&value) => {
                self.utilities.remove(&key);
                true
            }
            Some(_) => false,
            None => self.remove(&DeclarationKey::Opaque(token.to_string())),
        }
    }

    /// Serialize to a class-list string
    pub fn to_text(&self, codec: &dyn UtilityCodec) -> String {
        let mut tokens: Vec<String> = self
            .utilities
            .iter()
            .map(|(key, value)| codec.encode(key, value))
            .collect();
        tokens.extend(self.opaque.iter().cloned());
        tokens.join(" ")
    }

    pub fn get(&self, key: &UtilityKey) -> Option<&StyleValue> {
        self.utilities.get(key)
    }

    /// Set a utility value, returning the one it replaced
    pub fn set(&mut self, key: UtilityKey, value: StyleValue) -> Option<StyleValue> {
        self.utilities.insert(key, value)
    }

    pub fn remove(&mut self, key: &DeclarationKey) -> bool {
        match key {
            DeclarationKey::Utility(key) => self.utilities.remove(key).is_some(),
            DeclarationKey::Opaque(token) => {
                let before = self.opaque.len();
                self.opaque.retain(|existing| existing != token);
                self.opaque.len() != before
            }
        }
    }

    pub fn contains(&self, key: &DeclarationKey) -> bool {
        match key {
            DeclarationKey::Utility(key) => self.utilities.contains_key(key),
            DeclarationKey::Opaque(token) => self.opaque.iter().any(|existing| existing == token),
        }
    }

    /// Declarations in serialization order
    pub fn declarations(&self) -> impl Iterator<Item = StyleDeclaration<'_>> {
        self.utilities
            .iter()
            .map(|(key, value)| StyleDeclaration::Utility(key, value))
            .chain(self.opaque.iter().map(|token| StyleDeclaration::Opaque(token)))
    }

    pub fn len(&self) -> usize {
        self.utilities.len() + self.opaque.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty() && self.opaque.is_empty()
    }

    pub fn clear(&mut self) {
        self.utilities.clear();
        self.opaque.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TailwindCodec;
    use crate::property::Property;

    #[test]
    fn test_canonical_order() {
        let style = Style::from_text("text-sm btn p-4 hover:bg-blue-600 flex bg-blue-500 js-hook", &TailwindCodec);
        assert_eq!(
            style.to_text(&TailwindCodec),
            "flex p-4 text-sm bg-blue-500 hover:bg-blue-600 btn js-hook"
        );
    }

    #[test]
    fn test_last_value_wins() {
        let style = Style::from_text("p-2 m-1 p-4", &TailwindCodec);
        assert_eq!(style.len(), 2);
        assert_eq!(style.get(&UtilityKey::new(Property::Padding)), Some(&StyleValue::new("4")));
    }

    #[test]
    fn test_apply_token_replaces() {
        let mut style = Style::from_text("p-2 md:p-6", &TailwindCodec);
        let key = style.apply_token("p-8", &TailwindCodec);
        assert_eq!(key, DeclarationKey::Utility(UtilityKey::new(Property::Padding)));
        assert_eq!(style.to_text(&TailwindCodec), "p-8 md:p-6");
    }

    #[test]
    fn test_load_replaces_everything() {
        let mut style = Style::from_text("p-2 custom", &TailwindCodec);
        style.load_from_text("m-2", &TailwindCodec);
        assert_eq!(style.to_text(&TailwindCodec), "m-2");
    }

    #[test]
    fn test_remove_token() {
        let mut style = Style::from_text("p-2 custom flex", &TailwindCodec);
        assert!(!style.remove_token("p-4", &TailwindCodec));
        assert!(style.remove_token("p-2", &TailwindCodec));
        assert!(style.remove_token("custom", &TailwindCodec));
        assert!(!style.remove_token("custom", &TailwindCodec));
        assert_eq!(style.to_text(&TailwindCodec), "flex");
    }

    #[test]
    fn test_empty_text() {
        let style = Style::from_text("  \n\t ", &TailwindCodec);
        assert!(style.is_empty());
        assert_eq!(style.to_text(&TailwindCodec), "");
    }

    #[test]
    fn test_declarations_view() {
        let style = Style::from_text("zz p-1", &TailwindCodec);
        let declarations: Vec<_> = style.declarations().collect();
        assert_eq!(declarations.len(), 2);
        assert!(matches!(declarations[0], StyleDeclaration::Utility(key, _) if key.property == Property::Padding));
        assert_eq!(declarations[1], StyleDeclaration::Opaque("zz"));
    }
}
