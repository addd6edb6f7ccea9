//! Style model for utility-class attributes.
//!
//! A [`Style`] is the structured form of a class list such as
//! `"flex md:p-4 text-gray-700"`. Tokens are decoded through a
//! [`UtilityCodec`]; anything the codec does not recognize is kept verbatim.

pub mod codec;
pub mod property;
pub mod style;

pub use codec::{split_variants, StyleValue, TailwindCodec, UtilityCodec, UtilityKey};
pub use property::{Property, DEFAULT};
pub use style::{DeclarationKey, Style, StyleDeclaration};
