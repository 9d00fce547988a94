//! Item kinds as encoded in the `t` column and in `p` entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a documented item.
///
/// The discriminants follow rustdoc's `ItemType` numbering. Codes this crate does
/// not know about are preserved in [`ItemKind::Other`] so re-encoding is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ItemKind {
    Module,
    ExternCrate,
    Import,
    Struct,
    Enum,
    Function,
    TypeAlias,
    Static,
    Trait,
    Impl,
    TyMethod,
    Method,
    StructField,
    Variant,
    Macro,
    Primitive,
    AssocType,
    Constant,
    AssocConst,
    Union,
    ForeignType,
    Keyword,
    OpaqueTy,
    ProcAttribute,
    ProcDerive,
    TraitAlias,
    Other(u8),
}

const KNOWN: [ItemKind; 26] = [
    ItemKind::Module,
    ItemKind::ExternCrate,
    ItemKind::Import,
    ItemKind::Struct,
    ItemKind::Enum,
    ItemKind::Function,
    ItemKind::TypeAlias,
    ItemKind::Static,
    ItemKind::Trait,
    ItemKind::Impl,
    ItemKind::TyMethod,
    ItemKind::Method,
    ItemKind::StructField,
    ItemKind::Variant,
    ItemKind::Macro,
    ItemKind::Primitive,
    ItemKind::AssocType,
    ItemKind::Constant,
    ItemKind::AssocConst,
    ItemKind::Union,
    ItemKind::ForeignType,
    ItemKind::Keyword,
    ItemKind::OpaqueTy,
    ItemKind::ProcAttribute,
    ItemKind::ProcDerive,
    ItemKind::TraitAlias,
];

impl ItemKind {
    pub fn from_code(code: u8) -> Self {
        KNOWN
            .get(usize::from(code))
            .copied()
            .unwrap_or(Self::Other(code))
    }

    /// The raw integer this kind is stored as.
    pub fn code(self) -> u8 {
        match self {
            Self::Other(code) => code,
            known => KNOWN
                .iter()
                .position(|k| *k == known)
                .and_then(|pos| u8::try_from(pos).ok())
                .unwrap_or(u8::MAX),
        }
    }

    /// Short label in rustdoc's vocabulary (`struct`, `fn`, `method`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "mod",
            Self::ExternCrate => "externcrate",
            Self::Import => "import",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Function => "fn",
            Self::TypeAlias => "type",
            Self::Static => "static",
            Self::Trait => "trait",
            Self::Impl => "impl",
            Self::TyMethod => "tymethod",
            Self::Method => "method",
            Self::StructField => "structfield",
            Self::Variant => "variant",
            Self::Macro => "macro",
            Self::Primitive => "primitive",
            Self::AssocType => "associatedtype",
            Self::Constant => "constant",
            Self::AssocConst => "associatedconstant",
            Self::Union => "union",
            Self::ForeignType => "foreigntype",
            Self::Keyword => "keyword",
            Self::OpaqueTy => "opaque",
            Self::ProcAttribute => "attr",
            Self::ProcDerive => "derive",
            Self::TraitAlias => "traitalias",
            Self::Other(_) => "item",
        }
    }

    /// Parses a user-supplied kind filter such as `struct`, `fn` or `method`.
    pub fn parse_filter(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "module" => return Some(Self::Module),
            "function" => return Some(Self::Function),
            "field" => return Some(Self::StructField),
            "const" => return Some(Self::Constant),
            _ => {}
        }
        KNOWN.iter().copied().find(|k| k.as_str() == lower)
    }

    /// Whether items of this kind are defined on a parent type.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            Self::TyMethod
                | Self::Method
                | Self::StructField
                | Self::Variant
                | Self::AssocType
                | Self::AssocConst
        )
    }
}

impl From<u8> for ItemKind {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl From<ItemKind> for u8 {
    fn from(kind: ItemKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "item({code})"),
            known => f.write_str(known.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(0, ItemKind::Module)]
    #[case(3, ItemKind::Struct)]
    #[case(5, ItemKind::Function)]
    #[case(8, ItemKind::Trait)]
    #[case(10, ItemKind::TyMethod)]
    #[case(11, ItemKind::Method)]
    #[case(12, ItemKind::StructField)]
    #[case(25, ItemKind::TraitAlias)]
    fn known_codes(#[case] code: u8, #[case] expected: ItemKind) {
        check!(ItemKind::from_code(code) == expected);
        check!(expected.code() == code);
    }

    #[test]
    fn unknown_codes_survive() {
        let kind = ItemKind::from_code(200);
        check!(kind == ItemKind::Other(200));
        check!(kind.code() == 200);
        check!(kind.to_string() == "item(200)");
    }

    #[rstest]
    #[case("struct", Some(ItemKind::Struct))]
    #[case("FN", Some(ItemKind::Function))]
    #[case("function", Some(ItemKind::Function))]
    #[case("method", Some(ItemKind::Method))]
    #[case("field", Some(ItemKind::StructField))]
    #[case("gadget", None)]
    fn filters(#[case] input: &str, #[case] expected: Option<ItemKind>) {
        check!(ItemKind::parse_filter(input) == expected);
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&[ItemKind::Struct, ItemKind::Other(99)]).unwrap();
        check!(json == "[3,99]");
        let back: Vec<ItemKind> = serde_json::from_str(&json).unwrap();
        check!(back == vec![ItemKind::Struct, ItemKind::Other(99)]);
    }
}
