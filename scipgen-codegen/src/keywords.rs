//! TypeScript primitive keywords and their synthetic symbols.
//!
//! The indexer encodes primitive keywords (`string`, `number`, ...) as
//! references to synthetic symbols. This module owns the mapping from those
//! symbols to target-language type keywords.

use crate::options::TargetLanguage;

/// Builds the synthetic symbol for a primitive keyword.
#[must_use]
pub fn typescript_keyword(name: &str) -> String {
    format!("scip-typescript npm typescript . {name}#")
}

/// Whether a symbol is the `null` or `undefined` keyword.
#[must_use]
pub fn is_nullish_symbol(symbol: &str) -> bool {
    symbol == typescript_keyword("null") || symbol == typescript_keyword("undefined")
}

/// Whether a symbol is the `null`, `undefined` or `unknown` keyword.
#[must_use]
pub fn is_null_undefined_or_unknown_symbol(symbol: &str) -> bool {
    is_nullish_symbol(symbol) || symbol == typescript_keyword("unknown")
}

/// Target-language keywords that primitive keyword symbols map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Element sequence.
    List,
    /// The null/void sentinel.
    Null,
    /// Character string.
    String,
    /// Boolean.
    Boolean,
    /// Integral number.
    Long,
    /// Arbitrary object.
    Object,
}

impl Keyword {
    /// Maps a synthetic keyword symbol to its keyword, if it is one.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let keyword = |name: &str| symbol == typescript_keyword(name);
        if keyword("array") {
            Some(Self::List)
        } else if keyword("null") || keyword("undefined") || keyword("void") {
            Some(Self::Null)
        } else if keyword("string") {
            Some(Self::String)
        } else if keyword("boolean") || keyword("true") || keyword("false") {
            Some(Self::Boolean)
        } else if keyword("number") || keyword("bigint") {
            Some(Self::Long)
        } else if keyword("any") || keyword("object") || keyword("unknown") {
            Some(Self::Object)
        } else {
            None
        }
    }

    /// The keyword's syntax in the given target language.
    #[must_use]
    pub fn syntax(self, language: TargetLanguage) -> &'static str {
        match (language, self) {
            (TargetLanguage::Kotlin, Self::Null) => "Null",
            (TargetLanguage::Kotlin, Self::Object) => "Any",
            (TargetLanguage::CSharp, Self::Null) => "Void",
            (TargetLanguage::CSharp, Self::Boolean) => "bool",
            (TargetLanguage::CSharp, Self::String) => "string",
            (TargetLanguage::CSharp, Self::Long) => "int",
            (_, Self::List) => "List",
            (_, Self::Null) => "Null",
            (_, Self::String) => "String",
            (_, Self::Boolean) => "Boolean",
            (_, Self::Long) => "Long",
            (_, Self::Object) => "Object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_symbols_round_trip() {
        assert_eq!(
            Keyword::from_symbol(&typescript_keyword("string")),
            Some(Keyword::String)
        );
        assert_eq!(
            Keyword::from_symbol(&typescript_keyword("array")),
            Some(Keyword::List)
        );
        assert_eq!(
            Keyword::from_symbol(&typescript_keyword("undefined")),
            Some(Keyword::Null)
        );
        assert_eq!(
            Keyword::from_symbol("scip-typescript npm pkg 1.0.0 src/`a.ts`/Foo#"),
            None
        );
    }

    #[test]
    fn test_nullish_classification() {
        assert!(is_nullish_symbol(&typescript_keyword("null")));
        assert!(is_nullish_symbol(&typescript_keyword("undefined")));
        assert!(!is_nullish_symbol(&typescript_keyword("unknown")));
        assert!(is_null_undefined_or_unknown_symbol(&typescript_keyword(
            "unknown"
        )));
    }

    #[test]
    fn test_language_overrides() {
        assert_eq!(Keyword::Object.syntax(TargetLanguage::Kotlin), "Any");
        assert_eq!(Keyword::Object.syntax(TargetLanguage::Java), "Object");
        assert_eq!(Keyword::String.syntax(TargetLanguage::CSharp), "string");
        assert_eq!(Keyword::Long.syntax(TargetLanguage::CSharp), "int");
        assert_eq!(Keyword::Null.syntax(TargetLanguage::CSharp), "Void");
    }
}
