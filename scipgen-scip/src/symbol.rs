//! SCIP symbol grammar.
//!
//! A non-local symbol has the five space-separated parts
//! `<scheme> <manager> <package-name> <version> <descriptor>`, where the
//! descriptor may itself contain spaces (inside backtick-escaped path
//! segments). Local symbols use the form `local <id>` and never appear in the
//! symbol table.

use crate::error::SymbolError;

/// Prefix of function-scoped symbols.
const LOCAL_PREFIX: &str = "local ";

/// A symbol split into its grammar parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSymbol<'a> {
    /// Indexer scheme, e.g. `scip-typescript`.
    pub scheme: &'a str,
    /// Package manager, e.g. `npm`.
    pub manager: &'a str,
    /// Package name.
    pub package_name: &'a str,
    /// Package version, `.` when unversioned.
    pub version: &'a str,
    /// Remaining descriptor chain.
    pub descriptor: &'a str,
}

impl ParsedSymbol<'_> {
    /// The version-agnostic form of this symbol: package name plus
    /// descriptor, with the indexer scheme, manager and version stripped.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{} {}", self.package_name, self.descriptor)
    }
}

/// Whether a symbol is function-scoped and must be excluded from the table.
#[must_use]
pub fn is_local_symbol(symbol: &str) -> bool {
    symbol.starts_with(LOCAL_PREFIX)
}

/// Parses a non-local symbol. Fails fast on anything that does not match the
/// five-part grammar; schema-evolution surprises are better caught at load
/// time than at resolution time.
pub fn parse_symbol(symbol: &str) -> Result<ParsedSymbol<'_>, SymbolError> {
    let malformed = || SymbolError::Malformed {
        symbol: symbol.to_string(),
    };
    let mut parts = symbol.splitn(5, ' ');
    let scheme = parts.next().filter(|part| !part.is_empty()).ok_or_else(malformed)?;
    let manager = parts.next().filter(|part| !part.is_empty()).ok_or_else(malformed)?;
    let package_name = parts.next().filter(|part| !part.is_empty()).ok_or_else(malformed)?;
    let version = parts.next().filter(|part| !part.is_empty()).ok_or_else(malformed)?;
    let descriptor = parts.next().filter(|part| !part.is_empty()).ok_or_else(malformed)?;
    Ok(ParsedSymbol {
        scheme,
        manager,
        package_name,
        version,
        descriptor,
    })
}

/// Shorthand for [`ParsedSymbol::canonical`] on a raw symbol string.
pub fn canonical_symbol_form(symbol: &str) -> Result<String, SymbolError> {
    Ok(parse_symbol(symbol)?.canonical())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol() {
        let symbol = "scip-typescript npm cody-ai 1.34.0 src/jsonrpc/`agent-protocol.ts`/ClientRequests#";
        let parsed = parse_symbol(symbol).expect("valid symbol");
        assert_eq!(parsed.scheme, "scip-typescript");
        assert_eq!(parsed.manager, "npm");
        assert_eq!(parsed.package_name, "cody-ai");
        assert_eq!(parsed.version, "1.34.0");
        assert_eq!(
            parsed.descriptor,
            "src/jsonrpc/`agent-protocol.ts`/ClientRequests#"
        );
    }

    #[test]
    fn test_canonical_strips_scheme_and_version() {
        let symbol = "scip-typescript npm cody-ai 1.34.0 src/`protocol.ts`/Foo#";
        assert_eq!(
            canonical_symbol_form(symbol).expect("valid symbol"),
            "cody-ai src/`protocol.ts`/Foo#"
        );
    }

    #[test]
    fn test_descriptor_may_contain_spaces() {
        let symbol = "scip-typescript npm pkg 1.0.0 src/`my file.ts`/Foo#";
        let parsed = parse_symbol(symbol).expect("valid symbol");
        assert_eq!(parsed.descriptor, "src/`my file.ts`/Foo#");
    }

    #[test]
    fn test_malformed_symbol_fails_fast() {
        for bad in ["", "only three parts here", "a b c d", "  leading blank"] {
            assert!(parse_symbol(bad).is_err(), "expected failure for {bad:?}");
        }
    }

    #[test]
    fn test_local_symbols_detected() {
        assert!(is_local_symbol("local 42"));
        assert!(!is_local_symbol(
            "scip-typescript npm pkg 1.0.0 src/`a.ts`/Foo#"
        ));
    }
}
