//! Error types for index decoding and symbol resolution.

use thiserror::Error;

/// Error type for decoding a serialized SCIP index.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input ended before a complete value could be read.
    #[error("truncated input: needed {needed} more bytes at offset {offset}")]
    Truncated {
        /// Byte offset where the read started.
        offset: usize,
        /// Number of missing bytes.
        needed: usize,
    },

    /// A varint ran past the maximum encodable width.
    #[error("varint overflow at offset {offset}")]
    VarintOverflow {
        /// Byte offset of the offending varint.
        offset: usize,
    },

    /// A field carried a wire type the decoder cannot handle.
    #[error("invalid wire type {wire_type} for field {field_number} in message '{message}'")]
    InvalidWireType {
        /// Enclosing message name.
        message: &'static str,
        /// Protobuf field number.
        field_number: u32,
        /// Wire type bits of the offending tag.
        wire_type: u8,
    },

    /// A string field was not valid UTF-8.
    #[error("invalid UTF-8 in field {field_number} of message '{message}'")]
    InvalidUtf8 {
        /// Enclosing message name.
        message: &'static str,
        /// Protobuf field number.
        field_number: u32,
    },

    /// A required sub-message was absent.
    #[error("missing field '{field}' in message '{message}'")]
    MissingField {
        /// Enclosing message name.
        message: &'static str,
        /// Name of the absent field.
        field: &'static str,
    },

    /// IO error while reading the index file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for symbol parsing and symbol table lookups.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// A symbol string does not match the SCIP symbol grammar.
    #[error("malformed symbol '{symbol}': expected '<scheme> <manager> <name> <version> <descriptor>'")]
    Malformed {
        /// The offending symbol string.
        symbol: String,
    },

    /// Lookup of a symbol that is not registered in the table.
    #[error("unknown symbol '{symbol}' (recently visited: {})", .recently_visited.join(", "))]
    UnknownSymbol {
        /// The symbol that failed to resolve.
        symbol: String,
        /// Trail of symbols visited before the failure, most recent last.
        recently_visited: Vec<String>,
    },

    /// A symbol was expected to be a type alias over a structural type.
    #[error("symbol '{symbol}' is not a type alias with a structural lower bound")]
    NotStructuralAlias {
        /// The offending symbol.
        symbol: String,
    },
}
