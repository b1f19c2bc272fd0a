//! Error types for class-graph resolution and emission.
//!
//! Hard failures abort the run: they represent genuinely unanticipated input
//! shapes and are treated as schema-evolution-level bugs, not recoverable
//! runtime conditions. Recoverable conditions go through the
//! [`Reporter`](crate::diagnostics::Reporter) instead.

use thiserror::Error;

use scipgen_scip::SymbolError;

/// Error type for code generation.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Symbol parsing or lookup failure.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// IO error while writing generated files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record/map reference without exactly two type arguments.
    #[error("record type '{symbol}' must have 2 type arguments, found {type_arguments}")]
    RecordArity {
        /// The record symbol.
        symbol: String,
        /// Number of type arguments found.
        type_arguments: usize,
    },

    /// A generic reference missing an expected type argument.
    #[error("missing type argument on reference to '{symbol}'")]
    MissingTypeArgument {
        /// The referenced symbol.
        symbol: String,
    },

    /// A multi-arm union with no entry in the exception table.
    #[error(
        "unsupported union type at '{symbol}'. To fix this problem, add an entry \
         to the union exception table that picks one of the union arms"
    )]
    UnsupportedUnion {
        /// Symbol of the enclosing method or property.
        symbol: String,
    },

    /// A type shape with no handling branch.
    #[error("unsupported type at '{symbol}': {shape}")]
    UnsupportedType {
        /// Symbol of the enclosing method or property.
        symbol: String,
        /// Description of the unhandled shape.
        shape: &'static str,
    },

    /// A member whose signature is not a value signature where one was
    /// expected.
    #[error("not a value signature: '{symbol}'")]
    NotValueSignature {
        /// The offending member symbol.
        symbol: String,
    },

    /// A request method without the expected `[Params, Result]` reference
    /// shape.
    #[error("method '{symbol}' does not have a parameter list type")]
    MissingParameter {
        /// The offending method symbol.
        symbol: String,
    },

    /// A declaration whose signature shape has no classification.
    #[error("unknown info: '{symbol}'")]
    UnknownInfo {
        /// The offending symbol.
        symbol: String,
    },

    /// No target-language syntax exists for a type.
    #[error("no syntax for type at '{symbol}': {detail}")]
    NoSyntax {
        /// Symbol of the enclosing method or property.
        symbol: String,
        /// Description of the unrepresentable type.
        detail: String,
    },
}
