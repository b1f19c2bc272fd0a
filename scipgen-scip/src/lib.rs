//! # scipgen-scip
//!
//! Front-end for the scipgen binding generator.
//!
//! This crate provides:
//! - The SCIP index data model (documents, symbols, signatures, types)
//! - A wire codec for the protobuf-encoded index format
//! - Symbol grammar parsing and canonicalization
//! - The read-only [`SymbolTable`] shared by the code generators

pub mod error;
pub mod index;
pub mod symbol;
pub mod symtab;
pub mod wire;

pub use error::{DecodeError, SymbolError};
pub use index::{
    ClassSignature, Constant, ConstantType, Document, Index, IntersectionType, Kind, Metadata,
    MethodSignature, Occurrence, Scope, Signature, StructuralType, SymbolInformation, ToolInfo,
    Type, TypeRef, TypeSignature, UnionType, ValueSignature,
};
pub use symbol::{ParsedSymbol, canonical_symbol_form, is_local_symbol, parse_symbol};
pub use symtab::SymbolTable;
