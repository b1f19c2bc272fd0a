//! # scipgen-codegen
//!
//! Class-graph resolution and code emission for the scipgen binding
//! generator.
//!
//! This crate provides:
//! - The type classifier and discriminated-union resolver
//! - The worklist engine converting referenced types into renderable classes
//! - Kotlin, Java and C# emitters over a backend-agnostic IR
//! - Diagnostics with source-annotated reporting

pub mod classify;
pub mod diagnostics;
pub mod emitters;
pub mod error;
pub mod format;
pub mod ir;
pub mod keywords;
pub mod options;
pub mod printer;
pub mod resolve;
pub mod unions;

pub use diagnostics::{Diagnostic, Reporter, Severity};
pub use error::CodegenError;
pub use options::{CodegenOptions, ProtocolTables, TargetLanguage, UnionMode};
pub use resolve::Codegen;

use scipgen_scip::SymbolTable;

/// Runs one full generation over a loaded symbol table.
///
/// # Errors
/// Returns `CodegenError` on any hard failure; recoverable conditions are
/// recorded on the reporter instead.
pub fn generate(
    options: &CodegenOptions,
    tables: &ProtocolTables,
    symtab: &SymbolTable,
    reporter: &mut Reporter,
) -> Result<(), CodegenError> {
    Codegen::new(options, tables, symtab, reporter).run()
}
