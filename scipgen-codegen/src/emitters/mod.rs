//! Per-backend emitters.
//!
//! Emitters are pure string templating over the resolved IR; they hold no
//! resolution state beyond formatting rules.

mod csharp;
mod java;
mod kotlin;

pub use csharp::CSharpEmitter;
pub use java::JavaEmitter;
pub use kotlin::KotlinEmitter;

use crate::ir::{ConstantField, ProtocolInterface, RenderedType};
use crate::options::{CodegenOptions, TargetLanguage};

/// One target-language renderer.
pub trait Emitter {
    /// Generated file extension, without the dot.
    fn file_extension(&self) -> &'static str;

    /// File name for a generated type.
    fn type_file_name(&self, type_name: &str) -> String;

    /// The null/void sentinel type file.
    fn render_null_alias(&self) -> String;

    /// The shared string-literal constants file.
    fn render_constants(&self, constants: &[ConstantField]) -> String;

    /// The shared serialization-adapter registration file.
    fn render_adapters(&self, union_names: &[String]) -> String;

    /// An RPC interface file.
    fn render_protocol_interface(&self, interface: &ProtocolInterface) -> String;

    /// A resolved type's file.
    fn render_type(&self, type_name: &str, body: &RenderedType) -> String;
}

/// Creates the emitter for the selected backend.
#[must_use]
pub fn emitter_for(options: &CodegenOptions) -> Box<dyn Emitter> {
    let package = options.kotlin_package.clone();
    match options.language {
        TargetLanguage::Kotlin => Box::new(KotlinEmitter::new(package)),
        TargetLanguage::Java => Box::new(JavaEmitter::new(package)),
        TargetLanguage::CSharp => Box::new(CSharpEmitter::new(package)),
    }
}
