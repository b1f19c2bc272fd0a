//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use scipgen_codegen::{CodegenOptions, Severity, TargetLanguage, UnionMode};

/// Generate Kotlin/Java/C# protocol bindings from a SCIP index.
#[derive(Parser, Debug)]
#[command(name = "scipgen", version, about)]
pub struct Cli {
    /// Path to the SCIP index file.
    #[arg(long, default_value = "index.scip")]
    pub input: PathBuf,

    /// Output directory. Its content is deleted and recreated on every run.
    #[arg(long)]
    pub output: PathBuf,

    /// Target language backend.
    #[arg(long, value_enum, default_value_t = LanguageArg::Kotlin)]
    pub language: LanguageArg,

    /// Protocol identifier. Reserved for future multi-protocol support.
    #[arg(long, default_value = "agent")]
    pub protocol: String,

    /// Diagnostics below this severity are suppressed entirely.
    #[arg(long, value_enum, default_value_t = SeverityArg::Error)]
    pub severity: SeverityArg,

    /// Whether to infer sealed classes for discriminated unions.
    #[arg(long = "discriminated-unions", value_enum, default_value_t = UnionModeArg::Nested)]
    pub discriminated_unions: UnionModeArg,

    /// Package/namespace prefix for all emitted artifacts.
    #[arg(
        long = "kotlin-package",
        default_value = "com.sourcegraph.cody.agent.protocol_generated"
    )]
    pub kotlin_package: String,
}

/// Backend selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    /// Kotlin data classes and sealed classes.
    Kotlin,
    /// Java classes with gson annotations.
    Java,
    /// C# classes.
    Csharp,
}

/// Severity threshold selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    /// Retain warnings and errors.
    Warning,
    /// Retain only errors.
    Error,
}

/// Discriminated-union handling selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnionModeArg {
    /// Always use the property-union merge strategy.
    Flat,
    /// Infer sealed classes where a discriminator exists.
    Nested,
}

impl Cli {
    /// Converts the parsed arguments into engine options.
    #[must_use]
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            output: self.output.clone(),
            language: match self.language {
                LanguageArg::Kotlin => TargetLanguage::Kotlin,
                LanguageArg::Java => TargetLanguage::Java,
                LanguageArg::Csharp => TargetLanguage::CSharp,
            },
            protocol: self.protocol.clone(),
            kotlin_package: self.kotlin_package.clone(),
            union_mode: match self.discriminated_unions {
                UnionModeArg::Flat => UnionMode::Flat,
                UnionModeArg::Nested => UnionMode::Nested,
            },
        }
    }

    /// The diagnostics severity threshold.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self.severity {
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["scipgen", "--output", "out"]);
        assert_eq!(cli.input, PathBuf::from("index.scip"));
        assert_eq!(cli.protocol, "agent");
        let options = cli.codegen_options();
        assert_eq!(options.language, TargetLanguage::Kotlin);
        assert_eq!(options.union_mode, UnionMode::Nested);
        assert_eq!(
            options.kotlin_package,
            "com.sourcegraph.cody.agent.protocol_generated"
        );
        assert_eq!(cli.severity(), Severity::Error);
    }

    #[test]
    fn test_language_and_mode_flags() {
        let cli = Cli::parse_from([
            "scipgen",
            "--output",
            "out",
            "--language",
            "csharp",
            "--discriminated-unions",
            "flat",
            "--severity",
            "warning",
        ]);
        let options = cli.codegen_options();
        assert_eq!(options.language, TargetLanguage::CSharp);
        assert_eq!(options.union_mode, UnionMode::Flat);
        assert_eq!(cli.severity(), Severity::Warning);
    }
}
