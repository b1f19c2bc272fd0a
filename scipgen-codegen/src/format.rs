//! Naming and type-syntax policy shared by all backends.
//!
//! One formatter serves the three target languages; everything
//! language-specific is a data difference (separators, keyword sets, map and
//! list syntax), not an algorithm difference.

use scipgen_scip::{Signature, SymbolInformation, Type};

use crate::classify::Classifier;
use crate::error::CodegenError;
use crate::keywords::{Keyword, is_null_undefined_or_unknown_symbol, is_nullish_symbol};
use crate::options::{ProtocolTables, TargetLanguage};
use crate::unions::{DiscriminatedUnion, DiscriminatedUnionMember};

/// Whether a type appears in parameter or result position. Decides the
/// suffix of synthesized anonymous type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePosition {
    /// RPC parameter position.
    Parameter,
    /// RPC result position.
    Result,
}

impl TypePosition {
    /// Suffix for synthesized type names.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Parameter => "Params",
            Self::Result => "Result",
        }
    }

    /// Tag used in synthesized symbol identities.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parameter => "parameter",
            Self::Result => "result",
        }
    }
}

const KOTLIN_KEYWORDS: &[&str] = &[
    "class",
    "interface",
    "object",
    "package",
    "typealias",
    "val",
    "var",
    "fun",
    "when",
];

const JAVA_KEYWORDS: &[&str] = &[
    "class",
    "interface",
    "object",
    "package",
    "var",
    "default",
    "case",
    "switch",
    "native",
];

/// Capitalizes the first ASCII character.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Naming and type-syntax rules for one target language.
#[derive(Clone, Copy)]
pub struct Formatter<'a> {
    language: TargetLanguage,
    classifier: Classifier<'a>,
}

impl<'a> Formatter<'a> {
    /// Creates a formatter for the given language.
    #[must_use]
    pub fn new(language: TargetLanguage, classifier: Classifier<'a>) -> Self {
        Self {
            language,
            classifier,
        }
    }

    fn tables(&self) -> &'a ProtocolTables {
        self.classifier.tables
    }

    /// The generated method name for an RPC method, derived from its wire
    /// name (e.g. `textDocument/didOpen`).
    #[must_use]
    pub fn function_name(&self, info: &SymbolInformation) -> String {
        let stripped = info.display_name.replace("$/", "");
        match self.language {
            TargetLanguage::Kotlin | TargetLanguage::Java => stripped.replace('/', "_"),
            TargetLanguage::CSharp => stripped.split('/').map(capitalize).collect(),
        }
    }

    /// The generated type name for a declaration.
    #[must_use]
    pub fn type_name(&self, info: &SymbolInformation) -> String {
        if info.display_name == "URI" {
            return "Uri".to_string();
        }
        let separator = match self.language {
            TargetLanguage::Kotlin | TargetLanguage::Java => "_",
            TargetLanguage::CSharp => "",
        };
        info.display_name
            .replace("$/", "")
            .split('/')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// The null/void sentinel type name.
    #[must_use]
    pub fn void_type(&self) -> &'static str {
        match self.language {
            TargetLanguage::Kotlin | TargetLanguage::Java => "Null",
            TargetLanguage::CSharp => "Void",
        }
    }

    /// Extracts an RPC method's parameter type and renders the parameter
    /// list syntax.
    pub fn jsonrpc_method_parameter(
        &self,
        method: &SymbolInformation,
    ) -> Result<(Type, String), CodegenError> {
        let Some(Signature::Value(value)) = &method.signature else {
            return Err(CodegenError::NotValueSignature {
                symbol: method.symbol.clone(),
            });
        };
        let Type::Ref(type_ref) = &value.tpe else {
            return Err(CodegenError::MissingParameter {
                symbol: method.symbol.clone(),
            });
        };
        let parameter_type =
            type_ref
                .type_arguments
                .first()
                .ok_or_else(|| CodegenError::MissingParameter {
                    symbol: method.symbol.clone(),
                })?;
        let syntax = self.jsonrpc_type_name(method, parameter_type, TypePosition::Parameter)?;
        let parameter_syntax = match self.language {
            TargetLanguage::Kotlin => format!("params: {syntax}"),
            TargetLanguage::Java | TargetLanguage::CSharp => format!("{syntax} params"),
        };
        Ok((parameter_type.clone(), parameter_syntax))
    }

    /// Whether a type admits the null value: a `null`/`undefined` keyword
    /// reference, or a union with a nullable arm.
    #[must_use]
    pub fn is_nullable(&self, tpe: &Type) -> bool {
        match tpe {
            Type::Ref(type_ref) => is_nullish_symbol(&type_ref.symbol),
            Type::Union(union) => {
                union.types.len() >= 2 && union.types.iter().any(|arm| self.is_nullable(arm))
            }
            _ => false,
        }
    }

    /// Nullability marker appended to type syntax, where the language has
    /// one.
    #[must_use]
    pub fn nullable_syntax(&self, tpe: &Type) -> &'static str {
        if self.language == TargetLanguage::Kotlin && self.is_nullable(tpe) {
            "?"
        } else {
            ""
        }
    }

    /// The full type syntax for a type in the given position, nullability
    /// marker included.
    pub fn jsonrpc_type_name(
        &self,
        method: &SymbolInformation,
        tpe: &Type,
        position: TypePosition,
    ) -> Result<String, CodegenError> {
        Ok(format!(
            "{}{}",
            self.non_nullable_type_name(method, tpe, position)?,
            self.nullable_syntax(tpe)
        ))
    }

    /// The type syntax without any nullability marker.
    pub fn non_nullable_type_name(
        &self,
        method: &SymbolInformation,
        tpe: &Type,
        position: TypePosition,
    ) -> Result<String, CodegenError> {
        match tpe {
            Type::Ref(type_ref) => {
                if self.tables().is_record(&type_ref.symbol) {
                    let [key, value] = type_ref.type_arguments.as_slice() else {
                        return Err(CodegenError::RecordArity {
                            symbol: type_ref.symbol.clone(),
                            type_arguments: type_ref.type_arguments.len(),
                        });
                    };
                    let key = self.jsonrpc_type_name(method, key, position)?;
                    let value = self.jsonrpc_type_name(method, value, position)?;
                    return Ok(self.map_syntax(&key, &value));
                }
                match Keyword::from_symbol(&type_ref.symbol) {
                    Some(Keyword::List) => {
                        let element = type_ref.type_arguments.first().ok_or_else(|| {
                            CodegenError::MissingTypeArgument {
                                symbol: type_ref.symbol.clone(),
                            }
                        })?;
                        let element = self.jsonrpc_type_name(method, element, position)?;
                        Ok(self.list_syntax(&element))
                    }
                    Some(keyword) => Ok(keyword.syntax(self.language).to_string()),
                    None => Ok(self.type_name(self.classifier.symtab.info(&type_ref.symbol)?)),
                }
            }
            Type::Constant(constant_type) => match &constant_type.constant {
                scipgen_scip::Constant::String(_) => Ok("String".to_string()),
                scipgen_scip::Constant::Int(_) => Ok("Long".to_string()),
                other => Err(CodegenError::NoSyntax {
                    symbol: method.symbol.clone(),
                    detail: format!("constant type {other:?}"),
                }),
            },
            Type::Structural(_) | Type::Intersection(_) => {
                Ok(format!("{}{}", self.type_name(method), position.suffix()))
            }
            Type::Union(union) => {
                let non_nullable: Vec<&Type> = union
                    .types
                    .iter()
                    .filter(|arm| !self.is_nullable(arm))
                    .collect();
                if non_nullable.is_empty() {
                    return Ok(self.void_type().to_string());
                }
                if let [only] = non_nullable.as_slice() {
                    return self.non_nullable_type_name(method, only, position);
                }
                let mut all_string = true;
                for arm in &non_nullable {
                    if !self.classifier.is_string_type(arm)? {
                        all_string = false;
                        break;
                    }
                }
                if all_string {
                    return Ok("String".to_string());
                }
                let non_null: Vec<&Type> = union
                    .types
                    .iter()
                    .filter(|arm| !is_null_undefined_or_unknown_type(arm))
                    .collect();
                if let [only] = non_null.as_slice() {
                    return self.jsonrpc_type_name(method, only, position);
                }
                if let Some(index) = self.tables().union_exception_index(&method.symbol) {
                    let arm = non_null
                        .get(index)
                        .ok_or_else(|| CodegenError::MissingTypeArgument {
                            symbol: method.symbol.clone(),
                        })?;
                    return self.jsonrpc_type_name(method, arm, position);
                }
                Err(CodegenError::NoSyntax {
                    symbol: method.symbol.clone(),
                    detail: format!("union of {} arms", union.types.len()),
                })
            }
            Type::Lambda => Err(CodegenError::NoSyntax {
                symbol: method.symbol.clone(),
                detail: "lambda type".to_string(),
            }),
        }
    }

    /// Escapes a wire property name into a legal field identifier.
    #[must_use]
    pub fn format_field_name(&self, name: &str) -> String {
        let escaped = name.replacen(':', "_", 1).replacen('/', "_", 1);
        match self.language {
            TargetLanguage::Kotlin => {
                let is_keyword = KOTLIN_KEYWORDS.contains(&escaped.as_str());
                let needs_backtick = is_keyword
                    || !escaped
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_');
                if needs_backtick {
                    format!("`{escaped}`")
                } else {
                    escaped
                }
            }
            TargetLanguage::Java => {
                if JAVA_KEYWORDS.contains(&escaped.as_str()) {
                    return format!("{escaped}_");
                }
                escaped
                    .chars()
                    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                    .collect()
            }
            TargetLanguage::CSharp => collapse_non_alphanumeric(&escaped, '_')
                .split('_')
                .map(capitalize)
                .collect(),
        }
    }

    /// The nested enum type name for a field with a closed literal set.
    #[must_use]
    pub fn enum_type_name(&self, name: &str) -> String {
        format!("{}Enum", capitalize(name))
    }

    /// The generated subtype name for one discriminated-union member.
    pub fn discriminated_union_type_name(
        &self,
        union: &DiscriminatedUnion,
        member: &DiscriminatedUnionMember,
    ) -> Result<String, CodegenError> {
        if let Type::Ref(type_ref) = &member.tpe {
            return Ok(self
                .classifier
                .symtab
                .info(&type_ref.symbol)?
                .display_name
                .clone());
        }
        let union_name = &self.classifier.symtab.info(&union.symbol)?.display_name;
        Ok(capitalize(&self.format_field_name(&format!(
            "{}{union_name}",
            member.value.raw()
        ))))
    }

    /// Whether a member type is excluded from generated classes.
    #[must_use]
    pub fn is_ignored_type(&self, tpe: &Type) -> bool {
        match tpe {
            Type::Ref(type_ref) => self
                .tables()
                .ignored_type_refs
                .iter()
                .any(|matcher| type_ref.symbol.contains(matcher)),
            Type::Union(union) => {
                let non_nullable: Vec<&Type> = union
                    .types
                    .iter()
                    .filter(|arm| !self.is_nullable(arm))
                    .collect();
                match non_nullable.as_slice() {
                    [only] => self.is_ignored_type(only),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Whether a declaration is excluded from generation entirely.
    #[must_use]
    pub fn is_ignored_info(&self, info: &SymbolInformation) -> bool {
        self.tables()
            .ignored_infos
            .iter()
            .any(|matcher| info.symbol.contains(matcher))
    }

    fn map_syntax(&self, key: &str, value: &str) -> String {
        match self.language {
            TargetLanguage::Kotlin => format!("Map<{key}, {value}>"),
            TargetLanguage::Java => format!("java.util.Map<{key}, {value}>"),
            TargetLanguage::CSharp => format!("Dictionary<{key}, {value}>"),
        }
    }

    fn list_syntax(&self, element: &str) -> String {
        match self.language {
            TargetLanguage::Kotlin => format!("List<{element}>"),
            TargetLanguage::Java => format!("java.util.List<{element}>"),
            TargetLanguage::CSharp => format!("{element}[]"),
        }
    }
}

/// Replaces runs of non-alphanumeric characters with a single `replacer` and
/// trims it from both ends.
fn collapse_non_alphanumeric(name: &str, replacer: char) -> String {
    let mut result = String::with_capacity(name.len());
    let mut pending = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending && !result.is_empty() {
                result.push(replacer);
            }
            pending = false;
            result.push(c);
        } else {
            pending = true;
        }
    }
    result
}

/// Whether a type is the `null`, `undefined` or `unknown` keyword.
#[must_use]
pub fn is_null_undefined_or_unknown_type(tpe: &Type) -> bool {
    match tpe {
        Type::Ref(type_ref) => is_null_undefined_or_unknown_symbol(&type_ref.symbol),
        _ => false,
    }
}
