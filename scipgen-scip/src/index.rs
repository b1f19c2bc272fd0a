//! Data model for the consumed subset of a SCIP index.
//!
//! The shapes mirror the messages of the SCIP protobuf schema that carry
//! type signatures. Fields this tool never consults (documentation,
//! relationships, diagnostics) are skipped at decode time and do not appear
//! here.

/// Symbol role bit marking a definition occurrence.
pub const SYMBOL_ROLE_DEFINITION: i32 = 0x1;

/// A complete SCIP index: one compilation's worth of documents plus
/// declarations owned by external libraries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    /// Index-level metadata.
    pub metadata: Metadata,
    /// Indexed source documents.
    pub documents: Vec<Document>,
    /// Library declarations not owned by any document.
    pub external_symbols: Vec<SymbolInformation>,
}

/// Index-level metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Protocol version of the producing indexer.
    pub version: i32,
    /// The tool that produced the index.
    pub tool_info: ToolInfo,
    /// URI of the project root, used to resolve diagnostic source excerpts.
    pub project_root: String,
}

/// Identity of the producing indexer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Tool version.
    pub version: String,
    /// Command-line arguments the tool ran with.
    pub arguments: Vec<String>,
}

/// One indexed source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Path relative to the project root.
    pub relative_path: String,
    /// Language identifier (e.g. `typescript`).
    pub language: String,
    /// Symbol occurrences, used to map diagnostics back to source ranges.
    pub occurrences: Vec<Occurrence>,
    /// Symbols declared in this document.
    pub symbols: Vec<SymbolInformation>,
}

/// A single occurrence of a symbol in a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Occurrence {
    /// Half-open source range: `[start_line, start_char, end_line, end_char]`
    /// or `[start_line, start_char, end_char]` for single-line ranges.
    pub range: Vec<i32>,
    /// The occurring symbol.
    pub symbol: String,
    /// Bitset of symbol roles.
    pub symbol_roles: i32,
}

impl Occurrence {
    /// Whether this occurrence is the definition of its symbol.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.symbol_roles & SYMBOL_ROLE_DEFINITION != 0
    }
}

/// Declaration kinds consumed by the generators. Values the decoder does not
/// recognize are preserved as [`Kind::Unrecognized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Kind {
    /// No kind recorded.
    #[default]
    Unspecified,
    /// A class declaration.
    Class,
    /// A constant declaration.
    Constant,
    /// An enum declaration.
    Enum,
    /// A member of an enum.
    EnumMember,
    /// An interface declaration.
    Interface,
    /// A method declaration.
    Method,
    /// A property declaration.
    Property,
    /// A type alias declaration.
    TypeAlias,
    /// A variable declaration.
    Variable,
    /// Any kind this tool has no use for.
    Unrecognized(i32),
}

impl Kind {
    /// Maps a wire value to a kind.
    #[must_use]
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => Self::Unspecified,
            7 => Self::Class,
            8 => Self::Constant,
            11 => Self::Enum,
            12 => Self::EnumMember,
            21 => Self::Interface,
            26 => Self::Method,
            41 => Self::Property,
            52 => Self::TypeAlias,
            61 => Self::Variable,
            other => Self::Unrecognized(other),
        }
    }

    /// Maps a kind back to its wire value.
    #[must_use]
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::Class => 7,
            Self::Constant => 8,
            Self::Enum => 11,
            Self::EnumMember => 12,
            Self::Interface => 21,
            Self::Method => 26,
            Self::Property => 41,
            Self::TypeAlias => 52,
            Self::Variable => 61,
            Self::Unrecognized(other) => other,
        }
    }
}

/// A node in the type graph: one declaration together with its signature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolInformation {
    /// Globally unique symbol string.
    pub symbol: String,
    /// Unqualified display name.
    pub display_name: String,
    /// Declaration kind.
    pub kind: Kind,
    /// The declaration's signature, if the indexer emitted one.
    pub signature: Option<Signature>,
}

impl SymbolInformation {
    /// The sentinel used for "no properties" dead ends.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A synthetic declaration wrapping a bare type as a value signature.
    #[must_use]
    pub fn for_value(symbol: impl Into<String>, display_name: impl Into<String>, tpe: Type) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            kind: Kind::Unspecified,
            signature: Some(Signature::Value(ValueSignature { tpe })),
        }
    }

    /// A synthetic class-like declaration carrying an explicit member list.
    #[must_use]
    pub fn for_class(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        member_symbols: Vec<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            kind: Kind::Unspecified,
            signature: Some(Signature::Class(ClassSignature {
                parents: Vec::new(),
                declarations: Scope {
                    symlinks: member_symbols,
                },
            })),
        }
    }
}

/// A declaration signature.
#[derive(Debug, Clone, PartialEq)]
pub enum Signature {
    /// Interface or class.
    Class(ClassSignature),
    /// Type alias.
    Type(TypeSignature),
    /// Field, property or constant.
    Value(ValueSignature),
    /// Method or function.
    Method(MethodSignature),
}

/// Signature of an interface or class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassSignature {
    /// Extended/implemented parents.
    pub parents: Vec<Type>,
    /// Member declarations, in declaration order.
    pub declarations: Scope,
}

/// Signature of a type alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSignature {
    /// Declared type parameters.
    pub type_parameters: Scope,
    /// The aliased type.
    pub lower_bound: Type,
}

/// Signature of a field or property.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSignature {
    /// The value's type.
    pub tpe: Type,
}

/// Signature of a method or function.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    /// Parameter lists, one scope per list.
    pub parameter_lists: Vec<Scope>,
    /// Return type.
    pub return_type: Option<Type>,
}

/// An ordered list of member symbols.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    /// Member symbols, in declaration order.
    pub symlinks: Vec<String>,
}

/// A type expression. This is a closed sum so that every unsupported shape in
/// the resolution engine is an exhaustive-match branch rather than a runtime
/// tag check.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Reference to another symbol, with optional type arguments.
    Ref(TypeRef),
    /// Union `A | B`.
    Union(UnionType),
    /// Intersection `A & B`.
    Intersection(IntersectionType),
    /// Anonymous structural shape `{ a: X, b: Y }`.
    Structural(StructuralType),
    /// A literal constant type.
    Constant(ConstantType),
    /// A function type. Never representable in the target serialization
    /// format; dropped with a warning wherever it appears.
    Lambda,
}

impl Type {
    /// Convenience constructor for a reference without type arguments.
    #[must_use]
    pub fn reference(symbol: impl Into<String>) -> Self {
        Self::Ref(TypeRef {
            symbol: symbol.into(),
            type_arguments: Vec::new(),
        })
    }

    /// Convenience constructor for a string-literal constant type.
    #[must_use]
    pub fn string_constant(value: impl Into<String>) -> Self {
        Self::Constant(ConstantType {
            constant: Constant::String(value.into()),
        })
    }

    /// Convenience constructor for a union over the given arms.
    #[must_use]
    pub fn union(types: Vec<Type>) -> Self {
        Self::Union(UnionType { types })
    }

    /// The string value if this is a string-literal constant type.
    #[must_use]
    pub fn as_string_constant(&self) -> Option<&str> {
        match self {
            Self::Constant(ConstantType {
                constant: Constant::String(value),
            }) => Some(value),
            _ => None,
        }
    }
}

/// Reference to another symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRef {
    /// Referenced symbol.
    pub symbol: String,
    /// Type arguments, for generics, arrays and records.
    pub type_arguments: Vec<Type>,
}

/// Union type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionType {
    /// Union arms, in source order.
    pub types: Vec<Type>,
}

/// Intersection type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionType {
    /// Intersection operands, in source order.
    pub types: Vec<Type>,
}

/// Anonymous structural type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralType {
    /// Declared members.
    pub declarations: Scope,
}

/// A literal constant type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantType {
    /// The literal.
    pub constant: Constant,
}

/// A literal constant value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// String literal.
    String(String),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Boolean(bool),
    /// Floating-point literal.
    Double(f64),
}
