//! Backend-agnostic intermediate representation of resolved types.
//!
//! The resolution engine produces these shapes; emitters consume only them.
//! Keeping all classification on the engine side means the three backends
//! cannot silently diverge on edge-case handling.

use crate::unions::DiscriminatorKind;

/// A resolved RPC interface (one of the two protocol sides).
#[derive(Debug, Clone)]
pub struct ProtocolInterface {
    /// Generated interface name.
    pub name: String,
    /// Request methods, in protocol declaration order.
    pub requests: Vec<ProtocolRequest>,
    /// Notification methods, in protocol declaration order.
    pub notifications: Vec<ProtocolNotification>,
}

/// One request method.
#[derive(Debug, Clone)]
pub struct ProtocolRequest {
    /// Wire method name, e.g. `textDocument/didOpen`.
    pub wire_name: String,
    /// Target-language method name.
    pub function_name: String,
    /// Rendered parameter list.
    pub parameter_syntax: String,
    /// Rendered result type.
    pub result_syntax: String,
}

/// One notification method.
#[derive(Debug, Clone)]
pub struct ProtocolNotification {
    /// Wire method name.
    pub wire_name: String,
    /// Target-language method name.
    pub function_name: String,
    /// Rendered parameter list.
    pub parameter_syntax: String,
}

/// A resolved plain data class.
#[derive(Debug, Clone)]
pub struct DataClass {
    /// Generated class name.
    pub name: String,
    /// Fields, one per resolved property.
    pub members: Vec<DataClassMember>,
    /// Nested enums for fields with closed literal sets.
    pub enums: Vec<EnumDef>,
    /// Sealed/abstract base class, for discriminated-union subtypes.
    pub parent_class: Option<String>,
    /// Whether the class is nested inside another generated type.
    pub inner_class: bool,
}

/// One field of a data class.
#[derive(Debug, Clone)]
pub struct DataClassMember {
    /// Original wire property name.
    pub wire_name: String,
    /// Escaped target-language field name.
    pub field_name: String,
    /// Rendered field type.
    pub type_syntax: String,
    /// Whether the field is nullable and needs an absent/null default.
    pub nullable: bool,
    /// Closed set of literals this field may take, when known.
    pub one_of: Vec<String>,
}

impl DataClassMember {
    /// Trailing comment listing the closed literal set, if any.
    #[must_use]
    pub fn one_of_comment(&self) -> String {
        if self.one_of.is_empty() {
            String::new()
        } else {
            format!(" // Oneof: {}", self.one_of.join(", "))
        }
    }

    /// Whether the field needs a serialized-name annotation because its
    /// escaped name differs from the wire name.
    #[must_use]
    pub fn needs_serialized_annotation(&self) -> bool {
        self.field_name != self.wire_name
    }
}

/// A generated enum with wire-faithful serialized names.
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Generated enum name.
    pub name: String,
    /// Members, in literal discovery order.
    pub members: Vec<EnumMemberDef>,
}

/// One enum member.
#[derive(Debug, Clone)]
pub struct EnumMemberDef {
    /// The original wire literal.
    pub serialized_name: String,
    /// The target-language-safe identifier.
    pub formatted_name: String,
}

/// A resolved sealed/tagged hierarchy.
#[derive(Debug, Clone)]
pub struct SealedClass {
    /// Generated base class name.
    pub name: String,
    /// Discriminator property wire name.
    pub discriminator: String,
    /// Runtime accessor family of the discriminator.
    pub kind: DiscriminatorKind,
    /// Deserializer branches, duplicates already dropped.
    pub cases: Vec<SealedCase>,
    /// One concrete subtype per union member.
    pub subclasses: Vec<DataClass>,
}

/// One deserializer branch.
#[derive(Debug, Clone)]
pub struct SealedCase {
    /// Rendered literal to compare against, e.g. `"circle"` or `42`.
    pub literal: String,
    /// Subtype dispatched to.
    pub type_name: String,
}

/// A resolved type alias.
#[derive(Debug, Clone)]
pub enum TypeAlias {
    /// The built-in `Date` type, serialized as a string.
    Date {
        /// Generated name.
        name: String,
    },
    /// A string-typed alias, with its reachable literal set.
    StringType {
        /// Generated name.
        name: String,
        /// Reachable string literals, in discovery order.
        constants: Vec<String>,
        /// Enum rendering of the literal set, when non-empty.
        enum_def: Option<EnumDef>,
    },
}

/// One resolved type, ready for rendering.
#[derive(Debug, Clone)]
pub enum RenderedType {
    /// Alias emission strategy.
    Alias(TypeAlias),
    /// Plain data class emission strategy.
    Data(DataClass),
    /// Sealed hierarchy emission strategy.
    Sealed(SealedClass),
}

/// One entry of the shared string-literal constants artifact.
#[derive(Debug, Clone)]
pub struct ConstantField {
    /// Escaped constant identifier.
    pub field_name: String,
    /// Original wire literal.
    pub literal: String,
}
