//! Kotlin emitter: data classes, sealed classes and gson deserializers.

use crate::format::capitalize;
use crate::ir::{
    ConstantField, DataClass, EnumDef, ProtocolInterface, RenderedType, SealedClass, TypeAlias,
};
use crate::printer::CodePrinter;
use crate::unions::DiscriminatorKind;

use super::Emitter;

/// Renders Kotlin sources.
pub struct KotlinEmitter {
    package: String,
}

impl KotlinEmitter {
    /// Creates an emitter targeting the given package.
    #[must_use]
    pub fn new(package: String) -> Self {
        Self { package }
    }

    fn data_class(&self, p: &mut CodePrinter, class: &DataClass) {
        if class.inner_class {
            p.blank();
        }
        p.line(&format!("data class {}(", class.name));
        p.block(|p| {
            for member in &class.members {
                let default = if member.nullable { " = null" } else { "" };
                p.line(&format!(
                    "val {}: {}{default},{}",
                    member.wire_name,
                    member.type_syntax,
                    member.one_of_comment()
                ));
            }
            if class.members.is_empty() {
                p.line("val placeholderField: String? = null // Empty data class");
            }
        });
        let heritage = match &class.parent_class {
            Some(parent) => format!(" : {parent}()"),
            None => String::new(),
        };
        if class.enums.is_empty() {
            p.line(&format!("){heritage}"));
        } else {
            p.line(&format!("){heritage} {{"));
            p.block(|p| {
                for enum_def in &class.enums {
                    self.enum_class(p, enum_def);
                }
            });
            p.line("}");
        }
    }

    fn enum_class(&self, p: &mut CodePrinter, enum_def: &EnumDef) {
        p.blank();
        p.line(&format!("enum class {} {{", enum_def.name));
        p.block(|p| {
            for member in &enum_def.members {
                p.line(&format!(
                    "@SerializedName(\"{}\") {},",
                    member.serialized_name, member.formatted_name
                ));
            }
        });
        p.line("}");
    }

    fn sealed_class(&self, p: &mut CodePrinter, sealed: &SealedClass) {
        let accessor = match sealed.kind {
            DiscriminatorKind::String => "getAsString",
            DiscriminatorKind::Number => "getAsInt",
            DiscriminatorKind::Boolean => "getAsBoolean",
        };
        p.line("import com.google.gson.Gson;");
        p.line("import com.google.gson.JsonDeserializationContext;");
        p.line("import com.google.gson.JsonDeserializer;");
        p.line("import com.google.gson.JsonElement;");
        p.line("import java.lang.reflect.Type;");
        p.blank();
        p.line(&format!("sealed class {} {{", sealed.name));
        p.block(|p| {
            p.line("companion object {");
            p.block(|p| {
                p.line(&format!(
                    "val deserializer: JsonDeserializer<{}> =",
                    sealed.name
                ));
                p.block(|p| {
                    p.line(
                        "JsonDeserializer { element: JsonElement, _: Type, context: JsonDeserializationContext ->",
                    );
                    p.block(|p| {
                        p.line(&format!(
                            "when (element.getAsJsonObject().get(\"{}\").{accessor}()) {{",
                            sealed.discriminator
                        ));
                        p.block(|p| {
                            for case in &sealed.cases {
                                p.line(&format!(
                                    "{} -> context.deserialize<{}>(element, {}::class.java)",
                                    case.literal, case.type_name, case.type_name
                                ));
                            }
                            p.line("else -> throw Exception(\"Unknown discriminator ${element}\")");
                        });
                        p.line("}");
                    });
                    p.line("}");
                });
            });
            p.line("}");
        });
        p.line("}");
        for subclass in &sealed.subclasses {
            self.data_class(p, subclass);
        }
    }
}

impl Emitter for KotlinEmitter {
    fn file_extension(&self) -> &'static str {
        "kt"
    }

    fn type_file_name(&self, type_name: &str) -> String {
        format!("{}.kt", capitalize(type_name))
    }

    fn render_null_alias(&self) -> String {
        let mut p = CodePrinter::new();
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("typealias Null = Void?");
        p.build()
    }

    fn render_constants(&self, constants: &[ConstantField]) -> String {
        let mut p = CodePrinter::new();
        p.line("@file:Suppress(\"unused\", \"ConstPropertyName\")");
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("object Constants {");
        p.block(|p| {
            for constant in constants {
                p.line(&format!(
                    "const val {} = \"{}\"",
                    constant.field_name, constant.literal
                ));
            }
        });
        p.line("}");
        p.build()
    }

    fn render_adapters(&self, union_names: &[String]) -> String {
        let mut p = CodePrinter::new();
        p.line("@file:Suppress(\"unused\", \"ConstPropertyName\")");
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("object ProtocolTypeAdapters {");
        p.block(|p| {
            p.line("fun register(gson: com.google.gson.GsonBuilder) {");
            p.block(|p| {
                for name in union_names {
                    p.line(&format!(
                        "gson.registerTypeAdapter({name}::class.java, {name}.deserializer)"
                    ));
                }
            });
            p.line("}");
        });
        p.line("}");
        p.build()
    }

    fn render_protocol_interface(&self, interface: &ProtocolInterface) -> String {
        let mut p = CodePrinter::new();
        p.line("@file:Suppress(\"FunctionName\", \"ClassName\", \"RedundantNullable\")");
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("import org.eclipse.lsp4j.jsonrpc.services.JsonNotification;");
        p.line("import org.eclipse.lsp4j.jsonrpc.services.JsonRequest;");
        p.line("import java.util.concurrent.CompletableFuture;");
        p.blank();
        p.line("@Suppress(\"unused\")");
        p.line(&format!("interface {} {{", interface.name));
        p.block(|p| {
            p.section_comment("Requests");
            for request in &interface.requests {
                p.line(&format!("@JsonRequest(\"{}\")", request.wire_name));
                p.line(&format!(
                    "fun {}({}): CompletableFuture<{}>",
                    request.function_name, request.parameter_syntax, request.result_syntax
                ));
            }
            p.blank();
            p.section_comment("Notifications");
            for notification in &interface.notifications {
                p.line(&format!("@JsonNotification(\"{}\")", notification.wire_name));
                p.line(&format!(
                    "fun {}({})",
                    notification.function_name, notification.parameter_syntax
                ));
            }
        });
        p.line("}");
        p.build()
    }

    fn render_type(&self, _type_name: &str, body: &RenderedType) -> String {
        let mut p = CodePrinter::new();
        p.line("@file:Suppress(\"FunctionName\", \"ClassName\", \"unused\", \"EnumEntryName\", \"UnusedImport\")");
        p.line(&format!("package {};", self.package));
        p.blank();
        let needs_serialized_import = match body {
            RenderedType::Data(class) => !class.enums.is_empty(),
            RenderedType::Sealed(sealed) => sealed
                .subclasses
                .iter()
                .any(|subclass| !subclass.enums.is_empty()),
            // Kotlin renders string aliases as typealiases, never as enums.
            RenderedType::Alias(_) => false,
        };
        if needs_serialized_import {
            p.line("import com.google.gson.annotations.SerializedName;");
            p.blank();
        }
        match body {
            RenderedType::Alias(TypeAlias::Date { name }) => {
                p.line(&format!("typealias {name} = String"));
            }
            RenderedType::Alias(TypeAlias::StringType { name, constants, .. }) => {
                if constants.is_empty() {
                    p.line(&format!("typealias {name} = String"));
                } else {
                    p.line(&format!(
                        "typealias {name} = String // One of: {}",
                        constants.join(", ")
                    ));
                }
            }
            RenderedType::Data(class) => self.data_class(&mut p, class),
            RenderedType::Sealed(sealed) => self.sealed_class(&mut p, sealed),
        }
        p.blank();
        p.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DataClassMember, EnumMemberDef, SealedCase};

    fn emitter() -> KotlinEmitter {
        KotlinEmitter::new("com.example.protocol".to_string())
    }

    #[test]
    fn test_data_class_with_nullable_default() {
        let class = DataClass {
            name: "EchoParams".to_string(),
            members: vec![DataClassMember {
                wire_name: "message".to_string(),
                field_name: "message".to_string(),
                type_syntax: "String?".to_string(),
                nullable: true,
                one_of: Vec::new(),
            }],
            enums: Vec::new(),
            parent_class: None,
            inner_class: false,
        };
        let rendered = emitter().render_type("EchoParams", &RenderedType::Data(class));
        assert!(rendered.contains("data class EchoParams("));
        assert!(rendered.contains("val message: String? = null,"));
        assert!(rendered.contains("package com.example.protocol;"));
    }

    #[test]
    fn test_sealed_class_has_literal_branches_and_default() {
        let sealed = SealedClass {
            name: "Shape".to_string(),
            discriminator: "kind".to_string(),
            kind: DiscriminatorKind::String,
            cases: vec![
                SealedCase {
                    literal: "\"circle\"".to_string(),
                    type_name: "CircleShape".to_string(),
                },
                SealedCase {
                    literal: "\"square\"".to_string(),
                    type_name: "SquareShape".to_string(),
                },
            ],
            subclasses: Vec::new(),
        };
        let rendered = emitter().render_type("Shape", &RenderedType::Sealed(sealed));
        assert!(rendered.contains("sealed class Shape {"));
        assert!(rendered.contains("when (element.getAsJsonObject().get(\"kind\").getAsString()) {"));
        assert!(rendered.contains(
            "\"circle\" -> context.deserialize<CircleShape>(element, CircleShape::class.java)"
        ));
        assert!(rendered.contains("else -> throw Exception(\"Unknown discriminator ${element}\")"));
    }

    #[test]
    fn test_enum_preserves_wire_literal() {
        let class = DataClass {
            name: "Item".to_string(),
            members: vec![DataClassMember {
                wire_name: "type".to_string(),
                field_name: "type".to_string(),
                type_syntax: "TypeEnum".to_string(),
                nullable: false,
                one_of: vec!["tree-sitter".to_string()],
            }],
            enums: vec![EnumDef {
                name: "TypeEnum".to_string(),
                members: vec![EnumMemberDef {
                    serialized_name: "tree-sitter".to_string(),
                    formatted_name: "`Tree-sitter`".to_string(),
                }],
            }],
            parent_class: None,
            inner_class: false,
        };
        let rendered = emitter().render_type("Item", &RenderedType::Data(class));
        assert!(rendered.contains("import com.google.gson.annotations.SerializedName;"));
        assert!(rendered.contains("@SerializedName(\"tree-sitter\") `Tree-sitter`,"));
        assert!(rendered.contains(" // Oneof: tree-sitter"));
    }

    #[test]
    fn test_constants_artifact() {
        let rendered = emitter().render_constants(&[ConstantField {
            field_name: "`tree-sitter`".to_string(),
            literal: "tree-sitter".to_string(),
        }]);
        assert!(rendered.contains("object Constants {"));
        assert!(rendered.contains("const val `tree-sitter` = \"tree-sitter\""));
    }
}
