//! C# emitter: classes with JSON converters for sealed hierarchies.

use crate::format::capitalize;
use crate::ir::{
    ConstantField, DataClass, EnumDef, ProtocolInterface, RenderedType, SealedClass, TypeAlias,
};
use crate::printer::CodePrinter;
use crate::unions::DiscriminatorKind;

use super::Emitter;

/// Renders C# sources.
pub struct CSharpEmitter {
    namespace: String,
}

impl CSharpEmitter {
    /// Creates an emitter targeting the given namespace.
    #[must_use]
    pub fn new(namespace: String) -> Self {
        Self { namespace }
    }

    fn data_class(&self, p: &mut CodePrinter, class: &DataClass) {
        if class.inner_class {
            p.blank();
        }
        let heritage = match &class.parent_class {
            Some(parent) => format!(" : {parent}"),
            None => String::new(),
        };
        p.line(&format!("public class {}{heritage}", class.name));
        p.line("{");
        p.block(|p| {
            for member in &class.members {
                p.line(&format!(
                    "[JsonProperty(PropertyName = \"{}\")]",
                    member.wire_name
                ));
                // Literal sets with non-identifier characters fall back to a
                // plain string property.
                let type_syntax = if member.one_of.iter().any(|literal| literal.contains('-')) {
                    "string"
                } else {
                    member.type_syntax.as_str()
                };
                p.line(&format!(
                    "public {type_syntax} {} {{ get; set; }}{}",
                    member.field_name,
                    member.one_of_comment()
                ));
            }
            if class.members.is_empty() {
                p.line("public string PlaceholderField { get; set; } // Empty class");
            }
            for enum_def in &class.enums {
                self.enum_type(p, enum_def);
            }
        });
        p.line("}");
    }

    fn enum_type(&self, p: &mut CodePrinter, enum_def: &EnumDef) {
        p.blank();
        p.line(&format!("public enum {}", enum_def.name));
        p.line("{");
        p.block(|p| {
            for member in &enum_def.members {
                p.line(&format!("[EnumMember(Value = \"{}\")]", member.serialized_name));
                p.line(&format!("{},", member.formatted_name));
            }
        });
        p.line("}");
    }

    fn sealed_class(&self, p: &mut CodePrinter, sealed: &SealedClass) {
        let accessor = match sealed.kind {
            DiscriminatorKind::String => "GetString",
            DiscriminatorKind::Number => "GetInt32",
            DiscriminatorKind::Boolean => "GetBoolean",
        };
        p.line(&format!("[JsonConverter(typeof({}Converter))]", sealed.name));
        p.line(&format!("public abstract class {}", sealed.name));
        p.line("{");
        p.line("}");
        for subclass in &sealed.subclasses {
            self.data_class(p, subclass);
        }
        p.blank();
        p.line(&format!(
            "public class {}Converter : JsonConverter<{}>",
            sealed.name, sealed.name
        ));
        p.line("{");
        p.block(|p| {
            p.line(&format!(
                "public override {} Read(ref Utf8JsonReader reader, Type typeToConvert, JsonSerializerOptions options)",
                sealed.name
            ));
            p.line("{");
            p.block(|p| {
                p.line("var jsonDoc = JsonDocument.ParseValue(ref reader);");
                p.line(&format!(
                    "var discriminator = jsonDoc.RootElement.GetProperty(\"{}\").{accessor}();",
                    sealed.discriminator
                ));
                p.line("switch (discriminator)");
                p.line("{");
                p.block(|p| {
                    for case in &sealed.cases {
                        p.line(&format!("case {}:", case.literal));
                        p.block(|p| {
                            p.line(&format!(
                                "return JsonSerializer.Deserialize<{}>(jsonDoc.RootElement.GetRawText(), options);",
                                case.type_name
                            ));
                        });
                    }
                    p.line("default:");
                    p.block(|p| {
                        p.line(
                            "throw new JsonException($\"Unknown discriminator {discriminator}\");",
                        );
                    });
                });
                p.line("}");
            });
            p.line("}");
            p.blank();
            p.line(&format!(
                "public override void Write(Utf8JsonWriter writer, {} value, JsonSerializerOptions options)",
                sealed.name
            ));
            p.line("{");
            p.block(|p| {
                p.line("JsonSerializer.Serialize(writer, value, value.GetType(), options);");
            });
            p.line("}");
        });
        p.line("}");
    }

    fn open_namespace(&self, p: &mut CodePrinter) {
        p.line(&format!("namespace {}", self.namespace));
        p.line("{");
    }
}

impl Emitter for CSharpEmitter {
    fn file_extension(&self) -> &'static str {
        "cs"
    }

    fn type_file_name(&self, type_name: &str) -> String {
        let joined: String = type_name.split('_').map(capitalize).collect();
        format!("{joined}.cs")
    }

    fn render_null_alias(&self) -> String {
        let mut p = CodePrinter::new();
        self.open_namespace(&mut p);
        p.block(|p| {
            p.line("public sealed class Null {}");
        });
        p.line("}");
        p.build()
    }

    fn render_constants(&self, constants: &[ConstantField]) -> String {
        let mut p = CodePrinter::new();
        self.open_namespace(&mut p);
        p.block(|p| {
            p.line("public static class Constants");
            p.line("{");
            p.block(|p| {
                for constant in constants {
                    p.line(&format!(
                        "public const string {} = \"{}\";",
                        constant.field_name, constant.literal
                    ));
                }
            });
            p.line("}");
        });
        p.line("}");
        p.build()
    }

    fn render_adapters(&self, union_names: &[String]) -> String {
        let mut p = CodePrinter::new();
        self.open_namespace(&mut p);
        p.block(|p| {
            p.line("public static class ProtocolTypeAdapters");
            p.line("{");
            p.block(|p| {
                p.line("public static void Register(JsonSerializerOptions options)");
                p.line("{");
                p.block(|p| {
                    for name in union_names {
                        p.line(&format!("options.Converters.Add(new {name}Converter());"));
                    }
                });
                p.line("}");
            });
            p.line("}");
        });
        p.line("}");
        p.build()
    }

    fn render_protocol_interface(&self, interface: &ProtocolInterface) -> String {
        let mut p = CodePrinter::new();
        p.line("using System.Threading.Tasks;");
        p.blank();
        self.open_namespace(&mut p);
        p.block(|p| {
            p.line(&format!("public interface {}", interface.name));
            p.line("{");
            p.block(|p| {
                p.section_comment("Requests");
                for request in &interface.requests {
                    p.line(&format!("[JsonRpcMethod(\"{}\")]", request.wire_name));
                    let task = if request.result_syntax == "Void" {
                        "Task".to_string()
                    } else {
                        format!("Task<{}>", request.result_syntax)
                    };
                    let params = if request.parameter_syntax.starts_with("Void") {
                        ""
                    } else {
                        request.parameter_syntax.as_str()
                    };
                    p.line(&format!("{task} {}({params});", request.function_name));
                }
                p.blank();
                p.section_comment("Notifications");
                for notification in &interface.notifications {
                    p.line(&format!("[JsonRpcMethod(\"{}\")]", notification.wire_name));
                    p.line(&format!(
                        "void {}({});",
                        notification.function_name, notification.parameter_syntax
                    ));
                }
            });
            p.line("}");
        });
        p.line("}");
        p.build()
    }

    fn render_type(&self, _type_name: &str, body: &RenderedType) -> String {
        let mut p = CodePrinter::new();
        match body {
            RenderedType::Sealed(_) => {
                p.line("using System;");
                p.line("using System.Text.Json;");
                p.line("using System.Text.Json.Serialization;");
            }
            RenderedType::Data(class) if !class.enums.is_empty() => {
                p.line("using Newtonsoft.Json;");
                p.line("using System.Runtime.Serialization;");
            }
            RenderedType::Alias(TypeAlias::StringType {
                enum_def: Some(_), ..
            }) => {
                p.line("using System.Runtime.Serialization;");
            }
            _ => {
                p.line("using Newtonsoft.Json;");
            }
        }
        p.blank();
        self.open_namespace(&mut p);
        p.block(|p| match body {
            RenderedType::Alias(TypeAlias::Date { name }) => {
                p.line(&format!("public class {name} : String {{ }}"));
            }
            RenderedType::Alias(TypeAlias::StringType { name, enum_def, .. }) => match enum_def {
                Some(enum_def) => self.enum_type(p, enum_def),
                None => {
                    // Implicit string wrapper so the alias stays assignable
                    // from raw strings.
                    p.line(&format!("public class {name}"));
                    p.line("{");
                    p.block(|p| {
                        p.line("public string Value { get; set; }");
                        p.blank();
                        p.line(&format!(
                            "public static implicit operator string({name} value) => value.Value;"
                        ));
                        p.line(&format!(
                            "public static implicit operator {name}(string value) => new {name} {{ Value = value }};"
                        ));
                    });
                    p.line("}");
                }
            },
            RenderedType::Data(class) => self.data_class(p, class),
            RenderedType::Sealed(sealed) => self.sealed_class(p, sealed),
        });
        p.line("}");
        p.build()
    }
}
