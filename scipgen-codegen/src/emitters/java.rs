//! Java emitter: final classes with gson annotations.

use crate::ir::{
    ConstantField, DataClass, EnumDef, ProtocolInterface, RenderedType, SealedClass, TypeAlias,
};
use crate::printer::CodePrinter;
use crate::unions::DiscriminatorKind;

use super::Emitter;

/// Renders Java sources.
pub struct JavaEmitter {
    package: String,
}

impl JavaEmitter {
    /// Creates an emitter targeting the given package.
    #[must_use]
    pub fn new(package: String) -> Self {
        Self { package }
    }

    fn data_class(&self, p: &mut CodePrinter, class: &DataClass) {
        if class.inner_class {
            p.blank();
        }
        let static_modifier = if class.inner_class { "static " } else { "" };
        let heritage = match &class.parent_class {
            Some(parent) => format!(" extends {parent}"),
            None => String::new(),
        };
        p.line(&format!(
            "public {static_modifier}final class {}{heritage} {{",
            class.name
        ));
        p.block(|p| {
            for member in &class.members {
                let annotation = if member.needs_serialized_annotation() {
                    format!(
                        "@com.google.gson.annotations.SerializedName(\"{}\") ",
                        member.wire_name
                    )
                } else {
                    String::new()
                };
                p.line(&format!(
                    "{annotation}public {} {};{}",
                    member.type_syntax,
                    member.field_name,
                    member.one_of_comment()
                ));
            }
        });
        if !class.enums.is_empty() {
            p.block(|p| {
                for enum_def in &class.enums {
                    self.enum_class(p, enum_def);
                }
            });
        }
        p.line("}");
    }

    fn enum_class(&self, p: &mut CodePrinter, enum_def: &EnumDef) {
        p.blank();
        p.line(&format!("public enum {} {{", enum_def.name));
        p.block(|p| {
            for member in &enum_def.members {
                p.line(&format!(
                    "@com.google.gson.annotations.SerializedName(\"{}\") {},",
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
        p.line(&format!("public abstract class {} {{", sealed.name));
        p.block(|p| {
            p.line(&format!(
                "public static JsonDeserializer<{}> deserializer() {{",
                sealed.name
            ));
            p.block(|p| {
                p.line("return (element, _type, context) -> {");
                p.block(|p| {
                    p.line(&format!(
                        "switch (element.getAsJsonObject().get(\"{}\").{accessor}()) {{",
                        sealed.discriminator
                    ));
                    p.block(|p| {
                        for case in &sealed.cases {
                            p.line(&format!(
                                "case {}: return context.deserialize(element, {}.class);",
                                case.literal, case.type_name
                            ));
                        }
                        p.line(
                            "default: throw new RuntimeException(\"Unknown discriminator \" + element);",
                        );
                    });
                    p.line("}");
                });
                p.line("};");
            });
            p.line("}");
            for subclass in &sealed.subclasses {
                self.data_class(p, subclass);
            }
        });
        p.line("}");
    }
}

impl Emitter for JavaEmitter {
    fn file_extension(&self) -> &'static str {
        "java"
    }

    fn type_file_name(&self, type_name: &str) -> String {
        format!("{type_name}.java")
    }

    fn render_null_alias(&self) -> String {
        let mut p = CodePrinter::new();
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("public final class Null {}");
        p.build()
    }

    fn render_constants(&self, constants: &[ConstantField]) -> String {
        let mut p = CodePrinter::new();
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("public final class Constants {");
        p.block(|p| {
            for constant in constants {
                p.line(&format!(
                    "public static final String {} = \"{}\";",
                    constant.field_name, constant.literal
                ));
            }
        });
        p.line("}");
        p.build()
    }

    fn render_adapters(&self, union_names: &[String]) -> String {
        let mut p = CodePrinter::new();
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("public final class ProtocolTypeAdapters {");
        p.block(|p| {
            p.line("public static void register(com.google.gson.GsonBuilder gson) {");
            p.block(|p| {
                for name in union_names {
                    p.line(&format!(
                        "gson.registerTypeAdapter({name}.class, {name}.deserializer());"
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
        p.line(&format!("package {};", self.package));
        p.blank();
        p.line("import org.eclipse.lsp4j.jsonrpc.services.JsonNotification;");
        p.line("import org.eclipse.lsp4j.jsonrpc.services.JsonRequest;");
        p.line("import java.util.concurrent.CompletableFuture;");
        p.blank();
        p.line("@SuppressWarnings(\"unused\")");
        p.line(&format!("public interface {} {{", interface.name));
        p.block(|p| {
            p.section_comment("Requests");
            for request in &interface.requests {
                p.line(&format!("@JsonRequest(\"{}\")", request.wire_name));
                p.line(&format!(
                    "CompletableFuture<{}> {}({});",
                    request.result_syntax, request.function_name, request.parameter_syntax
                ));
            }
            p.blank();
            p.section_comment("Notifications");
            for notification in &interface.notifications {
                p.line(&format!("@JsonNotification(\"{}\")", notification.wire_name));
                p.line(&format!(
                    "void {}({});",
                    notification.function_name, notification.parameter_syntax
                ));
            }
        });
        p.line("}");
        p.build()
    }

    fn render_type(&self, _type_name: &str, body: &RenderedType) -> String {
        let mut p = CodePrinter::new();
        p.line(&format!("package {};", self.package));
        p.blank();
        match body {
            RenderedType::Alias(TypeAlias::Date { .. }) => {
                p.line("public final class Date {}");
            }
            RenderedType::Alias(TypeAlias::StringType { name, enum_def, .. }) => {
                match enum_def {
                    Some(enum_def) => self.enum_class(&mut p, enum_def),
                    // No reachable literals: an opaque string wrapper keeps
                    // downstream references compiling.
                    None => p.line(&format!("public final class {name} {{}}")),
                }
            }
            RenderedType::Data(class) => self.data_class(&mut p, class),
            RenderedType::Sealed(sealed) => self.sealed_class(&mut p, sealed),
        }
        p.blank();
        p.build()
    }
}
