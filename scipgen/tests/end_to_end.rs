//! End-to-end test: serialized index in, generated bindings out.

use std::fs;
use std::path::Path;
use std::process::Command;

use scipgen_codegen::keywords::typescript_keyword;
use scipgen_scip::{
    ClassSignature, Document, Index, Kind, Scope, Signature, StructuralType, SymbolInformation,
    Type, TypeRef, TypeSignature, wire,
};

fn proto(descriptor: &str) -> String {
    format!("scip-typescript npm cody-ai 6.0.0 src/jsonrpc/`agent-protocol.ts`/{descriptor}")
}

fn array_of(types: Vec<Type>) -> Type {
    Type::Ref(TypeRef {
        symbol: typescript_keyword("array"),
        type_arguments: types,
    })
}

fn structural(member_symbols: Vec<String>) -> Type {
    Type::Structural(StructuralType {
        declarations: Scope {
            symlinks: member_symbols,
        },
    })
}

fn alias(symbol: String, display_name: &str, lower_bound: Type) -> SymbolInformation {
    SymbolInformation {
        symbol,
        display_name: display_name.to_string(),
        kind: Kind::TypeAlias,
        signature: Some(Signature::Type(TypeSignature {
            type_parameters: Scope::default(),
            lower_bound,
        })),
    }
}

fn sample_index() -> Index {
    let mut symbols = vec![
        // type ClientRequests = { 'shape/get': [Null, Shape], 'echo/hello': [EchoParams, string] }
        alias(
            proto("ClientRequests#"),
            "ClientRequests",
            structural(vec![
                proto("ClientRequests#`shape/get`."),
                proto("ClientRequests#`echo/hello`."),
            ]),
        ),
        SymbolInformation::for_value(
            proto("ClientRequests#`shape/get`."),
            "shape/get",
            array_of(vec![
                Type::reference(typescript_keyword("null")),
                Type::reference(proto("Shape#")),
            ]),
        ),
        SymbolInformation::for_value(
            proto("ClientRequests#`echo/hello`."),
            "echo/hello",
            array_of(vec![
                Type::reference(proto("EchoParams#")),
                Type::reference(typescript_keyword("string")),
            ]),
        ),
        alias(
            proto("ClientNotifications#"),
            "ClientNotifications",
            structural(vec![proto("ClientNotifications#`debug/log`.")]),
        ),
        SymbolInformation::for_value(
            proto("ClientNotifications#`debug/log`."),
            "debug/log",
            array_of(vec![Type::reference(proto("EchoParams#"))]),
        ),
        alias(
            proto("ServerRequests#"),
            "ServerRequests",
            structural(Vec::new()),
        ),
        alias(
            proto("ServerNotifications#"),
            "ServerNotifications",
            structural(Vec::new()),
        ),
        // interface EchoParams { message: string }
        SymbolInformation {
            symbol: proto("EchoParams#"),
            display_name: "EchoParams".to_string(),
            kind: Kind::Interface,
            signature: Some(Signature::Class(ClassSignature {
                parents: Vec::new(),
                declarations: Scope {
                    symlinks: vec![proto("EchoParams#message.")],
                },
            })),
        },
        SymbolInformation::for_value(
            proto("EchoParams#message."),
            "message",
            Type::reference(typescript_keyword("string")),
        ),
        // type Shape = {kind:'circle', r:number} | {kind:'square', s:number}
        SymbolInformation::for_value(
            proto("Circle#kind."),
            "kind",
            Type::string_constant("circle"),
        ),
        SymbolInformation::for_value(
            proto("Circle#r."),
            "r",
            Type::reference(typescript_keyword("number")),
        ),
        SymbolInformation::for_value(
            proto("Square#kind."),
            "kind",
            Type::string_constant("square"),
        ),
        SymbolInformation::for_value(
            proto("Square#s."),
            "s",
            Type::reference(typescript_keyword("number")),
        ),
        alias(
            proto("Shape#"),
            "Shape",
            Type::union(vec![
                structural(vec![proto("Circle#kind."), proto("Circle#r.")]),
                structural(vec![proto("Square#kind."), proto("Square#s.")]),
            ]),
        ),
    ];
    for name in [
        "string", "number", "boolean", "array", "null", "undefined", "object", "any", "unknown",
        "void",
    ] {
        symbols.push(SymbolInformation {
            symbol: typescript_keyword(name),
            display_name: name.to_string(),
            ..SymbolInformation::default()
        });
    }
    Index {
        documents: vec![Document {
            relative_path: "src/jsonrpc/agent-protocol.ts".to_string(),
            language: "typescript".to_string(),
            symbols,
            ..Document::default()
        }],
        ..Index::default()
    }
}

fn run_scipgen(input: &Path, output: &Path, extra_args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_scipgen"))
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(output)
        .args(extra_args)
        .output()
        .expect("run scipgen")
}

#[test]
fn test_kotlin_generation_from_index_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("index.scip");
    fs::write(&input, wire::encode_index(&sample_index())).expect("write index");
    let output = dir.path().join("bindings");

    let result = run_scipgen(&input, &output, &[]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let server = fs::read_to_string(output.join("CodyAgentServer.kt")).expect("server interface");
    assert!(server.contains("@JsonRequest(\"shape/get\")"));
    assert!(server.contains("@JsonRequest(\"echo/hello\")"));
    let client = fs::read_to_string(output.join("CodyAgentClient.kt")).expect("client interface");
    assert!(client.contains("interface CodyAgentClient"));

    let shape = fs::read_to_string(output.join("Shape.kt")).expect("shape");
    assert!(shape.contains("sealed class Shape {"));
    assert!(shape.contains("data class CircleShape("));
    let adapters =
        fs::read_to_string(output.join("ProtocolTypeAdapters.kt")).expect("adapters");
    assert!(adapters.contains("Shape.deserializer"));
    assert!(output.join("Null.kt").exists());
    assert!(output.join("EchoParams.kt").exists());
    assert!(output.join("Constants.kt").exists());
}

#[test]
fn test_java_and_csharp_backends() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("index.scip");
    fs::write(&input, wire::encode_index(&sample_index())).expect("write index");

    let java_out = dir.path().join("java");
    let result = run_scipgen(&input, &java_out, &["--language", "java"]);
    assert!(result.status.success());
    let shape = fs::read_to_string(java_out.join("Shape.java")).expect("shape");
    assert!(shape.contains("public abstract class Shape {"));
    assert!(shape.contains("public static final class CircleShape extends Shape {"));

    let csharp_out = dir.path().join("csharp");
    let result = run_scipgen(&input, &csharp_out, &["--language", "csharp"]);
    assert!(result.status.success());
    let shape = fs::read_to_string(csharp_out.join("Shape.cs")).expect("shape");
    assert!(shape.contains("public abstract class Shape"));
    assert!(shape.contains("public class ShapeConverter : JsonConverter<Shape>"));
}

#[test]
fn test_output_directory_is_reset_between_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("index.scip");
    fs::write(&input, wire::encode_index(&sample_index())).expect("write index");
    let output = dir.path().join("bindings");
    fs::create_dir_all(&output).expect("create output");
    fs::write(output.join("Stale.kt"), "stale").expect("write stale file");

    let result = run_scipgen(&input, &output, &[]);
    assert!(result.status.success());
    assert!(!output.join("Stale.kt").exists());
    assert!(output.join("CodyAgentServer.kt").exists());
}

#[test]
fn test_missing_index_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = run_scipgen(
        &dir.path().join("does-not-exist.scip"),
        &dir.path().join("out"),
        &[],
    );
    assert!(!result.status.success());
}
