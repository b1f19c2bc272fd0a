//! Run options and the injectable symbol-matching policy tables.

use std::path::PathBuf;

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage {
    /// Kotlin data classes and sealed classes.
    Kotlin,
    /// Java classes with gson annotations.
    Java,
    /// C# classes with System.Text.Json/Newtonsoft annotations.
    CSharp,
}

impl TargetLanguage {
    /// File extension for generated sources.
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Kotlin => "kt",
            Self::Java => "java",
            Self::CSharp => "cs",
        }
    }
}

/// Whether sealed-class inference is attempted for union-valued type aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnionMode {
    /// Infer discriminated unions and emit sealed hierarchies.
    #[default]
    Nested,
    /// Always fall through to the property-union merge strategy.
    Flat,
}

/// Options for one code generation run.
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Output directory; fully deleted and recreated per run.
    pub output: PathBuf,
    /// Selected backend.
    pub language: TargetLanguage,
    /// Protocol identifier. Reserved for future multi-protocol support.
    pub protocol: String,
    /// Package/namespace prefix applied to all emitted artifacts.
    pub kotlin_package: String,
    /// Discriminated-union handling.
    pub union_mode: UnionMode,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("generated"),
            language: TargetLanguage::Kotlin,
            protocol: "agent".to_string(),
            kotlin_package: "com.sourcegraph.cody.agent.protocol_generated".to_string(),
            union_mode: UnionMode::Nested,
        }
    }
}

/// The four protocol root container types, in canonical (version-agnostic)
/// symbol form.
#[derive(Debug, Clone)]
pub struct ProtocolRoots {
    /// Client-to-server requests.
    pub client_requests: String,
    /// Client-to-server notifications.
    pub client_notifications: String,
    /// Server-to-client requests.
    pub server_requests: String,
    /// Server-to-client notifications.
    pub server_notifications: String,
}

/// One entry of the union disambiguation table: when a multi-arm union has no
/// clean encoding, methods whose symbol starts with `prefix` resolve to the
/// union arm at `index`.
#[derive(Debug, Clone)]
pub struct UnionException {
    /// Symbol prefix of the enclosing method.
    pub prefix: String,
    /// Index of the arm to pick among the non-nullable arms.
    pub index: usize,
}

/// All symbol-string-matching policy, kept separate from the resolution
/// algorithm so it stays independently testable and overridable.
#[derive(Debug, Clone)]
pub struct ProtocolTables {
    /// Protocol root symbols seeding the run.
    pub roots: ProtocolRoots,
    /// Request display names excluded from the generated interfaces.
    pub skipped_requests: Vec<String>,
    /// Notification display names excluded from the generated interfaces.
    pub skipped_notifications: Vec<String>,
    /// Substring matchers for properties dropped from generated classes.
    pub ignored_properties: Vec<String>,
    /// Substring matchers for type references dropped from generated classes.
    pub ignored_type_refs: Vec<String>,
    /// Substring matchers for declarations skipped entirely.
    pub ignored_infos: Vec<String>,
    /// Union disambiguation entries.
    pub union_exceptions: Vec<UnionException>,
    /// Symbol suffixes identifying `Record`/`Map` references.
    pub record_suffixes: Vec<String>,
    /// Symbol suffix identifying the `Pick` utility type.
    pub pick_suffix: String,
    /// Symbol suffix identifying the `Omit` utility type.
    pub omit_suffix: String,
}

impl ProtocolTables {
    /// Whether a symbol references a record/map type.
    #[must_use]
    pub fn is_record(&self, symbol: &str) -> bool {
        self.record_suffixes
            .iter()
            .any(|suffix| symbol.ends_with(suffix))
    }

    /// The arm index picked by the first matching union exception, if any.
    #[must_use]
    pub fn union_exception_index(&self, method_symbol: &str) -> Option<usize> {
        self.union_exceptions
            .iter()
            .find(|exception| method_symbol.starts_with(&exception.prefix))
            .map(|exception| exception.index)
    }
}

impl Default for ProtocolTables {
    fn default() -> Self {
        Self {
            roots: ProtocolRoots {
                client_requests: "cody-ai src/jsonrpc/`agent-protocol.ts`/ClientRequests#"
                    .to_string(),
                client_notifications: "cody-ai src/jsonrpc/`agent-protocol.ts`/ClientNotifications#"
                    .to_string(),
                server_requests: "cody-ai src/jsonrpc/`agent-protocol.ts`/ServerRequests#"
                    .to_string(),
                server_notifications: "cody-ai src/jsonrpc/`agent-protocol.ts`/ServerNotifications#"
                    .to_string(),
            },
            // The webview protocol is string-encoded on IDE clients; its
            // structured form never appears in the bindings.
            skipped_requests: vec![
                "webview/receiveMessage".to_string(),
                "chat/submitMessage".to_string(),
                "chat/editMessage".to_string(),
            ],
            skipped_notifications: vec!["webview/postMessage".to_string()],
            ignored_properties: vec!["npm @sourcegraph/telemetry ".to_string()],
            ignored_type_refs: vec![
                "npm @sourcegraph/telemetry".to_string(),
                "/TelemetryEventParameters#".to_string(),
                " lib/`lib.es5.d.ts`/Omit#".to_string(),
            ],
            ignored_infos: Vec::new(),
            union_exceptions: vec![UnionException {
                prefix: "scip-typescript npm @types/vscode ".to_string(),
                index: 0,
            }],
            record_suffixes: vec![
                " lib/`lib.es5.d.ts`/Record#".to_string(),
                " lib/`lib.es2015.collection.d.ts`/Map#".to_string(),
            ],
            pick_suffix: " lib/`lib.es5.d.ts`/Pick#".to_string(),
            omit_suffix: " lib/`lib.es5.d.ts`/Omit#".to_string(),
        }
    }
}
