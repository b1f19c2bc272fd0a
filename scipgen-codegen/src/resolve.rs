//! The class-graph builder: a worklist over referenced types.
//!
//! Every type referenced from the protocol's request/notification interfaces
//! is converted into one of three emission strategies: a string/Date alias, a
//! sealed discriminated union, or a plain data class. Referenced types
//! discovered during resolution are pushed back onto the queue; the
//! generated-symbols set guarantees each symbol is rendered exactly once, so
//! cyclic alias graphs terminate.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use scipgen_scip::{Kind, Signature, SymbolInformation, SymbolTable, Type};

use crate::classify::{Classifier, SiblingProperties};
use crate::diagnostics::{Diagnostic, Reporter, Severity};
use crate::emitters::{Emitter, emitter_for};
use crate::error::CodegenError;
use crate::format::{Formatter, TypePosition, capitalize};
use crate::ir::{
    ConstantField, DataClass, DataClassMember, EnumDef, EnumMemberDef, ProtocolInterface,
    ProtocolNotification, ProtocolRequest, RenderedType, SealedCase, SealedClass, TypeAlias,
};
use crate::keywords::{Keyword, typescript_keyword};
use crate::options::{CodegenOptions, ProtocolTables, UnionMode};
use crate::unions::{self, DiscriminatedUnion};

const MERGE_CONFLICT_MESSAGE: &str = "Incompatible signatures. For discriminated unions, each \
property name must map to a unique type. For example, it's not allowed to have a property named \
'result', which is a string for one type in the discriminated union and a number for another type \
in the union. To fix this problem, give one of the following properties a unique name and try \
running the code generator again.";

/// One resolution session: the worklist, its dedup set, and everything
/// accumulated for the shared artifacts. Owned by a single run and never
/// shared across threads.
pub struct Codegen<'a> {
    options: &'a CodegenOptions,
    tables: &'a ProtocolTables,
    symtab: &'a SymbolTable,
    reporter: &'a mut Reporter,
    emitter: Box<dyn Emitter>,
    queue: Vec<SymbolInformation>,
    generated_symbols: HashSet<String>,
    discriminated_unions: IndexMap<String, DiscriminatedUnion>,
    sibling_properties: SiblingProperties,
    string_literal_constants: BTreeSet<String>,
}

impl<'a> Codegen<'a> {
    /// Creates a session for one run.
    pub fn new(
        options: &'a CodegenOptions,
        tables: &'a ProtocolTables,
        symtab: &'a SymbolTable,
        reporter: &'a mut Reporter,
    ) -> Self {
        let emitter = emitter_for(options);
        Self {
            options,
            tables,
            symtab,
            reporter,
            emitter,
            queue: Vec::new(),
            generated_symbols: HashSet::new(),
            discriminated_unions: IndexMap::new(),
            sibling_properties: SiblingProperties::new(),
            string_literal_constants: BTreeSet::new(),
        }
    }

    fn classifier(&self) -> Classifier<'a> {
        Classifier::new(self.symtab, self.tables)
    }

    fn formatter(&self) -> Formatter<'a> {
        Formatter::new(self.options.language, self.classifier())
    }

    /// Symbols rendered so far. Exposed for tests and statistics.
    #[must_use]
    pub fn generated_symbols(&self) -> &HashSet<String> {
        &self.generated_symbols
    }

    /// Discriminated unions recorded so far.
    #[must_use]
    pub fn discriminated_unions(&self) -> &IndexMap<String, DiscriminatedUnion> {
        &self.discriminated_unions
    }

    /// Runs the full generation: seeds the queue with the protocol's two RPC
    /// interfaces, drains it, then writes the shared artifacts.
    pub fn run(&mut self) -> Result<(), CodegenError> {
        info!(
            language = ?self.options.language,
            output = %self.options.output.display(),
            "generating protocol bindings"
        );
        reset_output_path(&self.options.output)?;

        let extension = self.emitter.file_extension();
        self.write_file(
            &format!("Null.{extension}"),
            &self.emitter.render_null_alias(),
        )?;

        let roots = self.tables.roots.clone();
        let server =
            self.protocol_interface("CodyAgentServer", &roots.client_requests, &roots.client_notifications)?;
        self.write_file(
            &format!("CodyAgentServer.{extension}"),
            &self.emitter.render_protocol_interface(&server),
        )?;
        let client =
            self.protocol_interface("CodyAgentClient", &roots.server_requests, &roots.server_notifications)?;
        self.write_file(
            &format!("CodyAgentClient.{extension}"),
            &self.emitter.render_protocol_interface(&client),
        )?;

        while let Some(next) = self.queue.pop() {
            if self.generated_symbols.contains(&next.symbol) {
                continue;
            }
            self.write_type(&next)?;
            self.generated_symbols.insert(next.symbol);
        }

        if !self.discriminated_unions.is_empty() {
            let mut symbols: Vec<String> = self.discriminated_unions.keys().cloned().collect();
            symbols.sort();
            let mut names = Vec::with_capacity(symbols.len());
            for symbol in &symbols {
                names.push(self.symtab.info(symbol)?.display_name.clone());
            }
            self.write_file(
                &format!("ProtocolTypeAdapters.{extension}"),
                &self.emitter.render_adapters(&names),
            )?;
        }

        if !self.string_literal_constants.is_empty() {
            let formatter = self.formatter();
            let constants: Vec<ConstantField> = self
                .string_literal_constants
                .iter()
                .map(|literal| ConstantField {
                    field_name: formatter.format_field_name(literal),
                    literal: literal.clone(),
                })
                .collect();
            self.write_file(
                &format!("Constants.{extension}"),
                &self.emitter.render_constants(&constants),
            )?;
        }

        info!(types = self.generated_symbols.len(), "generation complete");
        Ok(())
    }

    fn write_file(&self, file_name: &str, content: &str) -> Result<(), CodegenError> {
        fs::write(self.options.output.join(file_name), content)?;
        Ok(())
    }

    /// Builds one side of the protocol: resolves each method's parameter and
    /// result, queueing every referenced type along the way.
    fn protocol_interface(
        &mut self,
        name: &str,
        requests_root: &str,
        notifications_root: &str,
    ) -> Result<ProtocolInterface, CodegenError> {
        let request_infos: Vec<SymbolInformation> = self
            .symtab
            .structural_type(&self.symtab.canonical_symbol(requests_root))?
            .into_iter()
            .cloned()
            .collect();
        let mut requests = Vec::new();
        for request in &request_infos {
            if self.tables.skipped_requests.contains(&request.display_name) {
                continue;
            }
            // A request is declared as `'method/name': [Params, Result]`.
            let Some(Signature::Value(value)) = &request.signature else {
                return Err(CodegenError::NotValueSignature {
                    symbol: request.symbol.clone(),
                });
            };
            let Type::Ref(type_ref) = &value.tpe else {
                return Err(CodegenError::MissingParameter {
                    symbol: request.symbol.clone(),
                });
            };
            let Some(result_type) = type_ref.type_arguments.get(1).cloned() else {
                self.reporter.error(
                    request.symbol.clone(),
                    "missing result type for request. To fix this problem, add a second element \
                     to the array type like this: 'example/method: [RequestParams, RequestResult]'",
                );
                continue;
            };
            let (parameter_type, parameter_syntax) =
                self.formatter().jsonrpc_method_parameter(request)?;
            self.queue_class_like_type(&parameter_type, request, TypePosition::Parameter)?;
            self.queue_class_like_type(&result_type, request, TypePosition::Result)?;
            let result_syntax =
                self.formatter()
                    .jsonrpc_type_name(request, &result_type, TypePosition::Result)?;
            requests.push(ProtocolRequest {
                wire_name: request.display_name.clone(),
                function_name: self.formatter().function_name(request),
                parameter_syntax,
                result_syntax,
            });
        }

        let notification_infos: Vec<SymbolInformation> = self
            .symtab
            .structural_type(&self.symtab.canonical_symbol(notifications_root))?
            .into_iter()
            .cloned()
            .collect();
        let mut notifications = Vec::new();
        for notification in &notification_infos {
            if self
                .tables
                .skipped_notifications
                .contains(&notification.display_name)
            {
                continue;
            }
            let (parameter_type, parameter_syntax) =
                self.formatter().jsonrpc_method_parameter(notification)?;
            self.queue_class_like_type(&parameter_type, notification, TypePosition::Parameter)?;
            notifications.push(ProtocolNotification {
                wire_name: notification.display_name.clone(),
                function_name: self.formatter().function_name(notification),
                parameter_syntax,
            });
        }

        Ok(ProtocolInterface {
            name: name.to_string(),
            requests,
            notifications,
        })
    }

    /// Decides what, if anything, a referenced type contributes to the queue.
    ///
    /// Arrays and records recurse into their type arguments, keyword
    /// references are already representable, anonymous shapes get a synthetic
    /// nominal type keyed by the enclosing method and position, and unions are
    /// either erased to their single non-nullable arm or resolved through the
    /// exception table. Everything unhandled fails hard on purpose.
    pub fn queue_class_like_type(
        &mut self,
        tpe: &Type,
        method: &SymbolInformation,
        position: TypePosition,
    ) -> Result<(), CodegenError> {
        match tpe {
            Type::Ref(type_ref) => {
                if type_ref.symbol == typescript_keyword("array") {
                    let element = type_ref.type_arguments.first().ok_or_else(|| {
                        CodegenError::MissingTypeArgument {
                            symbol: type_ref.symbol.clone(),
                        }
                    })?;
                    let element = element.clone();
                    return self.queue_class_like_type(&element, method, position);
                }
                if self.tables.is_record(&type_ref.symbol) {
                    if type_ref.type_arguments.len() != 2 {
                        return Err(CodegenError::RecordArity {
                            symbol: type_ref.symbol.clone(),
                            type_arguments: type_ref.type_arguments.len(),
                        });
                    }
                    let key = type_ref.type_arguments[0].clone();
                    let value = type_ref.type_arguments[1].clone();
                    self.queue_class_like_type(&key, method, position)?;
                    return self.queue_class_like_type(&value, method, position);
                }
                if Keyword::from_symbol(&type_ref.symbol).is_some() {
                    // Primitive keywords map directly to target-language
                    // types.
                    return Ok(());
                }
                let referenced = self.symtab.info(&type_ref.symbol)?.clone();
                self.queue_class_like_info(referenced)
            }
            Type::Structural(_) | Type::Intersection(_) => {
                // Synthesize a nominal type for the anonymous shape. The
                // symbol includes both the method identity and the position
                // so that the same shape used as a parameter and as a result
                // never collides.
                let display_name = self.formatter().jsonrpc_type_name(method, tpe, position)?;
                let symbol = format!("{}({}).", method.symbol, position.as_str());
                let classifier = self.classifier();
                let members =
                    classifier.properties(self.reporter, &self.sibling_properties, tpe)?;
                self.queue_class_like_info(SymbolInformation::for_class(
                    symbol,
                    display_name,
                    members,
                ))
            }
            Type::Union(union) => {
                if union.types.iter().all(|arm| matches!(arm, Type::Constant(_))) {
                    // Unions of literals are captured as enum/oneof
                    // annotations, not nominal types.
                    return Ok(());
                }
                let formatter = self.formatter();
                let non_nullable: Vec<Type> = union
                    .types
                    .iter()
                    .filter(|arm| !formatter.is_nullable(arm))
                    .cloned()
                    .collect();
                let all_keywords = non_nullable.iter().all(|arm| {
                    matches!(arm, Type::Ref(type_ref) if Keyword::from_symbol(&type_ref.symbol).is_some())
                });
                if all_keywords {
                    return Ok(());
                }
                if let [only] = non_nullable.as_slice() {
                    // Nullability is represented orthogonally; only the
                    // non-null arm is a type of its own.
                    let only = only.clone();
                    return self.queue_class_like_type(&only, method, position);
                }
                if let Some(index) = self.tables.union_exception_index(&method.symbol) {
                    self.reporter.warn(
                        method.symbol.clone(),
                        format!("resolving unsupported union by picking arm {index}"),
                    );
                    let arm = non_nullable
                        .get(index)
                        .ok_or_else(|| CodegenError::MissingTypeArgument {
                            symbol: method.symbol.clone(),
                        })?
                        .clone();
                    return self.queue_class_like_type(&arm, method, position);
                }
                Err(CodegenError::UnsupportedUnion {
                    symbol: method.symbol.clone(),
                })
            }
            Type::Constant(_) => Ok(()),
            Type::Lambda => Err(CodegenError::UnsupportedType {
                symbol: method.symbol.clone(),
                shape: "lambda type",
            }),
        }
    }

    /// Classifies a referenced declaration and pushes it onto the queue.
    pub fn queue_class_like_info(&mut self, info: SymbolInformation) -> Result<(), CodegenError> {
        let Some(signature) = &info.signature else {
            return Ok(());
        };
        if matches!(signature, Signature::Class(_)) {
            self.queue.push(info);
            return Ok(());
        }
        if self.classifier().is_string_type_info(&info)? {
            self.queue.push(info);
            return Ok(());
        }
        if self.options.union_mode == UnionMode::Nested {
            let classifier = self.classifier();
            if let Some(union) =
                unions::discriminated_union(classifier, self.reporter, &self.sibling_properties, &info)?
            {
                debug!(
                    symbol = %info.symbol,
                    discriminator = %union.discriminator_display_name,
                    "inferred discriminated union"
                );
                self.discriminated_unions.insert(info.symbol.clone(), union);
                self.queue.push(info);
                return Ok(());
            }
        }
        if let Some(Signature::Type(type_signature)) = &info.signature {
            return self.merge_type_alias_properties(&info, &type_signature.lower_bound.clone());
        }
        Err(CodegenError::UnknownInfo {
            symbol: info.symbol,
        })
    }

    /// The property-union merge strategy: collect the transitive properties
    /// of a type alias and synthesize a plain data class, ensuring no two
    /// properties share a name with incompatible signatures.
    fn merge_type_alias_properties(
        &mut self,
        info: &SymbolInformation,
        lower_bound: &Type,
    ) -> Result<(), CodegenError> {
        struct Merged {
            info: SymbolInformation,
            diagnostic: Diagnostic,
            siblings: Vec<String>,
        }

        let classifier = self.classifier();
        let properties =
            classifier.properties(self.reporter, &self.sibling_properties, lower_bound)?;
        let mut declarations: IndexMap<String, Merged> = IndexMap::new();
        for property in properties {
            if !self.symtab.has(&property) {
                debug!(symbol = %property, "skipping dangling property reference");
                continue;
            }
            let property_info = self.symtab.info(&property)?.clone();
            match declarations.get_mut(&property_info.display_name) {
                None => {
                    declarations.insert(
                        property_info.display_name.clone(),
                        Merged {
                            diagnostic: Diagnostic::new(
                                Severity::Error,
                                property,
                                MERGE_CONFLICT_MESSAGE,
                            ),
                            info: property_info,
                            siblings: Vec::new(),
                        },
                    );
                }
                Some(merged) => {
                    if classifier.compatible_signatures(&merged.info, &property_info)? {
                        merged.siblings.push(property);
                    } else {
                        merged.diagnostic.additional_information.push(Diagnostic::new(
                            Severity::Error,
                            property,
                            "conflict here",
                        ));
                    }
                }
            }
        }

        if declarations.is_empty() {
            // Known gap: the type is dropped from the output even though it
            // may still be referenced elsewhere.
            self.reporter
                .warn(info.symbol.clone(), "no properties found for this type");
            return Ok(());
        }

        let mut member_symbols = Vec::with_capacity(declarations.len());
        for (_, merged) in declarations {
            self.sibling_properties
                .insert(merged.info.symbol.clone(), merged.siblings);
            if !merged.diagnostic.additional_information.is_empty() {
                self.reporter.report(merged.diagnostic);
            }
            member_symbols.push(merged.info.symbol);
        }
        self.queue.push(SymbolInformation::for_class(
            info.symbol.clone(),
            info.display_name.clone(),
            member_symbols,
        ));
        Ok(())
    }

    /// Renders one dequeued type to its output file.
    fn write_type(&mut self, info: &SymbolInformation) -> Result<(), CodegenError> {
        if self.formatter().is_ignored_info(info) {
            return Ok(());
        }
        let name = self.formatter().type_name(info);
        debug!(symbol = %info.symbol, name = %name, "rendering type");
        let body = if let Some(alias) = self.alias_type(info)? {
            RenderedType::Alias(alias)
        } else if let Some(union) = self.discriminated_unions.get(&info.symbol).cloned() {
            RenderedType::Sealed(self.build_sealed_class(&name, info, &union)?)
        } else {
            RenderedType::Data(self.build_data_class(name.clone(), info, None, false)?)
        };
        let content = self.emitter.render_type(&name, &body);
        self.write_file(&self.emitter.type_file_name(&name), &content)
    }

    /// The type-alias emission strategy, when it applies: the built-in `Date`
    /// type (which serializes as a string), or any string-typed alias.
    fn alias_type(&mut self, info: &SymbolInformation) -> Result<Option<TypeAlias>, CodegenError> {
        let name = self.formatter().type_name(info);
        if info.display_name == "Date" {
            return Ok(Some(TypeAlias::Date { name }));
        }
        if !self.classifier().is_string_type_info(info)? {
            return Ok(None);
        }
        let constants = self
            .classifier()
            .string_constants_from_info(&self.sibling_properties, info)?;
        for constant in &constants {
            self.string_literal_constants.insert(constant.clone());
        }
        let enum_def = if constants.is_empty() {
            self.reporter.warn(
                info.symbol.clone(),
                format!("no constants for {}", info.display_name),
            );
            None
        } else {
            Some(self.enum_def(name.clone(), &constants))
        };
        Ok(Some(TypeAlias::StringType {
            name,
            constants,
            enum_def,
        }))
    }

    fn enum_def(&self, name: String, constants: &[String]) -> EnumDef {
        let formatter = self.formatter();
        EnumDef {
            name,
            members: constants
                .iter()
                .map(|constant| EnumMemberDef {
                    serialized_name: constant.clone(),
                    formatted_name: formatter.format_field_name(&capitalize(constant)),
                })
                .collect(),
        }
    }

    /// Builds the sealed-class IR for a discriminated union: deserializer
    /// branches (first occurrence wins on duplicate values) plus one concrete
    /// subtype per member.
    fn build_sealed_class(
        &mut self,
        name: &str,
        info: &SymbolInformation,
        union: &DiscriminatedUnion,
    ) -> Result<SealedClass, CodegenError> {
        let mut handled = HashSet::new();
        let mut cases = Vec::new();
        for member in &union.members {
            let literal = member.value.literal();
            if !handled.insert(literal.clone()) {
                self.reporter.warn(
                    info.symbol.clone(),
                    format!("duplicate discriminator value {}", member.value.raw()),
                );
                continue;
            }
            cases.push(SealedCase {
                literal,
                type_name: self.formatter().discriminated_union_type_name(union, member)?,
            });
        }

        let mut subclasses = Vec::new();
        for member in &union.members {
            let type_name = self.formatter().discriminated_union_type_name(union, member)?;
            let member_info = match &member.tpe {
                Type::Ref(type_ref) => self.symtab.info(&type_ref.symbol)?.clone(),
                _ => SymbolInformation::for_value("", type_name.clone(), member.tpe.clone()),
            };
            subclasses.push(self.build_data_class(
                type_name,
                &member_info,
                Some(name.to_string()),
                true,
            )?);
        }

        Ok(SealedClass {
            name: name.to_string(),
            discriminator: union.discriminator_display_name.clone(),
            kind: union.kind(),
            cases,
            subclasses,
        })
    }

    /// Builds the data-class IR for a declaration: one field per resolved
    /// property, with lambda-typed, ignored and unclassifiable properties
    /// dropped (the latter with an error diagnostic).
    fn build_data_class(
        &mut self,
        name: String,
        info: &SymbolInformation,
        parent_class: Option<String>,
        inner_class: bool,
    ) -> Result<DataClass, CodegenError> {
        if info.kind == Kind::Class {
            self.reporter.warn(
                info.symbol.clone(),
                "classes should not be exposed in the protocol because they don't serialize to JSON",
            );
        }
        let classifier = self.classifier();
        let member_symbols =
            classifier.info_properties(self.reporter, &self.sibling_properties, info)?;

        let mut generated_names = HashSet::new();
        let mut members = Vec::new();
        let mut enums = Vec::new();
        for member_symbol in member_symbols {
            if self
                .tables
                .ignored_properties
                .iter()
                .any(|matcher| member_symbol.contains(matcher))
            {
                continue;
            }
            if member_symbol.ends_with("().") {
                // Method members have no meaningful JSON serialization; they
                // leak in when a class escapes into the protocol.
                continue;
            }
            let member = self.symtab.info(&member_symbol)?.clone();
            if !generated_names.insert(member.display_name.clone()) {
                continue;
            }
            let Some(Signature::Value(value)) = &member.signature else {
                return Err(CodegenError::NotValueSignature {
                    symbol: member.symbol.clone(),
                });
            };
            if matches!(value.tpe, Type::Lambda) {
                self.reporter.warn(
                    member_symbol.clone(),
                    format!(
                        "ignoring property '{}' because it does not serialize correctly to JSON",
                        member.display_name
                    ),
                );
                continue;
            }
            let member_type = value.tpe.clone();
            let formatter = self.formatter();
            if formatter.is_ignored_type(&member_type) {
                continue;
            }
            let mut type_syntax =
                formatter.jsonrpc_type_name(&member, &member_type, TypePosition::Parameter)?;
            let constants = self
                .classifier()
                .string_constants_from_info(&self.sibling_properties, &member)?;
            for constant in &constants {
                self.string_literal_constants.insert(constant.clone());
            }
            if !constants.is_empty() && type_syntax.starts_with("String") {
                let enum_name = formatter.enum_type_name(&member.display_name);
                type_syntax = format!("{enum_name}{}", formatter.nullable_syntax(&member_type));
                enums.push(self.enum_def(enum_name, &constants));
            } else if let Err(error) =
                self.queue_class_like_type(&member_type, &member, TypePosition::Parameter)
            {
                self.reporter.error(
                    member_symbol.clone(),
                    format!(
                        "error handling member '{}'; the enclosing class is generated without \
                         this property: {error}",
                        member.symbol
                    ),
                );
                continue;
            }
            members.push(DataClassMember {
                wire_name: member.display_name.clone(),
                field_name: self.formatter().format_field_name(&member.display_name),
                type_syntax,
                nullable: self.formatter().is_nullable(&member_type),
                one_of: constants,
            });
        }

        Ok(DataClass {
            name,
            members,
            enums,
            parent_class,
            inner_class,
        })
    }
}

/// Clears and recreates the output directory. A failed run can otherwise
/// leave stale files from a previous generation behind.
fn reset_output_path(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    fs::create_dir_all(path)
}
