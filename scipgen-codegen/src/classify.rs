//! Type classification: string-type detection, visible properties, and
//! reachable string constants.
//!
//! These are recursive queries over the symbol table. They never mutate
//! resolution state; the only side effects are diagnostics for shapes that
//! have no meaningful answer.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use scipgen_scip::{Kind, Signature, SymbolInformation, SymbolTable, Type};

use crate::diagnostics::Reporter;
use crate::error::CodegenError;
use crate::keywords::typescript_keyword;
use crate::options::ProtocolTables;

/// Sibling registrations produced by the property-union merge: the merged
/// canonical property symbol mapped to the sibling property symbols whose
/// literal sets it aggregates.
pub type SiblingProperties = HashMap<String, Vec<String>>;

/// Pure classification queries over a symbol table.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    /// Shared symbol table.
    pub symtab: &'a SymbolTable,
    /// Symbol-matching policy.
    pub tables: &'a ProtocolTables,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier over the given table and policy.
    #[must_use]
    pub fn new(symtab: &'a SymbolTable, tables: &'a ProtocolTables) -> Self {
        Self { symtab, tables }
    }

    /// Whether a type is a string type: a string-literal constant, a union of
    /// string types, an intersection containing the `string` keyword, or a
    /// reference whose target is itself string-typed (through aliases and
    /// string-valued enums).
    pub fn is_string_type(&self, tpe: &Type) -> Result<bool, CodegenError> {
        match tpe {
            Type::Constant(constant) => {
                Ok(matches!(constant.constant, scipgen_scip::Constant::String(_)))
            }
            Type::Union(union) => {
                for arm in &union.types {
                    if !self.is_string_type(arm)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Type::Intersection(intersection) => {
                Ok(intersection.types.iter().any(|member| match member {
                    Type::Ref(type_ref) => type_ref.symbol == typescript_keyword("string"),
                    _ => false,
                }))
            }
            Type::Ref(type_ref) => {
                if type_ref.symbol == typescript_keyword("string") {
                    return Ok(true);
                }
                self.is_string_type_info(self.symtab.info(&type_ref.symbol)?)
            }
            Type::Structural(_) | Type::Lambda => Ok(false),
        }
    }

    /// [`Classifier::is_string_type`] over a declaration.
    pub fn is_string_type_info(&self, info: &SymbolInformation) -> Result<bool, CodegenError> {
        match &info.signature {
            Some(Signature::Value(value)) => self.is_string_type(&value.tpe),
            Some(Signature::Type(type_signature))
                if type_signature.type_parameters.symlinks.is_empty() =>
            {
                self.is_string_type(&type_signature.lower_bound)
            }
            Some(Signature::Class(class)) if info.kind == Kind::Enum => {
                for member in &class.declarations.symlinks {
                    if !self.is_string_type_info(self.symtab.info(member)?)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Whether two property declarations may be merged under one name: both
    /// string-typed, or structurally identical signatures.
    pub fn compatible_signatures(
        &self,
        a: &SymbolInformation,
        b: &SymbolInformation,
    ) -> Result<bool, CodegenError> {
        if self.is_string_type_info(a)? && self.is_string_type_info(b)? {
            return Ok(true);
        }
        Ok(a.signature == b.signature)
    }

    /// The member symbols visible on a type.
    ///
    /// Non-class-like types (literals, lambdas) have no properties; that case
    /// is reported as a diagnostic and yields an empty list, so callers must
    /// guard against it higher up the call stack.
    pub fn properties(
        &self,
        reporter: &mut Reporter,
        siblings: &SiblingProperties,
        tpe: &Type,
    ) -> Result<Vec<String>, CodegenError> {
        match tpe {
            Type::Structural(structural) => Ok(structural.declarations.symlinks.clone()),
            Type::Intersection(intersection) => {
                let mut result = Vec::new();
                for member in &intersection.types {
                    result.extend(self.properties(reporter, siblings, member)?);
                }
                Ok(result)
            }
            Type::Union(union) => {
                let mut result = Vec::new();
                for arm in &union.types {
                    result.extend(self.properties(reporter, siblings, arm)?);
                }
                Ok(result)
            }
            Type::Ref(type_ref) => {
                if type_ref.symbol.ends_with(&self.tables.pick_suffix) {
                    return self.filtered_properties(reporter, siblings, tpe, true);
                }
                if type_ref.symbol.ends_with(&self.tables.omit_suffix) {
                    return self.filtered_properties(reporter, siblings, tpe, false);
                }
                self.info_properties(reporter, siblings, self.symtab.info(&type_ref.symbol)?)
            }
            Type::Constant(_) | Type::Lambda => {
                reporter.error("", format!("type has no properties: {tpe:?}"));
                Ok(Vec::new())
            }
        }
    }

    /// The member symbols visible on a declaration: parent properties plus
    /// own declarations for classes, the underlying type's properties for
    /// aliases and values.
    pub fn info_properties(
        &self,
        reporter: &mut Reporter,
        siblings: &SiblingProperties,
        info: &SymbolInformation,
    ) -> Result<Vec<String>, CodegenError> {
        match &info.signature {
            Some(Signature::Class(class)) => {
                let mut result = Vec::new();
                for parent in &class.parents {
                    result.extend(self.properties(reporter, siblings, parent)?);
                }
                result.extend(class.declarations.symlinks.iter().cloned());
                Ok(result)
            }
            Some(Signature::Type(type_signature)) => {
                self.properties(reporter, siblings, &type_signature.lower_bound)
            }
            Some(Signature::Value(value)) => self.properties(reporter, siblings, &value.tpe),
            _ => {
                reporter.error(info.symbol.clone(), format!("info has no properties: {info:?}"));
                Ok(Vec::new())
            }
        }
    }

    /// `Pick<T, K>` / `Omit<T, K>`: the base type's properties filtered by
    /// membership of the display name in K's string-constant set.
    fn filtered_properties(
        &self,
        reporter: &mut Reporter,
        siblings: &SiblingProperties,
        tpe: &Type,
        keep_matching: bool,
    ) -> Result<Vec<String>, CodegenError> {
        let Type::Ref(type_ref) = tpe else {
            unreachable!("filtered_properties is only called on references");
        };
        let [base, keys] = type_ref.type_arguments.as_slice() else {
            return Err(CodegenError::RecordArity {
                symbol: type_ref.symbol.clone(),
                type_arguments: type_ref.type_arguments.len(),
            });
        };
        let constants: HashSet<String> = self
            .string_constants_from_type(siblings, keys)?
            .into_iter()
            .collect();
        let mut result = Vec::new();
        for property in self.properties(reporter, siblings, base)? {
            let display_name = &self.symtab.info(&property)?.display_name;
            if constants.contains(display_name) == keep_matching {
                result.push(property);
            }
        }
        Ok(result)
    }

    /// Every string literal reachable from a declaration through unions,
    /// value types and enum members, in discovery order. The sibling table
    /// lets merged discriminated-union properties contribute their combined
    /// literal set.
    pub fn string_constants_from_info(
        &self,
        siblings: &SiblingProperties,
        info: &SymbolInformation,
    ) -> Result<Vec<String>, CodegenError> {
        let mut collector = ConstantCollector {
            classifier: *self,
            siblings,
            result: IndexSet::new(),
            visited: HashSet::new(),
        };
        collector.visit_info(info)?;
        Ok(collector.result.into_iter().collect())
    }

    /// [`Classifier::string_constants_from_info`] over a bare type.
    pub fn string_constants_from_type(
        &self,
        siblings: &SiblingProperties,
        tpe: &Type,
    ) -> Result<Vec<String>, CodegenError> {
        self.string_constants_from_info(
            siblings,
            &SymbolInformation::for_value("", "", tpe.clone()),
        )
    }
}

/// Depth-first literal collection with a visited set keyed by symbol, so that
/// cyclic type-alias graphs terminate.
struct ConstantCollector<'a> {
    classifier: Classifier<'a>,
    siblings: &'a SiblingProperties,
    result: IndexSet<String>,
    visited: HashSet<String>,
}

impl ConstantCollector<'_> {
    fn visit_info(&mut self, info: &SymbolInformation) -> Result<(), CodegenError> {
        if !self.visited.insert(info.symbol.clone()) {
            return Ok(());
        }
        if let Some(sibling_symbols) = self.siblings.get(&info.symbol) {
            for sibling in sibling_symbols.clone() {
                let sibling_info = self.classifier.symtab.info(&sibling)?.clone();
                self.visit_info(&sibling_info)?;
            }
        }
        match &info.signature {
            Some(Signature::Value(value)) => self.visit_type(&value.tpe.clone()),
            Some(Signature::Type(type_signature)) => {
                self.visit_type(&type_signature.lower_bound.clone())
            }
            Some(Signature::Class(class)) if info.kind == Kind::Enum => {
                for member in class.declarations.symlinks.clone() {
                    let member_info = self.classifier.symtab.info(&member)?.clone();
                    self.visit_info(&member_info)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn visit_type(&mut self, tpe: &Type) -> Result<(), CodegenError> {
        match tpe {
            Type::Constant(_) => {
                if let Some(value) = tpe.as_string_constant() {
                    self.result.insert(value.to_string());
                }
                Ok(())
            }
            Type::Union(union) => {
                for arm in &union.types {
                    self.visit_type(arm)?;
                }
                Ok(())
            }
            Type::Ref(type_ref) => {
                let info = self.classifier.symtab.info(&type_ref.symbol)?.clone();
                self.visit_info(&info)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scipgen_scip::{
        ClassSignature, Document, Index, IntersectionType, Scope, TypeSignature, UnionType,
        ValueSignature,
    };
    use scipgen_scip::Constant;

    use crate::diagnostics::Severity;

    fn symbol(descriptor: &str) -> String {
        format!("scip-typescript npm pkg 1.0.0 src/`types.ts`/{descriptor}")
    }

    fn load(symbols: Vec<SymbolInformation>) -> SymbolTable {
        let mut all = symbols;
        all.push(SymbolInformation {
            symbol: typescript_keyword("string"),
            display_name: "string".to_string(),
            ..SymbolInformation::default()
        });
        let index = Index {
            documents: vec![Document {
                relative_path: "src/types.ts".to_string(),
                symbols: all,
                ..Document::default()
            }],
            ..Index::default()
        };
        SymbolTable::load(&index).expect("load")
    }

    fn alias(descriptor: &str, lower_bound: Type) -> SymbolInformation {
        SymbolInformation {
            symbol: symbol(descriptor),
            display_name: descriptor.trim_end_matches('#').to_string(),
            kind: Kind::TypeAlias,
            signature: Some(Signature::Type(TypeSignature {
                type_parameters: Scope::default(),
                lower_bound,
            })),
        }
    }

    #[test]
    fn test_string_literal_is_string_type() {
        let tables = ProtocolTables::default();
        let symtab = load(vec![]);
        let classifier = Classifier::new(&symtab, &tables);
        assert!(classifier
            .is_string_type(&Type::string_constant("a"))
            .expect("classify"));
    }

    #[test]
    fn test_union_of_string_literals_is_string_type() {
        let tables = ProtocolTables::default();
        let symtab = load(vec![]);
        let classifier = Classifier::new(&symtab, &tables);
        let union = Type::union(vec![
            Type::string_constant("a"),
            Type::string_constant("b"),
        ]);
        assert!(classifier.is_string_type(&union).expect("classify"));
    }

    #[test]
    fn test_mixed_literal_union_is_not_string_type() {
        let tables = ProtocolTables::default();
        let symtab = load(vec![]);
        let classifier = Classifier::new(&symtab, &tables);
        let union = Type::union(vec![
            Type::string_constant("a"),
            Type::Constant(scipgen_scip::ConstantType {
                constant: Constant::Int(1),
            }),
        ]);
        assert!(!classifier.is_string_type(&union).expect("classify"));
    }

    #[test]
    fn test_intersection_with_string_keyword_is_string_type() {
        let tables = ProtocolTables::default();
        let symtab = load(vec![]);
        let classifier = Classifier::new(&symtab, &tables);
        let intersection = Type::Intersection(IntersectionType {
            types: vec![
                Type::reference(typescript_keyword("string")),
                Type::string_constant("branded"),
            ],
        });
        assert!(classifier.is_string_type(&intersection).expect("classify"));
    }

    #[test]
    fn test_alias_and_string_enum_are_string_types() {
        let member_a = SymbolInformation {
            symbol: symbol("Color#Red."),
            display_name: "Red".to_string(),
            kind: Kind::EnumMember,
            signature: Some(Signature::Value(ValueSignature {
                tpe: Type::string_constant("red"),
            })),
        };
        let color_enum = SymbolInformation {
            symbol: symbol("Color#"),
            display_name: "Color".to_string(),
            kind: Kind::Enum,
            signature: Some(Signature::Class(ClassSignature {
                parents: Vec::new(),
                declarations: Scope {
                    symlinks: vec![symbol("Color#Red.")],
                },
            })),
        };
        let string_alias = alias("Name#", Type::reference(typescript_keyword("string")));
        let tables = ProtocolTables::default();
        let symtab = load(vec![member_a, color_enum, string_alias]);
        let classifier = Classifier::new(&symtab, &tables);

        assert!(classifier
            .is_string_type(&Type::reference(symbol("Color#")))
            .expect("classify"));
        assert!(classifier
            .is_string_type(&Type::reference(symbol("Name#")))
            .expect("classify"));
    }

    #[test]
    fn test_properties_flatten_parents_and_unions() {
        let parent = SymbolInformation {
            symbol: symbol("Base#"),
            display_name: "Base".to_string(),
            kind: Kind::Interface,
            signature: Some(Signature::Class(ClassSignature {
                parents: Vec::new(),
                declarations: Scope {
                    symlinks: vec![symbol("Base#id.")],
                },
            })),
        };
        let child = SymbolInformation {
            symbol: symbol("Child#"),
            display_name: "Child".to_string(),
            kind: Kind::Interface,
            signature: Some(Signature::Class(ClassSignature {
                parents: vec![Type::reference(symbol("Base#"))],
                declarations: Scope {
                    symlinks: vec![symbol("Child#name.")],
                },
            })),
        };
        let tables = ProtocolTables::default();
        let symtab = load(vec![parent, child]);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);

        let props = classifier
            .properties(
                &mut reporter,
                &SiblingProperties::new(),
                &Type::reference(symbol("Child#")),
            )
            .expect("properties");
        assert_eq!(props, vec![symbol("Base#id."), symbol("Child#name.")]);

        let union = Type::union(vec![
            Type::reference(symbol("Base#")),
            Type::reference(symbol("Child#")),
        ]);
        let props = classifier
            .properties(&mut reporter, &SiblingProperties::new(), &union)
            .expect("properties");
        assert_eq!(props.len(), 3);
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_properties_of_literal_reports_diagnostic() {
        let tables = ProtocolTables::default();
        let symtab = load(vec![]);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let props = classifier
            .properties(
                &mut reporter,
                &SiblingProperties::new(),
                &Type::string_constant("a"),
            )
            .expect("properties");
        assert!(props.is_empty());
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn test_pick_filters_properties_by_constant_set() {
        let base = SymbolInformation {
            symbol: symbol("Base#"),
            display_name: "Base".to_string(),
            kind: Kind::Interface,
            signature: Some(Signature::Class(ClassSignature {
                parents: Vec::new(),
                declarations: Scope {
                    symlinks: vec![symbol("Base#id."), symbol("Base#name.")],
                },
            })),
        };
        let id_prop = SymbolInformation::for_value(
            symbol("Base#id."),
            "id",
            Type::reference(typescript_keyword("string")),
        );
        let name_prop = SymbolInformation::for_value(
            symbol("Base#name."),
            "name",
            Type::reference(typescript_keyword("string")),
        );
        let tables = ProtocolTables::default();
        let pick_symbol = format!("scip-typescript npm typescript 5.0.0{}", tables.pick_suffix);
        let symtab = load(vec![
            base,
            id_prop,
            name_prop,
            SymbolInformation {
                symbol: pick_symbol.clone(),
                display_name: "Pick".to_string(),
                ..SymbolInformation::default()
            },
        ]);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);

        let pick = Type::Ref(scipgen_scip::TypeRef {
            symbol: pick_symbol,
            type_arguments: vec![
                Type::reference(symbol("Base#")),
                Type::string_constant("id"),
            ],
        });
        let props = classifier
            .properties(&mut reporter, &SiblingProperties::new(), &pick)
            .expect("properties");
        assert_eq!(props, vec![symbol("Base#id.")]);
    }

    #[test]
    fn test_string_constants_terminate_on_cycles() {
        let a = alias(
            "A#",
            Type::union(vec![
                Type::string_constant("a"),
                Type::reference(symbol("B#")),
            ]),
        );
        let b = alias(
            "B#",
            Type::union(vec![
                Type::string_constant("b"),
                Type::reference(symbol("A#")),
            ]),
        );
        let tables = ProtocolTables::default();
        let symtab = load(vec![a.clone(), b]);
        let classifier = Classifier::new(&symtab, &tables);
        let constants = classifier
            .string_constants_from_info(&SiblingProperties::new(), &a)
            .expect("constants");
        assert_eq!(constants, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_string_constants_include_siblings() {
        let canonical = SymbolInformation::for_value(
            symbol("A#kind."),
            "kind",
            Type::string_constant("one"),
        );
        let sibling = SymbolInformation::for_value(
            symbol("B#kind."),
            "kind",
            Type::string_constant("two"),
        );
        let tables = ProtocolTables::default();
        let symtab = load(vec![canonical.clone(), sibling]);
        let classifier = Classifier::new(&symtab, &tables);
        let mut siblings = SiblingProperties::new();
        siblings.insert(symbol("A#kind."), vec![symbol("B#kind.")]);
        let constants = classifier
            .string_constants_from_info(&siblings, &canonical)
            .expect("constants");
        assert_eq!(constants, vec!["two".to_string(), "one".to_string()]);
    }

    #[test]
    fn test_compatible_signatures() {
        let a = SymbolInformation::for_value(symbol("A#x."), "x", Type::string_constant("a"));
        let b = SymbolInformation::for_value(symbol("B#x."), "x", Type::string_constant("b"));
        let c = SymbolInformation::for_value(
            symbol("C#x."),
            "x",
            Type::Constant(scipgen_scip::ConstantType {
                constant: Constant::Int(3),
            }),
        );
        let tables = ProtocolTables::default();
        let symtab = load(vec![]);
        let classifier = Classifier::new(&symtab, &tables);
        // Different literals, both string-typed: compatible.
        assert!(classifier.compatible_signatures(&a, &b).expect("classify"));
        // String vs number: incompatible.
        assert!(!classifier.compatible_signatures(&a, &c).expect("classify"));
        // Identical signatures: compatible.
        assert!(classifier.compatible_signatures(&c, &c).expect("classify"));
    }
}
