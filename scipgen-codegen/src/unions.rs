//! Discriminated-union inference.
//!
//! Given a type alias over a union, finds a property name that carries a
//! literal constant on every union arm. When one exists the alias is emitted
//! as a sealed hierarchy; otherwise it falls through to the property-union
//! merge strategy.

use indexmap::IndexMap;

use scipgen_scip::{Constant, Signature, SymbolInformation, Type};

use crate::classify::{Classifier, SiblingProperties};
use crate::diagnostics::Reporter;
use crate::error::CodegenError;

/// A literal constant usable as a discriminator value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// String literal.
    String(String),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Boolean(bool),
}

impl ConstantValue {
    /// Source-literal rendering for deserializer branches, e.g. `"circle"`,
    /// `42`, `true`. Identical across the target languages.
    #[must_use]
    pub fn literal(&self) -> String {
        match self {
            Self::String(value) => format!("\"{value}\""),
            Self::Int(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
        }
    }

    /// Unquoted rendering, used when deriving synthetic type names.
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            Self::Int(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
        }
    }
}

/// Runtime accessor family a deserializer must use for a discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorKind {
    /// String-valued discriminator.
    String,
    /// Numeric discriminator.
    Number,
    /// Boolean discriminator.
    Boolean,
}

/// One arm of a discriminated union.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatedUnionMember {
    /// The literal carried by the discriminator property on this arm.
    pub value: ConstantValue,
    /// The arm's type.
    pub tpe: Type,
}

/// A union alias together with its inferred discriminator.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatedUnion {
    /// Symbol of the aliased union.
    pub symbol: String,
    /// Property name discriminating all arms.
    pub discriminator_display_name: String,
    /// One entry per (flattened) union arm, in arm order.
    pub members: Vec<DiscriminatedUnionMember>,
}

impl DiscriminatedUnion {
    /// The accessor family of this union's discriminator, taken from the
    /// first member's literal.
    #[must_use]
    pub fn kind(&self) -> DiscriminatorKind {
        match self.members.first().map(|member| &member.value) {
            Some(ConstantValue::Int(_)) => DiscriminatorKind::Number,
            Some(ConstantValue::Boolean(_)) => DiscriminatorKind::Boolean,
            _ => DiscriminatorKind::String,
        }
    }
}

/// The literal constant of a type, if it is one a discriminator can use.
#[must_use]
pub fn literal_constant(tpe: &Type) -> Option<ConstantValue> {
    match tpe {
        Type::Constant(constant_type) => match &constant_type.constant {
            Constant::String(value) => Some(ConstantValue::String(value.clone())),
            Constant::Int(value) => Some(ConstantValue::Int(*value)),
            Constant::Boolean(value) => Some(ConstantValue::Boolean(*value)),
            Constant::Double(_) => None,
        },
        _ => None,
    }
}

/// Flattens nested unions: an arm that references another union-valued alias
/// is replaced by that alias's arms, recursively.
pub fn union_arms(classifier: Classifier<'_>, tpe: &Type) -> Result<Vec<Type>, CodegenError> {
    let mut result = Vec::new();
    collect_arms(classifier, tpe, &mut result)?;
    Ok(result)
}

fn collect_arms(
    classifier: Classifier<'_>,
    tpe: &Type,
    result: &mut Vec<Type>,
) -> Result<(), CodegenError> {
    let Type::Union(union) = tpe else {
        return Ok(());
    };
    for arm in &union.types {
        if let Type::Ref(type_ref) = arm {
            let info = classifier.symtab.info(&type_ref.symbol)?;
            if let Some(Signature::Type(type_signature)) = &info.signature {
                if matches!(type_signature.lower_bound, Type::Union(_)) {
                    let lower_bound = type_signature.lower_bound.clone();
                    collect_arms(classifier, &lower_bound, result)?;
                    continue;
                }
            }
        }
        result.push(arm.clone());
    }
    Ok(())
}

/// Attempts to infer a discriminated union from a type-alias declaration.
///
/// A property name qualifies as the discriminator iff every flattened arm
/// carries a literal under that name. The first qualifying candidate in
/// discovery order wins; candidate order is insertion order over the arm
/// traversal, which makes the pick deterministic for a given index.
pub fn discriminated_union(
    classifier: Classifier<'_>,
    reporter: &mut Reporter,
    siblings: &SiblingProperties,
    info: &SymbolInformation,
) -> Result<Option<DiscriminatedUnion>, CodegenError> {
    let Some(Signature::Type(type_signature)) = &info.signature else {
        return Ok(None);
    };
    let lower_bound = &type_signature.lower_bound;
    match lower_bound {
        Type::Union(union) if !union.types.is_empty() => {}
        _ => return Ok(None),
    }

    let arms = union_arms(classifier, lower_bound)?;
    let mut candidates: IndexMap<String, usize> = IndexMap::new();
    let mut members: IndexMap<String, Vec<DiscriminatedUnionMember>> = IndexMap::new();
    for arm in &arms {
        for property_symbol in classifier.properties(reporter, siblings, arm)? {
            let property = classifier.symtab.info(&property_symbol)?;
            let Some(Signature::Value(value)) = &property.signature else {
                continue;
            };
            let Some(literal) = literal_constant(&value.tpe) else {
                continue;
            };
            *candidates.entry(property.display_name.clone()).or_insert(0) += 1;
            members
                .entry(property.display_name.clone())
                .or_default()
                .push(DiscriminatedUnionMember {
                    value: literal,
                    tpe: arm.clone(),
                });
        }
    }

    for (candidate, count) in &candidates {
        if *count == arms.len() {
            return Ok(Some(DiscriminatedUnion {
                symbol: info.symbol.clone(),
                discriminator_display_name: candidate.clone(),
                members: members.shift_remove(candidate).unwrap_or_default(),
            }));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scipgen_scip::{Document, Index, Scope, StructuralType, SymbolTable, TypeSignature};

    use crate::diagnostics::Severity;
    use crate::options::ProtocolTables;

    fn symbol(descriptor: &str) -> String {
        format!("scip-typescript npm pkg 1.0.0 src/`shapes.ts`/{descriptor}")
    }

    fn property(owner: &str, name: &str, tpe: Type) -> SymbolInformation {
        SymbolInformation::for_value(symbol(&format!("{owner}#{name}.")), name, tpe)
    }

    fn structural(members: &[&str]) -> Type {
        Type::Structural(StructuralType {
            declarations: Scope {
                symlinks: members.iter().map(|member| symbol(member)).collect(),
            },
        })
    }

    fn alias(descriptor: &str, lower_bound: Type) -> SymbolInformation {
        SymbolInformation {
            symbol: symbol(descriptor),
            display_name: descriptor.trim_end_matches('#').to_string(),
            signature: Some(Signature::Type(TypeSignature {
                type_parameters: Scope::default(),
                lower_bound,
            })),
            ..SymbolInformation::default()
        }
    }

    fn load(symbols: Vec<SymbolInformation>) -> SymbolTable {
        let index = Index {
            documents: vec![Document {
                relative_path: "src/shapes.ts".to_string(),
                symbols,
                ..Document::default()
            }],
            ..Index::default()
        };
        SymbolTable::load(&index).expect("load")
    }

    fn shape_symbols() -> Vec<SymbolInformation> {
        vec![
            property("Circle", "kind", Type::string_constant("circle")),
            property("Circle", "r", Type::reference(crate::keywords::typescript_keyword("number"))),
            property("Square", "kind", Type::string_constant("square")),
            property("Square", "s", Type::reference(crate::keywords::typescript_keyword("number"))),
            alias(
                "Shape#",
                Type::union(vec![
                    structural(&["Circle#kind.", "Circle#r."]),
                    structural(&["Square#kind.", "Square#s."]),
                ]),
            ),
        ]
    }

    #[test]
    fn test_discriminator_found_on_all_arms() {
        let tables = ProtocolTables::default();
        let symtab = load(shape_symbols());
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let info = symtab.info(&symbol("Shape#")).expect("info").clone();

        let union = discriminated_union(classifier, &mut reporter, &SiblingProperties::new(), &info)
            .expect("resolve")
            .expect("discriminated");
        assert_eq!(union.discriminator_display_name, "kind");
        assert_eq!(union.members.len(), 2);
        assert_eq!(union.members[0].value, ConstantValue::String("circle".to_string()));
        assert_eq!(union.members[1].value, ConstantValue::String("square".to_string()));
        assert_eq!(union.kind(), DiscriminatorKind::String);
    }

    #[test]
    fn test_candidate_missing_on_one_arm_is_rejected() {
        // Three arms, one of which lacks the `kind` property: no candidate
        // reaches the full arm count, so inference must fail.
        let mut symbols = shape_symbols();
        symbols.push(property("Blob", "size", Type::string_constant("big")));
        symbols.push(alias(
            "Shape3#",
            Type::union(vec![
                structural(&["Circle#kind.", "Circle#r."]),
                structural(&["Square#kind.", "Square#s."]),
                structural(&["Blob#size."]),
            ]),
        ));
        let tables = ProtocolTables::default();
        let symtab = load(symbols);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let info = symtab.info(&symbol("Shape3#")).expect("info").clone();

        let union = discriminated_union(classifier, &mut reporter, &SiblingProperties::new(), &info)
            .expect("resolve");
        assert!(union.is_none());
    }

    #[test]
    fn test_nested_union_aliases_are_flattened() {
        let mut symbols = shape_symbols();
        symbols.push(property("Dot", "kind", Type::string_constant("dot")));
        symbols.push(alias(
            "Outer#",
            Type::union(vec![
                Type::reference(symbol("Shape#")),
                structural(&["Dot#kind."]),
            ]),
        ));
        let tables = ProtocolTables::default();
        let symtab = load(symbols);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let info = symtab.info(&symbol("Outer#")).expect("info").clone();

        let union = discriminated_union(classifier, &mut reporter, &SiblingProperties::new(), &info)
            .expect("resolve")
            .expect("discriminated");
        assert_eq!(union.members.len(), 3);
        assert_eq!(union.members[2].value, ConstantValue::String("dot".to_string()));
    }

    #[test]
    fn test_first_qualifying_candidate_wins_in_insertion_order() {
        // Both `kind` and `tag` qualify on every arm; `kind` is discovered
        // first and must win.
        let symbols = vec![
            property("A", "kind", Type::string_constant("a")),
            property("A", "tag", Type::string_constant("ta")),
            property("B", "kind", Type::string_constant("b")),
            property("B", "tag", Type::string_constant("tb")),
            alias(
                "Either#",
                Type::union(vec![
                    structural(&["A#kind.", "A#tag."]),
                    structural(&["B#kind.", "B#tag."]),
                ]),
            ),
        ];
        let tables = ProtocolTables::default();
        let symtab = load(symbols);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let info = symtab.info(&symbol("Either#")).expect("info").clone();

        let union = discriminated_union(classifier, &mut reporter, &SiblingProperties::new(), &info)
            .expect("resolve")
            .expect("discriminated");
        assert_eq!(union.discriminator_display_name, "kind");
    }

    #[test]
    fn test_numeric_and_boolean_literals_discriminate() {
        let symbols = vec![
            property(
                "Ok",
                "code",
                Type::Constant(scipgen_scip::ConstantType {
                    constant: Constant::Int(0),
                }),
            ),
            property(
                "Err",
                "code",
                Type::Constant(scipgen_scip::ConstantType {
                    constant: Constant::Int(1),
                }),
            ),
            alias(
                "Status#",
                Type::union(vec![structural(&["Ok#code."]), structural(&["Err#code."])]),
            ),
        ];
        let tables = ProtocolTables::default();
        let symtab = load(symbols);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let info = symtab.info(&symbol("Status#")).expect("info").clone();

        let union = discriminated_union(classifier, &mut reporter, &SiblingProperties::new(), &info)
            .expect("resolve")
            .expect("discriminated");
        assert_eq!(union.kind(), DiscriminatorKind::Number);
        assert_eq!(union.members[0].value.literal(), "0");
    }

    #[test]
    fn test_non_union_alias_is_not_discriminated() {
        let symbols = vec![alias("Solo#", structural(&[]))];
        let tables = ProtocolTables::default();
        let symtab = load(symbols);
        let classifier = Classifier::new(&symtab, &tables);
        let mut reporter = Reporter::new(Severity::Warning);
        let info = symtab.info(&symbol("Solo#")).expect("info").clone();
        assert!(
            discriminated_union(classifier, &mut reporter, &SiblingProperties::new(), &info)
                .expect("resolve")
                .is_none()
        );
    }
}
