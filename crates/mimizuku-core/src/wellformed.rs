//! エンティティモデルの整合性検査
//!
//! Repairs what can be repaired (blank names, embedded spaces, unresolved
//! type names) and fails on everything else.

use crate::model::{EntityModel, Multiplicity, TypeRef};
use crate::report::{Diagnostic, ElementKind, WellFormednessReport};
use crate::ModelError;
use mimizuku_dl::Datatype;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Well-formedness checker trait
pub trait WellFormednessChecker {
    fn check(&self, model: &mut EntityModel) -> Result<WellFormednessReport, ModelError>;
}

/// Default well-formedness checker
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWellFormednessChecker;

impl WellFormednessChecker for DefaultWellFormednessChecker {
    fn check(&self, model: &mut EntityModel) -> Result<WellFormednessReport, ModelError> {
        let mut report = WellFormednessReport::default();

        assign_missing_names(model, &mut report);
        resolve_types(model)?;
        check_references(model)?;
        check_multiplicities(model)?;
        trim_names(model, &mut report);
        check_unique_classes(model)?;
        check_acyclic(model)?;

        debug!(
            classes = model.classes.len(),
            enums = model.enums.len(),
            diagnostics = report.diagnostics.len(),
            "well-formedness check passed"
        );
        Ok(report)
    }
}

fn is_blank(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed == "null"
}

/// Per-kind counters for generated names
#[derive(Default)]
struct NameGenerator {
    counters: HashMap<&'static str, usize>,
}

impl NameGenerator {
    fn repair(&mut self, kind: ElementKind, name: &mut String, report: &mut WellFormednessReport) {
        if !is_blank(name) {
            return;
        }
        let prefix = kind.generated_prefix();
        let counter = self.counters.entry(prefix).or_insert(0);
        *name = format!("{}_{}", prefix, counter);
        *counter += 1;

        warn!(kind = %kind, assigned = %name, "nameless element repaired");
        report.push(Diagnostic::NamelessElement {
            kind,
            assigned: name.clone(),
        });
    }
}

fn assign_missing_names(model: &mut EntityModel, report: &mut WellFormednessReport) {
    let mut names = NameGenerator::default();

    for class in &mut model.classes {
        names.repair(ElementKind::Class, &mut class.name, report);
        for attribute in &mut class.attributes {
            names.repair(ElementKind::Attribute, &mut attribute.name, report);
        }
        for operation in &mut class.operations {
            names.repair(ElementKind::Operation, &mut operation.name, report);
            for parameter in &mut operation.parameters {
                names.repair(ElementKind::Parameter, &mut parameter.name, report);
            }
        }
    }

    for enumeration in &mut model.enums {
        names.repair(ElementKind::Enumeration, &mut enumeration.name, report);
    }

    for class in &mut model.classes {
        for reference in &mut class.references {
            names.repair(ElementKind::Association, &mut reference.name, report);
        }
    }
}

/// Class names win over enum names, which win over datatype names
fn resolve_type_name(name: &str, classes: &HashSet<String>, enums: &HashSet<String>) -> Option<TypeRef> {
    if classes.contains(name) {
        Some(TypeRef::Class(name.to_string()))
    } else if enums.contains(name) {
        Some(TypeRef::Enum(name.to_string()))
    } else {
        name.parse::<Datatype>().ok().map(TypeRef::Primitive)
    }
}

fn resolve(ty: &TypeRef, classes: &HashSet<String>, enums: &HashSet<String>) -> Option<TypeRef> {
    match ty {
        TypeRef::Unresolved(name) => resolve_type_name(name, classes, enums),
        TypeRef::Class(name) if classes.contains(name) => Some(ty.clone()),
        TypeRef::Enum(name) if enums.contains(name) => Some(ty.clone()),
        TypeRef::Primitive(_) => Some(ty.clone()),
        _ => None,
    }
}

fn resolve_types(model: &mut EntityModel) -> Result<(), ModelError> {
    let classes: HashSet<String> = model.classes.iter().map(|c| c.name.clone()).collect();
    let enums: HashSet<String> = model.enums.iter().map(|e| e.name.clone()).collect();

    for class in &mut model.classes {
        for supertype in &class.supertypes {
            if !classes.contains(supertype) {
                return Err(ModelError::UnresolvedType {
                    element: class.name.clone(),
                    name: supertype.clone(),
                });
            }
        }

        for attribute in &mut class.attributes {
            let resolved = attribute.ty.as_ref().and_then(|ty| resolve(ty, &classes, &enums));
            match resolved {
                Some(ty) => attribute.ty = Some(ty),
                None => {
                    return Err(ModelError::TypelessAttribute {
                        class: class.name.clone(),
                        attribute: attribute.name.clone(),
                    })
                }
            }
        }

        for operation in &mut class.operations {
            for parameter in &mut operation.parameters {
                let resolved = parameter.ty.as_ref().and_then(|ty| resolve(ty, &classes, &enums));
                match resolved {
                    Some(ty) => parameter.ty = Some(ty),
                    None => {
                        return Err(ModelError::TypelessParameter {
                            class: class.name.clone(),
                            operation: operation.name.clone(),
                            parameter: parameter.name.clone(),
                        })
                    }
                }
            }

            if let Some(ty) = &operation.return_type {
                let resolved = resolve(ty, &classes, &enums).ok_or_else(|| ModelError::UnresolvedType {
                    element: format!("{}.{}", class.name, operation.name),
                    name: ty.name(),
                })?;
                operation.return_type = Some(resolved);
            }
        }

        for reference in &class.references {
            if !classes.contains(&reference.target) {
                return Err(ModelError::UnresolvedType {
                    element: format!("{}.{}", class.name, reference.name),
                    name: reference.target.clone(),
                });
            }
        }
    }

    Ok(())
}

fn check_references(model: &EntityModel) -> Result<(), ModelError> {
    for class in &model.classes {
        for reference in &class.references {
            let missing = || ModelError::MissingOpposite {
                owner: class.name.clone(),
                reference: reference.name.clone(),
            };
            if reference.opposite.as_deref().map_or(true, is_blank) {
                return Err(missing());
            }

            let (target, opposite) = model.opposite(reference).ok_or_else(missing)?;
            let points_back = opposite.opposite.as_deref() == Some(reference.name.as_str())
                && opposite.target == class.name;
            if !points_back {
                return Err(ModelError::NotOpposite {
                    left: format!("{}.{}", class.name, reference.name),
                    right: format!("{}.{}", target.name, opposite.name),
                });
            }
        }
    }
    Ok(())
}

fn check_multiplicities(model: &EntityModel) -> Result<(), ModelError> {
    for class in &model.classes {
        let bounds = class
            .attributes
            .iter()
            .map(|a| (&a.name, a.lower_bound, a.upper_bound))
            .chain(class.references.iter().map(|r| (&r.name, r.lower_bound, r.upper_bound)));

        for (name, lower, upper) in bounds {
            if Multiplicity::from_bounds(lower, upper).is_none() {
                return Err(ModelError::InvalidMultiplicity {
                    element: format!("{}.{}", class.name, name),
                    lower,
                    upper,
                });
            }
        }
    }
    Ok(())
}

fn strip_spaces(name: &mut String) -> Option<String> {
    if !name.contains(' ') {
        return None;
    }
    let original = name.clone();
    name.retain(|c| c != ' ');
    Some(original)
}

fn trim_names(model: &mut EntityModel, report: &mut WellFormednessReport) {
    let mut note = |kind: ElementKind, name: &mut String| {
        if let Some(original) = strip_spaces(name) {
            report.push(Diagnostic::NameTrimmed {
                kind,
                original,
                trimmed: name.clone(),
            });
        }
    };

    for class in &mut model.classes {
        note(ElementKind::Class, &mut class.name);
        for supertype in &mut class.supertypes {
            strip_spaces(supertype);
        }
        for attribute in &mut class.attributes {
            note(ElementKind::Attribute, &mut attribute.name);
            if let Some(ty) = &mut attribute.ty {
                strip_type_spaces(ty);
            }
        }
        for operation in &mut class.operations {
            note(ElementKind::Operation, &mut operation.name);
            if let Some(ty) = &mut operation.return_type {
                strip_type_spaces(ty);
            }
            for parameter in &mut operation.parameters {
                note(ElementKind::Parameter, &mut parameter.name);
                if let Some(ty) = &mut parameter.ty {
                    strip_type_spaces(ty);
                }
            }
        }
        for reference in &mut class.references {
            note(ElementKind::Association, &mut reference.name);
            strip_spaces(&mut reference.target);
            if let Some(opposite) = &mut reference.opposite {
                strip_spaces(opposite);
            }
        }
    }

    for enumeration in &mut model.enums {
        note(ElementKind::Enumeration, &mut enumeration.name);
        for literal in &mut enumeration.literals {
            strip_spaces(literal);
        }
    }
}

fn strip_type_spaces(ty: &mut TypeRef) {
    match ty {
        TypeRef::Class(name) | TypeRef::Enum(name) | TypeRef::Unresolved(name) => {
            strip_spaces(name);
        }
        TypeRef::Primitive(_) => {}
    }
}

fn check_unique_classes(model: &EntityModel) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for class in &model.classes {
        if !seen.insert(class.name.as_str()) {
            return Err(ModelError::DuplicateClass(class.name.clone()));
        }
    }
    Ok(())
}

fn check_acyclic(model: &EntityModel) -> Result<(), ModelError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit<'a>(
        model: &'a EntityModel,
        name: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
    ) -> Result<(), ModelError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(ModelError::InheritanceCycle(name.to_string())),
            None => {}
        }
        marks.insert(name, Mark::Visiting);
        if let Some(class) = model.class(name) {
            for supertype in &class.supertypes {
                visit(model, supertype, marks)?;
            }
        }
        marks.insert(name, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    for class in &model.classes {
        visit(model, &class.name, &mut marks)?;
    }
    Ok(())
}
