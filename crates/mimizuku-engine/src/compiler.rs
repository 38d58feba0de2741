//! 公理コンパイラ
//!
//! Compiles a checked [`EntityModel`] into a set of DL axioms:
//!
//! | model element | axioms |
//! |---|---|
//! | attribute `a: T` of `C` | `C ⊑ ∀a.T` plus cardinality |
//! | operation `f(): R` | `C ⊑ ∀ret.R ⊓ ≤1 ret` |
//! | operation `f(p₁…pₙ): R` | reified tuple concept `C_f` with functional roles |
//! | enumeration `E` | `E ≡ {l₁, …, lₙ}` |
//! | supertype `P` of `S` | `S ⊑ P` |
//! | association `(L, R)` | typing, inverse roles, cardinality from the opposite end |
//! | constraint on `C` | `C ⊑ E` where `E` is the resolved constraint |
//!
//! Attributes and operations are compiled for every class that sees them,
//! inherited ones included. References are compiled once, at the declaring
//! class.

use crate::config::{AssociationCardinality, CardinalityPolicy, CompilerConfig, ConstraintPolicy, InheritanceMode};
use crate::report::{ConstraintOutcome, ConstraintReport};
use crate::vocabulary::ModelVocabulary;
use crate::CompileError;
use mimizuku_core::{ClassEntity, EntityModel, Multiplicity, ReferenceKey, TypeRef};
use mimizuku_dl::{Axiom, ClassExpression, Datatype, DlOntology, NamingScheme, OwlIri, PropertyExpression, Renderer};
use mimizuku_ocl::ConstraintNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

/// Output of one compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilation {
    pub ontology: DlOntology,
    pub constraints: Vec<ConstraintReport>,
}

/// 公理コンパイラ
#[derive(Debug, Clone, Default)]
pub struct AxiomCompiler {
    config: CompilerConfig,
}

impl AxiomCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles `model`, which must have passed the well-formedness check
    pub fn compile(&self, model: &EntityModel) -> Result<Compilation, CompileError> {
        let naming = self.config.naming(&model.package);
        let mut session = Session {
            config: &self.config,
            model,
            naming: &naming,
            ontology: DlOntology::new(naming.ontology_iri()),
            constraints: Vec::new(),
        };

        info!(
            classes = model.classes.len(),
            enums = model.enums.len(),
            package = naming.package(),
            "compiling entity model"
        );

        for class in &model.classes {
            session.attributes(class)?;
            session.operations(class)?;
            session.supertypes(class);
        }
        if self.config.inheritance == InheritanceMode::DisjointCovering {
            session.covering();
        }
        session.enumerations();
        session.associations()?;
        session.invariants()?;

        info!(
            axioms = session.ontology.len(),
            constraints = session.constraints.len(),
            "entity model compiled"
        );
        Ok(Compilation {
            ontology: session.ontology,
            constraints: session.constraints,
        })
    }
}

/// Value range of a typed feature
enum Range {
    Data(Datatype),
    Concept(ClassExpression),
}

impl Range {
    fn role(&self, iri: OwlIri) -> PropertyExpression {
        match self {
            Range::Data(_) => PropertyExpression::DataProperty(iri),
            Range::Concept(_) => PropertyExpression::ObjectProperty(iri),
        }
    }

    fn all_values(&self, role: PropertyExpression) -> ClassExpression {
        match self {
            Range::Data(datatype) => ClassExpression::DataAllValuesFrom {
                property: role.iri().clone(),
                datatype: *datatype,
            },
            Range::Concept(concept) => ClassExpression::all_values_from(role, concept.clone()),
        }
    }

    fn some_values(&self, role: PropertyExpression) -> ClassExpression {
        match self {
            Range::Data(datatype) => ClassExpression::DataSomeValuesFrom {
                property: role.iri().clone(),
                datatype: *datatype,
            },
            Range::Concept(concept) => ClassExpression::some_values_from(role, concept.clone()),
        }
    }

    /// `≥1` for data roles, `∃r.⊤` for object roles
    fn required(&self, role: PropertyExpression) -> ClassExpression {
        match self {
            Range::Data(_) => ClassExpression::min_cardinality(1, role),
            Range::Concept(_) => ClassExpression::some_values_from(role, ClassExpression::Thing),
        }
    }
}

/// Min and max restrictions implied by `multiplicity`, if any
fn bounds(multiplicity: Multiplicity, role: &PropertyExpression) -> Vec<ClassExpression> {
    let min = (multiplicity.lower > 0).then(|| ClassExpression::min_cardinality(multiplicity.lower, role.clone()));
    let max = multiplicity
        .upper
        .map(|upper| ClassExpression::max_cardinality(upper, role.clone()));
    min.into_iter().chain(max).collect()
}

struct Session<'a> {
    config: &'a CompilerConfig,
    model: &'a EntityModel,
    naming: &'a NamingScheme,
    ontology: DlOntology,
    constraints: Vec<ConstraintReport>,
}

impl<'a> Session<'a> {
    fn add(&mut self, axiom: Axiom) {
        trace!(axiom = %Renderer::short().axiom(&axiom), "axiom");
        self.ontology.add_axiom(axiom);
    }

    fn concept(&self, class: &str) -> ClassExpression {
        ClassExpression::Named(self.naming.class(class))
    }

    fn range(&self, ty: Option<&TypeRef>, element: &str) -> Result<Range, CompileError> {
        match ty {
            Some(TypeRef::Primitive(datatype)) => Ok(Range::Data(*datatype)),
            Some(TypeRef::Class(name)) if self.model.class(name).is_some() => Ok(Range::Concept(self.concept(name))),
            Some(TypeRef::Enum(name)) if self.model.enumeration(name).is_some() => {
                Ok(Range::Concept(ClassExpression::Named(self.naming.enumeration(name))))
            }
            Some(ty) => Err(CompileError::Precondition(format!(
                "{} has unresolved type '{}'",
                element,
                ty.name()
            ))),
            None => Err(CompileError::Precondition(format!("{} has no type", element))),
        }
    }

    fn multiplicity(&self, lower: i32, upper: i32, element: &str) -> Result<Multiplicity, CompileError> {
        Multiplicity::from_bounds(lower, upper).ok_or_else(|| {
            CompileError::Precondition(format!("{} has invalid bounds [{}..{}]", element, lower, upper))
        })
    }

    fn attributes(&mut self, class: &ClassEntity) -> Result<(), CompileError> {
        let model = self.model;
        let concept = self.concept(&class.name);

        for attribute in model.all_attributes(&class.name) {
            let element = format!("{}.{}", class.name, attribute.name);
            let range = self.range(attribute.ty.as_ref(), &element)?;
            let role = range.role(self.naming.role(&class.name, &attribute.name));
            let multiplicity = self.multiplicity(attribute.lower_bound, attribute.upper_bound, &element)?;

            self.add(Axiom::sub_class_of(concept.clone(), range.all_values(role.clone())));
            for restriction in self.attribute_cardinality(multiplicity, &range, role) {
                self.add(Axiom::sub_class_of(concept.clone(), restriction));
            }
        }
        Ok(())
    }

    fn attribute_cardinality(
        &self,
        multiplicity: Multiplicity,
        range: &Range,
        role: PropertyExpression,
    ) -> Vec<ClassExpression> {
        if multiplicity.is_exactly_one() {
            return vec![ClassExpression::intersection_of([
                range.some_values(role.clone()),
                ClassExpression::max_cardinality(1, role),
            ])];
        }

        match multiplicity.upper {
            Some(upper) if multiplicity.lower > 0 => {
                let min = match self.config.attribute_cardinality {
                    CardinalityPolicy::Source => upper,
                    CardinalityPolicy::LowerBound => multiplicity.lower,
                };
                vec![ClassExpression::intersection_of([
                    ClassExpression::min_cardinality(min, role.clone()),
                    ClassExpression::max_cardinality(upper, role),
                ])]
            }
            _ => bounds(multiplicity, &role),
        }
    }

    fn operations(&mut self, class: &ClassEntity) -> Result<(), CompileError> {
        let model = self.model;
        let naming = self.naming;
        let concept = self.concept(&class.name);

        for operation in model.all_operations(&class.name) {
            let element = format!("{}.{}", class.name, operation.name);
            let result = match &operation.return_type {
                Some(ty) => Some((ty.name(), self.range(Some(ty), &element)?)),
                None => None,
            };
            let result_name = result.as_ref().map(|(name, _)| name.as_str());
            let result_role = |range: &Range| range.role(naming.return_role(&class.name, &operation.name, result_name));

            if operation.parameters.is_empty() {
                if let Some((_, range)) = &result {
                    let role = result_role(range);
                    self.add(Axiom::sub_class_of(
                        concept.clone(),
                        ClassExpression::intersection_of([
                            range.all_values(role.clone()),
                            ClassExpression::max_cardinality(1, role),
                        ]),
                    ));
                }
                continue;
            }

            let tuple = ClassExpression::Named(naming.operation_concept(&class.name, &operation.name, result_name));
            let this = PropertyExpression::ObjectProperty(naming.this_role(&class.name, &operation.name));

            let mut shape = vec![
                ClassExpression::some_values_from(this.clone(), ClassExpression::Thing),
                ClassExpression::max_cardinality(1, this.clone()),
            ];
            let mut typing = Vec::new();
            for parameter in &operation.parameters {
                let range = self.range(parameter.ty.as_ref(), &format!("{}({})", element, parameter.name))?;
                let role = range.role(naming.parameter_role(&class.name, &operation.name, &parameter.name));
                shape.push(range.required(role.clone()));
                shape.push(ClassExpression::max_cardinality(1, role.clone()));
                typing.push(range.all_values(role));
            }

            self.add(Axiom::sub_class_of(tuple.clone(), ClassExpression::intersection_of(shape)));
            self.add(Axiom::sub_class_of(tuple.clone(), ClassExpression::intersection_of(typing)));

            if let Some((_, range)) = &result {
                let outcome = ClassExpression::union_of([
                    ClassExpression::complement_of(tuple),
                    range.all_values(result_role(range)),
                ]);
                self.add(Axiom::sub_class_of(
                    concept.clone(),
                    ClassExpression::all_values_from(this.inverse(), outcome),
                ));
            }
        }
        Ok(())
    }

    fn supertypes(&mut self, class: &ClassEntity) {
        let concept = self.concept(&class.name);
        for supertype in &class.supertypes {
            let parent = self.concept(supertype);
            self.add(Axiom::sub_class_of(concept.clone(), parent));
        }
    }

    fn covering(&mut self) {
        let model = self.model;
        for class in &model.classes {
            let subclasses: Vec<ClassExpression> = model
                .direct_subclasses(&class.name)
                .into_iter()
                .map(|s| self.concept(&s.name))
                .collect();
            if subclasses.len() >= 2 {
                self.add(Axiom::disjoint_classes(subclasses.clone()));
            }
            if !subclasses.is_empty() {
                let parent = self.concept(&class.name);
                self.add(Axiom::sub_class_of(parent, ClassExpression::union_of(subclasses)));
            }
        }
    }

    fn enumerations(&mut self) {
        let model = self.model;
        for enumeration in &model.enums {
            let concept = ClassExpression::Named(self.naming.enumeration(&enumeration.name));
            let literals = enumeration.literals.iter().map(|l| self.naming.literal(l));
            let nominal = ClassExpression::one_of(literals);
            self.add(Axiom::equivalent_classes([concept, nominal]));
        }
    }

    fn associations(&mut self) -> Result<(), CompileError> {
        let model = self.model;
        let mut processed: HashSet<ReferenceKey> = HashSet::new();

        for class in &model.classes {
            for reference in &class.references {
                let key = ReferenceKey::new(class.name.clone(), reference.name.clone());
                if processed.contains(&key) {
                    continue;
                }
                let (target, opposite) = model
                    .opposite(reference)
                    .ok_or_else(|| CompileError::Precondition(format!("association {} has no opposite", key)))?;
                processed.insert(ReferenceKey::new(target.name.clone(), opposite.name.clone()));
                processed.insert(key);

                let left = PropertyExpression::ObjectProperty(self.naming.role(&class.name, &reference.name));
                let right = PropertyExpression::ObjectProperty(self.naming.role(&target.name, &opposite.name));

                self.add(Axiom::sub_class_of(
                    ClassExpression::Thing,
                    ClassExpression::intersection_of([
                        ClassExpression::all_values_from(left.clone(), self.concept(&target.name)),
                        ClassExpression::all_values_from(right.clone(), self.concept(&class.name)),
                    ]),
                ));
                self.add(Axiom::inverse_properties(left.clone(), right.clone()));

                let (left_end, right_end) = match self.config.association_cardinality {
                    AssociationCardinality::OppositeEnd => (opposite, reference),
                    AssociationCardinality::OwnEnd => (reference, opposite),
                };
                for (holder, role, end) in [(class, left, left_end), (target, right, right_end)] {
                    let element = format!("{}.{}", holder.name, end.name);
                    let multiplicity = self.multiplicity(end.lower_bound, end.upper_bound, &element)?;
                    let restrictions = bounds(multiplicity, &role);
                    if !restrictions.is_empty() {
                        let concept = self.concept(&holder.name);
                        self.add(Axiom::sub_class_of(concept, ClassExpression::intersection_of(restrictions)));
                    }
                }
            }
        }

        debug!(associations = processed.len() / 2, "associations compiled");
        Ok(())
    }

    fn invariants(&mut self) -> Result<(), CompileError> {
        let model = self.model;
        let config = self.config;
        let normalizer = config.normalizer();
        let vocabulary = ModelVocabulary::new(model, self.naming);

        for class in &model.classes {
            for detail in class.constraints(&config.constraint_sources) {
                let report = self.invariant(&normalizer, &vocabulary, class, &detail.key, &detail.value)?;
                self.constraints.push(report);
            }
        }
        Ok(())
    }

    fn invariant(
        &mut self,
        normalizer: &ConstraintNormalizer,
        vocabulary: &ModelVocabulary<'_>,
        class: &ClassEntity,
        name: &str,
        text: &str,
    ) -> Result<ConstraintReport, CompileError> {
        let mut report = ConstraintReport {
            class: class.name.clone(),
            name: name.to_string(),
            source: text.to_string(),
            normalized: None,
            rounds: None,
            expression: None,
            outcome: ConstraintOutcome::Emitted,
        };

        let resolved = normalizer.normalize(text).and_then(|normalized| {
            report.normalized = Some(normalized.text.clone());
            report.rounds = Some(normalized.rounds);
            normalizer.resolve_normalized(normalized, &class.name, vocabulary)
        });

        match resolved {
            Ok(resolved) => {
                report.expression = Some(Renderer::full().class(&resolved.expression));
                debug!(class = %class.name, constraint = name, "constraint resolved");
                let concept = self.concept(&class.name);
                self.add(Axiom::sub_class_of(concept, resolved.expression));
            }
            Err(error) if error.is_unsupported() || self.config.constraint_policy == ConstraintPolicy::Lenient => {
                warn!(class = %class.name, constraint = name, %error, "constraint skipped");
                report.outcome = ConstraintOutcome::Skipped {
                    reason: error.to_string(),
                };
            }
            Err(error) => {
                return Err(CompileError::Constraint {
                    class: class.name.clone(),
                    name: name.to_string(),
                    source: error,
                })
            }
        }
        Ok(report)
    }
}
