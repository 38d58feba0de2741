//! オブジェクトモデルの閉世界公理
//!
//! Extends a compiled ontology with one concept per object of an instance
//! model, closing both the population of every class and the links of every
//! association:
//!
//! - `o ⊑ C` for each object `o` grouped under class `C`
//! - `Disjoint(o₁, …, oₙ)` for each group with at least two objects
//! - `C ⊑ o₁ ⊔ … ⊔ oₙ` for each group with at least one object
//! - for each association role `r` from `A` to `B` and each object `s` of `A`:
//!   `s ⊑ =1 r.t` for every linked target `t`, and `s ⊑ ¬∃r.t` for every
//!   other object `t` of `B`
//!
//! # Cost
//!
//! The negative link axioms are quadratic: one per (source, non-linked
//! target) pair of every association, i.e. up to `|A| × |B|` axioms per
//! association. This is only practical for small object models.

use crate::CompileError;
use mimizuku_core::{EntityModel, InstanceModel, InstancePool, LinkPool};
use mimizuku_dl::{Axiom, ClassExpression, NamingScheme, PropertyExpression};
use std::collections::BTreeSet;
use tracing::debug;

/// 閉世界公理ジェネレーター
#[derive(Debug, Clone)]
pub struct InstanceAxiomGenerator {
    naming: NamingScheme,
}

impl InstanceAxiomGenerator {
    pub fn new(naming: NamingScheme) -> Self {
        Self { naming }
    }

    pub fn naming(&self) -> &NamingScheme {
        &self.naming
    }

    /// Validates `instances` against `model` and generates its axioms
    pub fn generate(&self, model: &EntityModel, instances: &InstanceModel) -> Result<Vec<Axiom>, CompileError> {
        let (pool, links) = instances.pools(model)?;
        Ok(self.axioms(model, &pool, &links))
    }

    /// Axioms for already built pools
    pub fn axioms(&self, model: &EntityModel, pool: &InstancePool, links: &LinkPool) -> Vec<Axiom> {
        let mut axioms = self.population(pool);
        let population = axioms.len();
        axioms.extend(self.link_closure(model, pool, links));
        debug!(
            population,
            links = axioms.len() - population,
            "instance axioms generated"
        );
        axioms
    }

    fn object(&self, id: &str) -> ClassExpression {
        ClassExpression::Named(self.naming.object(id))
    }

    fn population(&self, pool: &InstancePool) -> Vec<Axiom> {
        let mut axioms = Vec::new();
        for (class, ids) in pool.groups() {
            let concept = ClassExpression::Named(self.naming.class(class));
            let objects: Vec<ClassExpression> = ids.iter().map(|id| self.object(id)).collect();

            for object in &objects {
                axioms.push(Axiom::sub_class_of(object.clone(), concept.clone()));
            }
            if objects.len() >= 2 {
                axioms.push(Axiom::disjoint_classes(objects.clone()));
            }
            if !objects.is_empty() {
                axioms.push(Axiom::sub_class_of(concept, ClassExpression::union_of(objects)));
            }
        }
        axioms
    }

    fn link_closure(&self, model: &EntityModel, pool: &InstancePool, links: &LinkPool) -> Vec<Axiom> {
        let mut axioms = Vec::new();
        for (key, reference) in model.references() {
            let role = PropertyExpression::ObjectProperty(self.naming.role(&key.owner, &key.name));
            let candidates = pool.instances_of(&reference.target);

            for source in pool.instances_of(&key.owner) {
                let subject = self.object(source);
                let linked: BTreeSet<&str> = links
                    .targets(&key, source)
                    .unwrap_or_default()
                    .iter()
                    .map(String::as_str)
                    .collect();

                for target in &linked {
                    axioms.push(Axiom::sub_class_of(
                        subject.clone(),
                        ClassExpression::exact_cardinality(1, role.clone(), Some(self.object(target))),
                    ));
                }
                for target in candidates.iter().filter(|t| !linked.contains(t.as_str())) {
                    axioms.push(Axiom::sub_class_of(
                        subject.clone(),
                        ClassExpression::complement_of(ClassExpression::some_values_from(
                            role.clone(),
                            self.object(target),
                        )),
                    ));
                }
            }
        }
        axioms
    }
}
