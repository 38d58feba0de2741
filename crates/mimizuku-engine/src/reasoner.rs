//! 外部 DL 推論器とのインターフェース
//!
//! No reasoner ships with this crate; callers plug one in behind
//! [`ReasonerAdapter`].

use mimizuku_dl::{Axiom, ClassExpression, DlOntology, OwlIri, Renderer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How many explanations to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Explanations {
    One,
    All,
}

/// 推論器アダプタートレイト
pub trait ReasonerAdapter {
    type Error: std::error::Error;

    fn is_consistent(&mut self, ontology: &DlOntology) -> Result<bool, Self::Error>;

    /// Named classes that cannot have instances
    fn unsatisfiable_classes(&mut self, ontology: &DlOntology) -> Result<BTreeSet<OwlIri>, Self::Error>;

    /// Axiom subsets that make `class` unsatisfiable
    fn explain(
        &mut self,
        ontology: &DlOntology,
        class: &ClassExpression,
        explanations: Explanations,
    ) -> Result<Vec<BTreeSet<Axiom>>, Self::Error>;

    /// Groups of named classes inferred to be equivalent
    fn equivalence_groups(&mut self, ontology: &DlOntology) -> Result<Vec<BTreeSet<OwlIri>>, Self::Error>;
}

/// Rendered outcome of asking a reasoner about an ontology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningSummary {
    pub consistent: bool,
    pub unsatisfiable: Vec<String>,
    /// One rendered explanation per unsatisfiable class, same order
    pub explanations: Vec<Vec<String>>,
    pub equivalences: Vec<Vec<String>>,
}

impl ReasoningSummary {
    /// Queries `reasoner` and renders every identifier with `renderer`
    pub fn collect<R: ReasonerAdapter + ?Sized>(
        reasoner: &mut R,
        ontology: &DlOntology,
        renderer: Renderer,
    ) -> Result<Self, R::Error> {
        let consistent = reasoner.is_consistent(ontology)?;
        let mut summary = ReasoningSummary {
            consistent,
            ..Default::default()
        };

        for class in reasoner.unsatisfiable_classes(ontology)? {
            let concept = ClassExpression::Named(class);
            let explanation = reasoner
                .explain(ontology, &concept, Explanations::One)?
                .into_iter()
                .next()
                .unwrap_or_default();
            summary.unsatisfiable.push(renderer.class(&concept));
            summary
                .explanations
                .push(explanation.iter().map(|axiom| renderer.axiom(axiom)).collect());
        }

        for group in reasoner.equivalence_groups(ontology)? {
            summary.equivalences.push(
                group
                    .into_iter()
                    .map(|iri| renderer.class(&ClassExpression::Named(iri)))
                    .collect(),
            );
        }
        Ok(summary)
    }
}
