//! コンパイラ設定

use mimizuku_core::OCL_PIVOT_SOURCE;
use mimizuku_dl::{NamingScheme, DEFAULT_ONTOLOGY_IRI};
use mimizuku_ocl::{ConstraintNormalizer, DEFAULT_MAX_FIXPOINT_ITERATIONS, DEFAULT_MAX_RESOLUTION_DEPTH};
use serde::{Deserialize, Serialize};

/// Axioms emitted between a class and its direct subclasses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceMode {
    /// `S ⊑ P` only
    #[default]
    Plain,
    /// Also pairwise disjoint subclasses and `P ⊑ S₁ ⊔ … ⊔ Sₙ`
    DisjointCovering,
}

/// Minimum used for attributes with two finite bounds other than [1..1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityPolicy {
    /// `≥upper ⊓ ≤upper`
    #[default]
    Source,
    /// `≥lower ⊓ ≤upper`
    LowerBound,
}

/// Which end's bounds restrict the class holding an association role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationCardinality {
    #[default]
    OppositeEnd,
    OwnEnd,
}

/// What happens to constraints that fail to parse or name unknown features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintPolicy {
    /// Abort compilation
    #[default]
    Strict,
    /// Skip the constraint and report it
    Lenient,
}

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub ontology_iri: String,
    /// Overrides the package prefix of the model
    pub package: Option<String>,
    pub inheritance: InheritanceMode,
    pub attribute_cardinality: CardinalityPolicy,
    pub association_cardinality: AssociationCardinality,
    pub constraint_policy: ConstraintPolicy,
    /// Annotation sources whose details are constraints
    pub constraint_sources: Vec<String>,
    pub max_fixpoint_iterations: usize,
    pub max_resolution_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            ontology_iri: DEFAULT_ONTOLOGY_IRI.to_string(),
            package: None,
            inheritance: InheritanceMode::default(),
            attribute_cardinality: CardinalityPolicy::default(),
            association_cardinality: AssociationCardinality::default(),
            constraint_policy: ConstraintPolicy::default(),
            constraint_sources: vec![OCL_PIVOT_SOURCE.to_string()],
            max_fixpoint_iterations: DEFAULT_MAX_FIXPOINT_ITERATIONS,
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }
}

impl CompilerConfig {
    /// Naming scheme for a model whose package prefix is `package`
    pub fn naming(&self, package: &str) -> NamingScheme {
        let package = self.package.as_deref().unwrap_or(package);
        NamingScheme::new(self.ontology_iri.clone(), package)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn normalizer(&self) -> ConstraintNormalizer {
        ConstraintNormalizer::new(self.max_fixpoint_iterations, self.max_resolution_depth)
    }
}
