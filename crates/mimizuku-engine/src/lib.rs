//! # Mimizuku Engine
//!
//! エンティティモデルから DL 公理集合へのコンパイラ
//!
//! - `compiler`: classes, attributes, operations, enumerations, inheritance,
//!   associations and constraints to axioms
//! - `instances`: closed-world axioms for an object model
//! - `pipeline`: check, compile and extend in one call
//! - `reasoner`: interface to an external DL reasoner

pub mod compiler;
pub mod config;
pub mod instances;
pub mod pipeline;
pub mod reasoner;
pub mod report;
pub mod vocabulary;

pub use compiler::{AxiomCompiler, Compilation};
pub use config::{AssociationCardinality, CardinalityPolicy, CompilerConfig, ConstraintPolicy, InheritanceMode};
pub use instances::InstanceAxiomGenerator;
pub use pipeline::{Translation, Translator};
pub use reasoner::{Explanations, ReasonerAdapter, ReasoningSummary};
pub use report::{ConstraintOutcome, ConstraintReport};
pub use vocabulary::ModelVocabulary;

use mimizuku_core::{InstanceError, ModelError};
use mimizuku_ocl::ConstraintError;

/// コンパイルエラー
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Constraint '{name}' on class {class}: {source}")]
    Constraint {
        class: String,
        name: String,
        #[source]
        source: ConstraintError,
    },

    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error("Model was not checked before compilation: {0}")]
    Precondition(String),
}
