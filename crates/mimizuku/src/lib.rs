//! # 🦉 Mimizuku - Metamodel to Description-Logic Compiler
//!
//! Mimizuku translates an entity model (classes, attributes, associations,
//! inheritance, enumerations, operations and their constraints) into a set of
//! Description-Logic axioms, so that an external DL reasoner can check the
//! model for consistency and find unsatisfiable classes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mimizuku::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let model = JsonModelLoader.load_model_file(std::path::Path::new("model.json"))?;
//!
//!     let translation = Translator::new(CompilerConfig::default()).translate(&model)?;
//!     for axiom in translation.ontology.iter() {
//!         println!("{}", Renderer::short().axiom(axiom));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`mimizuku-dl`**: DL expressions, axioms, naming scheme and rendering
//! - **`mimizuku-core`**: entity and instance models, loading, well-formedness checking
//! - **`mimizuku-ocl`**: constraint parsing, fixpoint normalization and resolution
//! - **`mimizuku-engine`**: axiom compiler, instance closure, reasoner interface
//! - **`mimizuku-cli`**: command-line interface (binary `mimizuku`)
//!
//! ## Feature Flags
//!
//! - `full` (default): everything below
//! - `core`: entity model and checker
//! - `ocl`: constraint normalizer
//! - `engine`: compiler and pipeline

pub use mimizuku_dl as dl;

#[cfg(feature = "mimizuku-core")]
pub use mimizuku_core as core;

#[cfg(feature = "mimizuku-ocl")]
pub use mimizuku_ocl as ocl;

#[cfg(feature = "mimizuku-engine")]
pub use mimizuku_engine as engine;

// Convenience re-exports for common types
pub use mimizuku_dl::{Axiom, ClassExpression, DlOntology, NamingScheme, PropertyExpression, Renderer};

#[cfg(feature = "mimizuku-core")]
pub use mimizuku_core::{EntityModel, InstanceModel, JsonModelLoader, ModelError, ModelLoader};

#[cfg(feature = "mimizuku-ocl")]
pub use mimizuku_ocl::{ConstraintError, ConstraintNormalizer};

#[cfg(feature = "mimizuku-engine")]
pub use mimizuku_engine::{CompileError, CompilerConfig, ReasonerAdapter, Translation, Translator};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use mimizuku::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Axiom, ClassExpression, DlOntology, NamingScheme, PropertyExpression, Renderer};

    #[cfg(feature = "mimizuku-core")]
    pub use crate::{EntityModel, InstanceModel, JsonModelLoader, ModelError, ModelLoader};

    #[cfg(feature = "mimizuku-ocl")]
    pub use crate::{ConstraintError, ConstraintNormalizer};

    #[cfg(feature = "mimizuku-engine")]
    pub use crate::{CompileError, CompilerConfig, ReasonerAdapter, Translation, Translator};

    pub use serde::{Deserialize, Serialize};
}

/// Current version of Mimizuku
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
