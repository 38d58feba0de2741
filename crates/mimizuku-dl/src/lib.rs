//! 記述論理 (DL) 語彙
//!
//! このクレートはメタモデル変換の出力側を提供します:
//! - クラス式・プロパティ式・公理 (SubClassOf, EquivalentClasses, DisjointClasses, InverseProperties)
//! - 重複のない公理集合 (`DlOntology`)
//! - 決定的な命名規則 (`NamingScheme`)
//! - DL 記法での表示 (`Renderer`)

pub mod model;
pub mod naming;
pub mod render;

pub use model::{Axiom, ClassExpression, Datatype, DlOntology, Individual, OwlIri, PropertyExpression};
pub use naming::{NamingScheme, DEFAULT_ONTOLOGY_IRI};
pub use render::{IriStyle, Renderer};

// Error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DlError {
    #[error("Unknown datatype: {0}")]
    UnknownDatatype(String),
}
