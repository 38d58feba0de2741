//! Mimizuku core: the entity model consumed by the translator
//!
//! - `model`: classes, attributes, references, operations, enumerations
//! - `instances`: object model and the pools built from it
//! - `wellformed`: validation and repair before compilation
//! - `loader`: loader trait with a JSON implementation

pub mod instances;
pub mod loader;
pub mod model;
pub mod report;
pub mod wellformed;

pub use instances::{InstanceModel, InstancePool, LinkInstance, LinkPool, ObjectInstance};
pub use loader::{JsonModelLoader, ModelLoader};
pub use model::{
    Annotation, AnnotationDetail, AttributeEntity, ClassEntity, EntityModel, EnumEntity, Multiplicity,
    OperationEntity, ParameterEntity, ReferenceEntity, ReferenceKey, TypeRef, OCL_PIVOT_SOURCE, UNBOUNDED,
};
pub use report::{Diagnostic, ElementKind, Severity, WellFormednessReport};
pub use wellformed::{DefaultWellFormednessChecker, WellFormednessChecker};

// Error types
use thiserror::Error;

/// Fatal model defects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Attribute {class}.{attribute} has no resolvable type")]
    TypelessAttribute { class: String, attribute: String },

    #[error("Parameter {parameter} of {class}.{operation} has no resolvable type")]
    TypelessParameter {
        class: String,
        operation: String,
        parameter: String,
    },

    #[error("Association {owner}.{reference} has no opposite")]
    MissingOpposite { owner: String, reference: String },

    #[error("Two given association roles are not opposite: {left} and {right}")]
    NotOpposite { left: String, right: String },

    #[error("Invalid multiplicity [{lower}..{upper}] on {element}")]
    InvalidMultiplicity { element: String, lower: i32, upper: i32 },

    #[error("Unresolved type '{name}' referenced by {element}")]
    UnresolvedType { element: String, name: String },

    #[error("Duplicate class name: {0}")]
    DuplicateClass(String),

    #[error("Inheritance cycle through class {0}")]
    InheritanceCycle(String),
}

/// Instance model defects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("Object {object} has unknown class {class}")]
    UnknownClass { object: String, class: String },

    #[error("Duplicate object id: {0}")]
    DuplicateObject(String),

    #[error("Link refers to unknown object: {0}")]
    UnknownObject(String),

    #[error("Class {class} has no reference named {reference}")]
    UnknownReference { class: String, reference: String },

    #[error("Object {object} cannot be a target of {reference}")]
    IncompatibleTarget { object: String, reference: String },
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
