//! 決定的な命名規則
//!
//! Every concept, role and individual identifier produced by the compiler is
//! built here. The shapes are observable in rendered output and must stay
//! stable:
//!
//! | entity | identifier |
//! |---|---|
//! | class `C` | `<iri>#P(C[class])` |
//! | attribute/association `a` of `C` | `<iri>#PCarole` |
//! | enumeration `E` | `<iri>#PEenumeration` |
//! | enum literal `L` | `<iri>#PLindividual` |
//! | object `o` | `<iri>#Poobject` |

use crate::model::{Individual, OwlIri};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ONTOLOGY_IRI: &str = "urn:mimizuku:ontology";

const CLASS_SUFFIX: &str = "[class]";
const ROLE_SUFFIX: &str = "role";
const ENUMERATION_SUFFIX: &str = "enumeration";
const INDIVIDUAL_SUFFIX: &str = "individual";
const OBJECT_SUFFIX: &str = "object";
const RETURN_MARKER: &str = "ret";
const THIS_MARKER: &str = "this";
const VOID_TYPE: &str = "void";

/// Identifier factory bound to one ontology IRI and package prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingScheme {
    ontology_iri: String,
    package: String,
}

impl NamingScheme {
    pub fn new(ontology_iri: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            ontology_iri: ontology_iri.into(),
            package: package.into(),
        }
    }

    pub fn ontology_iri(&self) -> OwlIri {
        OwlIri::new(self.ontology_iri.clone())
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    fn local(&self, local: &str) -> OwlIri {
        OwlIri::new(format!("{}#{}{}", self.ontology_iri, self.package, local))
    }

    /// `P(C[class])`
    pub fn class(&self, class: &str) -> OwlIri {
        self.local(&format!("({}{})", class, CLASS_SUFFIX))
    }

    /// `PCarole`
    pub fn role(&self, owner: &str, feature: &str) -> OwlIri {
        self.local(&format!("{}{}{}", owner, feature, ROLE_SUFFIX))
    }

    pub fn enumeration(&self, name: &str) -> OwlIri {
        self.local(&format!("{}{}", name, ENUMERATION_SUFFIX))
    }

    pub fn literal(&self, literal: &str) -> Individual {
        Individual(self.local(&format!("{}{}", literal, INDIVIDUAL_SUFFIX)))
    }

    /// Concept standing for one object of an instance model
    pub fn object(&self, id: &str) -> OwlIri {
        self.local(&format!("{}{}", id, OBJECT_SUFFIX))
    }

    /// Reified tuple concept `P(CfR[class])` of an operation with parameters
    pub fn operation_concept(&self, class: &str, operation: &str, return_type: Option<&str>) -> OwlIri {
        self.class(&format!("{}{}{}", class, operation, return_type.unwrap_or(VOID_TYPE)))
    }

    pub fn return_role(&self, class: &str, operation: &str, return_type: Option<&str>) -> OwlIri {
        self.local(&format!(
            "{}{}{}{}{}",
            class,
            operation,
            return_type.unwrap_or(VOID_TYPE),
            RETURN_MARKER,
            ROLE_SUFFIX
        ))
    }

    pub fn this_role(&self, class: &str, operation: &str) -> OwlIri {
        self.local(&format!("{}{}{}{}", class, operation, THIS_MARKER, ROLE_SUFFIX))
    }

    pub fn parameter_role(&self, class: &str, operation: &str, parameter: &str) -> OwlIri {
        self.local(&format!("{}{}{}{}", class, operation, parameter, ROLE_SUFFIX))
    }
}
