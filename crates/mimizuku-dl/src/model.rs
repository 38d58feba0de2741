//! DL データモデル

use crate::DlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// OWL IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OwlIri(pub String);

impl OwlIri {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the last `#`, or the whole IRI when there is none
    pub fn fragment(&self) -> &str {
        match self.0.rfind('#') {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for OwlIri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named individual (used by nominals)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Individual(pub OwlIri);

/// XSD datatypes a primitive attribute can range over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    Integer,
    Float,
    Double,
    Boolean,
    String,
    /// rdfs:Literal (top datatype)
    Literal,
}

impl Datatype {
    pub fn iri(&self) -> &'static str {
        match self {
            Datatype::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            Datatype::Float => "http://www.w3.org/2001/XMLSchema#float",
            Datatype::Double => "http://www.w3.org/2001/XMLSchema#double",
            Datatype::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            Datatype::String => "http://www.w3.org/2001/XMLSchema#string",
            Datatype::Literal => "http://www.w3.org/2000/01/rdf-schema#Literal",
        }
    }

    /// Prefixed form used in DL notation
    pub fn short_name(&self) -> &'static str {
        match self {
            Datatype::Integer => "xsd:integer",
            Datatype::Float => "xsd:float",
            Datatype::Double => "xsd:double",
            Datatype::Boolean => "xsd:boolean",
            Datatype::String => "xsd:string",
            Datatype::Literal => "rdfs:Literal",
        }
    }
}

impl FromStr for Datatype {
    type Err = DlError;

    /// Ecore and OWL-flavoured type names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EInt" | "EInteger" | "EIntegerObject" | "ELong" | "ELongObject" | "EShort"
            | "EBigInteger" | "OWLinteger" | "OWLint" | "integer" | "int" => Ok(Datatype::Integer),
            "EFloat" | "EFloatObject" | "OWLfloat" | "float" => Ok(Datatype::Float),
            "EDouble" | "EDoubleObject" | "EBigDecimal" | "OWLdouble" | "double" => {
                Ok(Datatype::Double)
            }
            "EBoolean" | "EBooleanObject" | "OWLboolean" | "boolean" => Ok(Datatype::Boolean),
            "EString" | "OWLstring" | "string" => Ok(Datatype::String),
            "literal" => Ok(Datatype::Literal),
            other => Err(DlError::UnknownDatatype(other.to_string())),
        }
    }
}

/// DL Class Expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ClassExpression {
    /// Named class
    Named(OwlIri),

    /// owl:Thing (⊤)
    Thing,

    /// owl:Nothing (⊥)
    Nothing,

    /// Intersection of classes: C1 ⊓ C2 ⊓ ... ⊓ Cn
    IntersectionOf(Vec<ClassExpression>),

    /// Union of classes: C1 ⊔ C2 ⊔ ... ⊔ Cn
    UnionOf(Vec<ClassExpression>),

    /// Complement of class: ¬C
    ComplementOf(Box<ClassExpression>),

    /// Enumeration of individuals: {i1, i2, ..., in}
    OneOf(Vec<Individual>),

    /// Existential restriction: ∃R.C
    SomeValuesFrom {
        property: PropertyExpression,
        class: Box<ClassExpression>,
    },

    /// Universal restriction: ∀R.C
    AllValuesFrom {
        property: PropertyExpression,
        class: Box<ClassExpression>,
    },

    /// Existential data restriction: ∃U.D
    DataSomeValuesFrom { property: OwlIri, datatype: Datatype },

    /// Universal data restriction: ∀U.D
    DataAllValuesFrom { property: OwlIri, datatype: Datatype },

    /// Minimum cardinality: ≥n R.C
    MinCardinality {
        cardinality: u32,
        property: PropertyExpression,
        class: Option<Box<ClassExpression>>, // None means owl:Thing
    },

    /// Maximum cardinality: ≤n R.C
    MaxCardinality {
        cardinality: u32,
        property: PropertyExpression,
        class: Option<Box<ClassExpression>>, // None means owl:Thing
    },

    /// Exact cardinality: =n R.C
    ExactCardinality {
        cardinality: u32,
        property: PropertyExpression,
        class: Option<Box<ClassExpression>>, // None means owl:Thing
    },
}

impl ClassExpression {
    pub fn named(iri: OwlIri) -> Self {
        ClassExpression::Named(iri)
    }

    /// Operands are sorted and deduplicated; a single operand is returned as is
    pub fn intersection_of(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        let mut operands = normalize_operands(operands);
        match operands.len() {
            0 => ClassExpression::Thing,
            1 => operands.remove(0),
            _ => ClassExpression::IntersectionOf(operands),
        }
    }

    pub fn union_of(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        let mut operands = normalize_operands(operands);
        match operands.len() {
            0 => ClassExpression::Nothing,
            1 => operands.remove(0),
            _ => ClassExpression::UnionOf(operands),
        }
    }

    pub fn complement_of(class: ClassExpression) -> Self {
        ClassExpression::ComplementOf(Box::new(class))
    }

    pub fn one_of(individuals: impl IntoIterator<Item = Individual>) -> Self {
        let individuals: BTreeSet<Individual> = individuals.into_iter().collect();
        ClassExpression::OneOf(individuals.into_iter().collect())
    }

    pub fn some_values_from(property: PropertyExpression, class: ClassExpression) -> Self {
        ClassExpression::SomeValuesFrom { property, class: Box::new(class) }
    }

    pub fn all_values_from(property: PropertyExpression, class: ClassExpression) -> Self {
        ClassExpression::AllValuesFrom { property, class: Box::new(class) }
    }

    /// `∃R.filler` for object roles, `∃U.rdfs:Literal` for data roles
    pub fn exists(property: PropertyExpression, filler: Option<ClassExpression>) -> Self {
        match property {
            PropertyExpression::DataProperty(iri) => ClassExpression::DataSomeValuesFrom {
                property: iri,
                datatype: Datatype::Literal,
            },
            property => Self::some_values_from(property, filler.unwrap_or(ClassExpression::Thing)),
        }
    }

    pub fn min_cardinality(cardinality: u32, property: PropertyExpression) -> Self {
        ClassExpression::MinCardinality { cardinality, property, class: None }
    }

    pub fn max_cardinality(cardinality: u32, property: PropertyExpression) -> Self {
        ClassExpression::MaxCardinality { cardinality, property, class: None }
    }

    pub fn exact_cardinality(
        cardinality: u32,
        property: PropertyExpression,
        class: Option<ClassExpression>,
    ) -> Self {
        ClassExpression::ExactCardinality {
            cardinality,
            property,
            class: class.map(Box::new),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, ClassExpression::Named(_))
    }
}

fn normalize_operands(operands: impl IntoIterator<Item = ClassExpression>) -> Vec<ClassExpression> {
    let set: BTreeSet<ClassExpression> = operands.into_iter().collect();
    set.into_iter().collect()
}

/// DL Property Expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PropertyExpression {
    /// Object property
    ObjectProperty(OwlIri),

    /// Data property
    DataProperty(OwlIri),

    /// Inverse property: R⁻
    InverseOf(Box<PropertyExpression>),
}

impl PropertyExpression {
    pub fn inverse(self) -> Self {
        PropertyExpression::InverseOf(Box::new(self))
    }

    pub fn iri(&self) -> &OwlIri {
        match self {
            PropertyExpression::ObjectProperty(iri) | PropertyExpression::DataProperty(iri) => iri,
            PropertyExpression::InverseOf(inner) => inner.iri(),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, PropertyExpression::DataProperty(_))
    }
}

/// DL Axiom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Axiom {
    /// C ⊑ D
    SubClassOf(ClassExpression, ClassExpression),

    /// C1 ≡ ... ≡ Cn
    EquivalentClasses(Vec<ClassExpression>),

    /// Pairwise disjoint classes
    DisjointClasses(Vec<ClassExpression>),

    /// R ≡ S⁻
    InverseProperties(PropertyExpression, PropertyExpression),
}

impl Axiom {
    pub fn sub_class_of(sub: ClassExpression, sup: ClassExpression) -> Self {
        Axiom::SubClassOf(sub, sup)
    }

    pub fn equivalent_classes(classes: impl IntoIterator<Item = ClassExpression>) -> Self {
        Axiom::EquivalentClasses(normalize_operands(classes))
    }

    pub fn disjoint_classes(classes: impl IntoIterator<Item = ClassExpression>) -> Self {
        Axiom::DisjointClasses(normalize_operands(classes))
    }

    /// The pair is unordered: `inverse_properties(r, s) == inverse_properties(s, r)`
    pub fn inverse_properties(first: PropertyExpression, second: PropertyExpression) -> Self {
        if first <= second {
            Axiom::InverseProperties(first, second)
        } else {
            Axiom::InverseProperties(second, first)
        }
    }
}

/// A DL theory: a set of axioms plus the signature they mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlOntology {
    /// Ontology IRI
    pub iri: OwlIri,

    /// All axioms in the ontology
    pub axioms: BTreeSet<Axiom>,

    /// Named classes mentioned
    pub classes: BTreeSet<OwlIri>,

    /// Object properties mentioned
    pub object_properties: BTreeSet<OwlIri>,

    /// Data properties mentioned
    pub data_properties: BTreeSet<OwlIri>,

    /// Individuals mentioned
    pub individuals: BTreeSet<Individual>,
}

impl DlOntology {
    pub fn new(iri: OwlIri) -> Self {
        Self {
            iri,
            axioms: BTreeSet::new(),
            classes: BTreeSet::new(),
            object_properties: BTreeSet::new(),
            data_properties: BTreeSet::new(),
            individuals: BTreeSet::new(),
        }
    }

    /// Returns `false` when the axiom was already present
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        if self.axioms.contains(&axiom) {
            return false;
        }

        match &axiom {
            Axiom::SubClassOf(sub, sup) => {
                self.collect_class_expression(sub);
                self.collect_class_expression(sup);
            }
            Axiom::EquivalentClasses(expressions) | Axiom::DisjointClasses(expressions) => {
                for expr in expressions {
                    self.collect_class_expression(expr);
                }
            }
            Axiom::InverseProperties(first, second) => {
                self.collect_property_expression(first);
                self.collect_property_expression(second);
            }
        }

        self.axioms.insert(axiom)
    }

    pub fn extend(&mut self, axioms: impl IntoIterator<Item = Axiom>) {
        for axiom in axioms {
            self.add_axiom(axiom);
        }
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter()
    }

    fn collect_class_expression(&mut self, expr: &ClassExpression) {
        match expr {
            ClassExpression::Named(iri) => {
                self.classes.insert(iri.clone());
            }
            ClassExpression::Thing | ClassExpression::Nothing => {}
            ClassExpression::IntersectionOf(expressions) | ClassExpression::UnionOf(expressions) => {
                for expr in expressions {
                    self.collect_class_expression(expr);
                }
            }
            ClassExpression::ComplementOf(expr) => {
                self.collect_class_expression(expr);
            }
            ClassExpression::OneOf(individuals) => {
                self.individuals.extend(individuals.iter().cloned());
            }
            ClassExpression::SomeValuesFrom { property, class }
            | ClassExpression::AllValuesFrom { property, class } => {
                self.collect_property_expression(property);
                self.collect_class_expression(class);
            }
            ClassExpression::DataSomeValuesFrom { property, .. }
            | ClassExpression::DataAllValuesFrom { property, .. } => {
                self.data_properties.insert(property.clone());
            }
            ClassExpression::MinCardinality { property, class, .. }
            | ClassExpression::MaxCardinality { property, class, .. }
            | ClassExpression::ExactCardinality { property, class, .. } => {
                self.collect_property_expression(property);
                if let Some(class) = class {
                    self.collect_class_expression(class);
                }
            }
        }
    }

    fn collect_property_expression(&mut self, expr: &PropertyExpression) {
        match expr {
            PropertyExpression::ObjectProperty(iri) => {
                self.object_properties.insert(iri.clone());
            }
            PropertyExpression::DataProperty(iri) => {
                self.data_properties.insert(iri.clone());
            }
            PropertyExpression::InverseOf(expr) => {
                self.collect_property_expression(expr);
            }
        }
    }
}

impl<'a> IntoIterator for &'a DlOntology {
    type Item = &'a Axiom;
    type IntoIter = std::collections::btree_set::Iter<'a, Axiom>;

    fn into_iter(self) -> Self::IntoIter {
        self.axioms.iter()
    }
}
