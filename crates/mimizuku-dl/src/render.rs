//! DL 記法による表示

use crate::model::{Axiom, ClassExpression, Individual, OwlIri, PropertyExpression};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How identifiers are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IriStyle {
    /// Full IRI
    #[default]
    Full,
    /// Only the part after `#`
    Fragment,
}

/// Renders expressions and axioms in DL notation
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    style: IriStyle,
}

impl Renderer {
    pub fn new(style: IriStyle) -> Self {
        Self { style }
    }

    pub fn full() -> Self {
        Self::new(IriStyle::Full)
    }

    pub fn short() -> Self {
        Self::new(IriStyle::Fragment)
    }

    fn iri<'a>(&self, iri: &'a OwlIri) -> &'a str {
        match self.style {
            IriStyle::Full => iri.as_str(),
            IriStyle::Fragment => iri.fragment(),
        }
    }

    fn individual<'a>(&self, individual: &'a Individual) -> &'a str {
        self.iri(&individual.0)
    }

    pub fn property(&self, property: &PropertyExpression) -> String {
        match property {
            PropertyExpression::ObjectProperty(iri) | PropertyExpression::DataProperty(iri) => {
                self.iri(iri).to_string()
            }
            PropertyExpression::InverseOf(inner) => format!("{}⁻", self.property(inner)),
        }
    }

    pub fn class(&self, expr: &ClassExpression) -> String {
        match expr {
            ClassExpression::Named(iri) => self.iri(iri).to_string(),
            ClassExpression::Thing => "⊤".to_string(),
            ClassExpression::Nothing => "⊥".to_string(),
            ClassExpression::IntersectionOf(operands) => {
                format!("({})", operands.iter().map(|c| self.class(c)).join(" ⊓ "))
            }
            ClassExpression::UnionOf(operands) => {
                format!("({})", operands.iter().map(|c| self.class(c)).join(" ⊔ "))
            }
            ClassExpression::ComplementOf(inner) => format!("¬{}", self.class(inner)),
            ClassExpression::OneOf(individuals) => {
                format!("{{{}}}", individuals.iter().map(|i| self.individual(i)).join(", "))
            }
            ClassExpression::SomeValuesFrom { property, class } => {
                format!("∃{}.{}", self.property(property), self.class(class))
            }
            ClassExpression::AllValuesFrom { property, class } => {
                format!("∀{}.{}", self.property(property), self.class(class))
            }
            ClassExpression::DataSomeValuesFrom { property, datatype } => {
                format!("∃{}.{}", self.iri(property), datatype.short_name())
            }
            ClassExpression::DataAllValuesFrom { property, datatype } => {
                format!("∀{}.{}", self.iri(property), datatype.short_name())
            }
            ClassExpression::MinCardinality { cardinality, property, class } => {
                self.cardinality("≥", *cardinality, property, class.as_deref())
            }
            ClassExpression::MaxCardinality { cardinality, property, class } => {
                self.cardinality("≤", *cardinality, property, class.as_deref())
            }
            ClassExpression::ExactCardinality { cardinality, property, class } => {
                self.cardinality("=", *cardinality, property, class.as_deref())
            }
        }
    }

    fn cardinality(
        &self,
        symbol: &str,
        cardinality: u32,
        property: &PropertyExpression,
        class: Option<&ClassExpression>,
    ) -> String {
        let filler = class.map(|c| self.class(c)).unwrap_or_else(|| "⊤".to_string());
        format!("{}{} {}.{}", symbol, cardinality, self.property(property), filler)
    }

    pub fn axiom(&self, axiom: &Axiom) -> String {
        match axiom {
            Axiom::SubClassOf(sub, sup) => format!("{} ⊑ {}", self.class(sub), self.class(sup)),
            Axiom::EquivalentClasses(classes) => classes.iter().map(|c| self.class(c)).join(" ≡ "),
            Axiom::DisjointClasses(classes) => {
                format!("Disjoint({})", classes.iter().map(|c| self.class(c)).join(", "))
            }
            Axiom::InverseProperties(first, second) => {
                format!("Inverse({}, {})", self.property(first), self.property(second))
            }
        }
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer::full().class(self))
    }
}

impl fmt::Display for PropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer::full().property(self))
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer::full().axiom(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Datatype;

    fn named(s: &str) -> ClassExpression {
        ClassExpression::Named(OwlIri::new(format!("urn:t#{}", s)))
    }

    fn role(s: &str) -> PropertyExpression {
        PropertyExpression::ObjectProperty(OwlIri::new(format!("urn:t#{}", s)))
    }

    #[test]
    fn test_short_rendering_of_negated_existential() {
        let expr = ClassExpression::complement_of(ClassExpression::exists(role("items"), None));
        assert_eq!(Renderer::short().class(&expr), "¬∃items.⊤");
    }

    #[test]
    fn test_full_rendering_keeps_iri() {
        let axiom = Axiom::sub_class_of(named("A"), named("B"));
        assert_eq!(axiom.to_string(), "urn:t#A ⊑ urn:t#B");
    }

    #[test]
    fn test_cardinality_and_inverse() {
        let expr = ClassExpression::intersection_of(vec![
            ClassExpression::min_cardinality(1, role("r")),
            ClassExpression::max_cardinality(3, role("r").inverse()),
        ]);
        assert_eq!(Renderer::short().class(&expr), "(≥1 r.⊤ ⊓ ≤3 r⁻.⊤)");
    }

    #[test]
    fn test_data_restriction() {
        let expr = ClassExpression::DataAllValuesFrom {
            property: OwlIri::new("urn:t#age"),
            datatype: Datatype::Integer,
        };
        assert_eq!(Renderer::short().class(&expr), "∀age.xsd:integer");
    }

    #[test]
    fn test_nominal_and_disjointness() {
        let nominal = ClassExpression::one_of(vec![
            Individual(OwlIri::new("urn:t#red")),
            Individual(OwlIri::new("urn:t#blue")),
        ]);
        assert_eq!(Renderer::short().class(&nominal), "{blue, red}");

        let axiom = Axiom::disjoint_classes(vec![named("B"), named("A")]);
        assert_eq!(Renderer::short().axiom(&axiom), "Disjoint(A, B)");
    }
}
