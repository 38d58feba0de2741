//! Closed-world instance axioms and the reasoner interface

use mimizuku_core::{ClassEntity, EntityModel, InstanceError, InstanceModel, LinkInstance, ObjectInstance, ReferenceEntity};
use mimizuku_dl::{Axiom, ClassExpression, DlOntology, NamingScheme, OwlIri, PropertyExpression, Renderer};
use mimizuku_engine::{
    CompileError, Explanations, InstanceAxiomGenerator, ReasonerAdapter, ReasoningSummary, Translator,
};
use std::collections::BTreeSet;

fn naming() -> NamingScheme {
    NamingScheme::new("urn:test", "lib")
}

fn object(id: &str) -> ClassExpression {
    ClassExpression::Named(naming().object(id))
}

fn class(name: &str) -> ClassExpression {
    ClassExpression::Named(naming().class(name))
}

fn role() -> PropertyExpression {
    PropertyExpression::ObjectProperty(naming().role("Library", "books"))
}

fn library() -> EntityModel {
    let mut model = EntityModel::new("lib");
    let mut library = ClassEntity::new("Library");
    library.references.push(ReferenceEntity {
        name: "books".to_string(),
        target: "Book".to_string(),
        opposite: Some("library".to_string()),
        lower_bound: 0,
        upper_bound: -1,
    });
    let mut book = ClassEntity::new("Book");
    book.references.push(ReferenceEntity {
        name: "library".to_string(),
        target: "Library".to_string(),
        opposite: Some("books".to_string()),
        lower_bound: 0,
        upper_bound: 1,
    });
    let mut novel = ClassEntity::new("Novel");
    novel.supertypes.push("Book".to_string());
    model.classes = vec![library, book, novel];
    model
}

fn objects(entries: &[(&str, &str)]) -> Vec<ObjectInstance> {
    entries.iter()
        .map(|(id, class)| ObjectInstance {
            id: id.to_string(),
            class: class.to_string(),
        })
        .collect()
}

fn generate(instances: &InstanceModel) -> Result<Vec<Axiom>, CompileError> {
    InstanceAxiomGenerator::new(naming()).generate(&library(), instances)
}

#[test]
fn test_single_instance_gets_exhaustiveness_without_disjointness() {
    let instances = InstanceModel {
        objects: objects(&[("central", "Library")]),
        links: vec![],
    };
    let axioms = generate(&instances).unwrap();

    assert!(axioms.contains(&Axiom::sub_class_of(object("central"), class("Library"))));
    assert!(axioms.contains(&Axiom::sub_class_of(class("Library"), object("central"))));
    assert!(axioms.iter().all(|axiom| !matches!(axiom, Axiom::DisjointClasses(_))));
}

#[test]
fn test_disjointness_iff_more_than_one_instance() {
    for n in 0..4 {
        let ids: Vec<String> = (0..n).map(|i| format!("b{}", i)).collect();
        let instances = InstanceModel {
            objects: ids
                .iter()
                .map(|id| ObjectInstance {
                    id: id.clone(),
                    class: "Book".to_string(),
                })
                .collect(),
            links: vec![],
        };
        let axioms = generate(&instances).unwrap();

        let disjoint = axioms.iter().filter(|a| matches!(a, Axiom::DisjointClasses(_))).count();
        let exhaustive = axioms
            .iter()
            .filter(|a| matches!(a, Axiom::SubClassOf(sub, _) if *sub == class("Book")))
            .count();
        assert_eq!(disjoint, usize::from(n > 1), "{} books", n);
        assert_eq!(exhaustive, usize::from(n >= 1), "{} books", n);
    }
}

#[test]
fn test_objects_are_grouped_under_ancestors() {
    let instances = InstanceModel {
        objects: objects(&[("dune", "Novel"), ("atlas", "Book")]),
        links: vec![],
    };
    let axioms = generate(&instances).unwrap();

    assert!(axioms.contains(&Axiom::sub_class_of(object("dune"), class("Novel"))));
    assert!(axioms.contains(&Axiom::sub_class_of(object("dune"), class("Book"))));
    assert!(axioms.contains(&Axiom::sub_class_of(
        class("Book"),
        ClassExpression::union_of([object("dune"), object("atlas")])
    )));
    assert!(axioms.contains(&Axiom::sub_class_of(class("Novel"), object("dune"))));
}

#[test]
fn test_links_are_closed() {
    let instances = InstanceModel {
        objects: objects(&[("central", "Library"), ("annex", "Library"), ("dune", "Novel"), ("atlas", "Book")]),
        links: vec![LinkInstance {
            source: "central".to_string(),
            reference: "books".to_string(),
            targets: vec!["dune".to_string()],
        }],
    };
    let axioms = generate(&instances).unwrap();
    let holds = |source: &str, target: &str| {
        Axiom::sub_class_of(
            object(source),
            ClassExpression::exact_cardinality(1, role(), Some(object(target))),
        )
    };
    let lacks = |source: &str, target: &str| {
        Axiom::sub_class_of(
            object(source),
            ClassExpression::complement_of(ClassExpression::some_values_from(role(), object(target))),
        )
    };

    assert!(axioms.contains(&holds("central", "dune")));
    assert!(axioms.contains(&lacks("central", "atlas")));
    assert!(!axioms.contains(&lacks("central", "dune")));
    assert!(axioms.contains(&lacks("annex", "dune")));
    assert!(axioms.contains(&lacks("annex", "atlas")));
}

#[test]
fn test_negative_link_axioms_grow_with_product() {
    let libraries: Vec<String> = (0..3).map(|i| format!("l{}", i)).collect();
    let books: Vec<String> = (0..4).map(|i| format!("b{}", i)).collect();
    let mut entries = vec![];
    entries.extend(libraries.iter().map(|id| (id.as_str(), "Library")));
    entries.extend(books.iter().map(|id| (id.as_str(), "Book")));
    let instances = InstanceModel {
        objects: objects(&entries),
        links: vec![],
    };
    let axioms = generate(&instances).unwrap();

    let negative = |r: &PropertyExpression| {
        axioms
            .iter()
            .filter(|axiom| {
                matches!(axiom, Axiom::SubClassOf(_, ClassExpression::ComplementOf(inner))
                    if matches!(inner.as_ref(), ClassExpression::SomeValuesFrom { property, .. } if property == r))
            })
            .count()
    };
    assert_eq!(negative(&role()), 12);
    let back = PropertyExpression::ObjectProperty(naming().role("Book", "library"));
    assert_eq!(negative(&back), 12);
}

#[test]
fn test_invalid_instances_are_rejected() {
    let instances = InstanceModel {
        objects: objects(&[("central", "Library"), ("central", "Library")]),
        links: vec![],
    };
    assert!(matches!(
        generate(&instances),
        Err(CompileError::Instance(InstanceError::DuplicateObject(_)))
    ));
}

#[test]
fn test_translator_extends_compiled_ontology() {
    let translator = Translator::default();
    let translation = translator.translate(&library()).unwrap();
    let instances = InstanceModel {
        objects: objects(&[("central", "Library")]),
        links: vec![],
    };
    let extended = translator.extend(&translation, &instances).unwrap();

    assert!(extended.len() > translation.ontology.len());
    assert!(translation.ontology.iter().all(|axiom| extended.contains(axiom)));
}

/// Treats every class named in a `C ⊑ ⊥` axiom as unsatisfiable
#[derive(Default)]
struct BottomReasoner {
    calls: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("reasoner failure")]
struct ReasonerFailure;

impl BottomReasoner {
    fn bottoms(ontology: &DlOntology) -> Vec<(OwlIri, Axiom)> {
        ontology
            .iter()
            .filter_map(|axiom| match axiom {
                Axiom::SubClassOf(ClassExpression::Named(iri), ClassExpression::Nothing) => {
                    Some((iri.clone(), axiom.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

impl ReasonerAdapter for BottomReasoner {
    type Error = ReasonerFailure;

    fn is_consistent(&mut self, _ontology: &DlOntology) -> Result<bool, Self::Error> {
        self.calls += 1;
        Ok(true)
    }

    fn unsatisfiable_classes(&mut self, ontology: &DlOntology) -> Result<BTreeSet<OwlIri>, Self::Error> {
        self.calls += 1;
        Ok(Self::bottoms(ontology).into_iter().map(|(iri, _)| iri).collect())
    }

    fn explain(
        &mut self,
        ontology: &DlOntology,
        class: &ClassExpression,
        explanations: Explanations,
    ) -> Result<Vec<BTreeSet<Axiom>>, Self::Error> {
        self.calls += 1;
        assert_eq!(explanations, Explanations::One);
        Ok(Self::bottoms(ontology)
            .into_iter()
            .filter(|(iri, _)| ClassExpression::Named(iri.clone()) == *class)
            .map(|(_, axiom)| BTreeSet::from([axiom]))
            .collect())
    }

    fn equivalence_groups(&mut self, _ontology: &DlOntology) -> Result<Vec<BTreeSet<OwlIri>>, Self::Error> {
        self.calls += 1;
        Ok(vec![])
    }
}

#[test]
fn test_reasoning_summary_renders_explanations() {
    let mut translation = Translator::default().translate(&library()).unwrap();
    let book = translation.ontology.iri.clone();
    let book = NamingScheme::new(book.as_str(), "lib").class("Book");
    translation
        .ontology
        .add_axiom(Axiom::sub_class_of(ClassExpression::Named(book), ClassExpression::Nothing));

    let mut reasoner = BottomReasoner::default();
    let summary = translation.check_with(&mut reasoner, Renderer::short()).unwrap();

    assert!(summary.consistent);
    assert_eq!(summary.unsatisfiable.len(), 1);
    assert_eq!(summary.explanations.len(), 1);
    assert_eq!(summary.explanations[0].len(), 1);
    assert!(summary.equivalences.is_empty());
    assert_eq!(reasoner.calls, 4);
}

#[test]
fn test_reasoning_summary_without_unsatisfiable_classes() {
    let translation = Translator::default().translate(&library()).unwrap();
    let summary =
        ReasoningSummary::collect(&mut BottomReasoner::default(), &translation.ontology, Renderer::full()).unwrap();
    assert_eq!(
        summary,
        ReasoningSummary {
            consistent: true,
            ..Default::default()
        }
    );
}
