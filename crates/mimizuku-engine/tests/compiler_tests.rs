//! Axiom compiler tests on small checked models

use mimizuku_core::{
    Annotation, AnnotationDetail, AttributeEntity, ClassEntity, EntityModel, EnumEntity, OperationEntity,
    ParameterEntity, ReferenceEntity, TypeRef, OCL_PIVOT_SOURCE,
};
use mimizuku_dl::{Axiom, ClassExpression, Datatype, NamingScheme, PropertyExpression, DEFAULT_ONTOLOGY_IRI};
use mimizuku_engine::{
    AssociationCardinality, CardinalityPolicy, CompileError, CompilerConfig, ConstraintOutcome, ConstraintPolicy,
    InheritanceMode, Translation, Translator,
};

fn naming() -> NamingScheme {
    NamingScheme::new(DEFAULT_ONTOLOGY_IRI, "shop")
}

fn concept(class: &str) -> ClassExpression {
    ClassExpression::Named(naming().class(class))
}

fn object_role(owner: &str, name: &str) -> PropertyExpression {
    PropertyExpression::ObjectProperty(naming().role(owner, name))
}

fn data_role(owner: &str, name: &str) -> PropertyExpression {
    PropertyExpression::DataProperty(naming().role(owner, name))
}

fn attribute(name: &str, ty: &str, lower: i32, upper: i32) -> AttributeEntity {
    AttributeEntity {
        name: name.to_string(),
        ty: Some(TypeRef::Unresolved(ty.to_string())),
        lower_bound: lower,
        upper_bound: upper,
    }
}

fn reference(name: &str, target: &str, opposite: &str, lower: i32, upper: i32) -> ReferenceEntity {
    ReferenceEntity {
        name: name.to_string(),
        target: target.to_string(),
        opposite: Some(opposite.to_string()),
        lower_bound: lower,
        upper_bound: upper,
    }
}

fn invariant(name: &str, text: &str) -> Annotation {
    Annotation {
        source: OCL_PIVOT_SOURCE.to_string(),
        details: vec![AnnotationDetail {
            key: name.to_string(),
            value: text.to_string(),
        }],
    }
}

/// Order 1 -- 0..* Item, Order [1..3] from the item side
fn shop() -> EntityModel {
    let mut model = EntityModel::new("shop");
    let mut order = ClassEntity::new("Order");
    order.references.push(reference("items", "Item", "order", 0, -1));
    let mut item = ClassEntity::new("Item");
    item.references.push(reference("order", "Order", "items", 1, 3));
    model.classes = vec![order, item];
    model
}

fn translate_with(config: CompilerConfig, model: &EntityModel) -> Translation {
    Translator::new(config).translate(model).unwrap()
}

fn translate(model: &EntityModel) -> Translation {
    translate_with(CompilerConfig::default(), model)
}

/// Axioms whose left-hand side is `class`
fn axioms_on(translation: &Translation, class: &str) -> Vec<Axiom> {
    let concept = concept(class);
    translation
        .ontology
        .iter()
        .filter(|axiom| matches!(axiom, Axiom::SubClassOf(sub, _) if *sub == concept))
        .cloned()
        .collect()
}

#[test]
fn test_unbounded_attribute_is_typed_only() {
    let mut model = shop();
    model.classes[1].attributes.push(attribute("tags", "EString", 0, -1));
    let translation = translate(&model);

    let role = data_role("Item", "tags");
    let mentioning: Vec<Axiom> = axioms_on(&translation, "Item")
        .into_iter()
        .filter(|axiom| format!("{:?}", axiom).contains(role.iri().as_str()))
        .collect();
    assert_eq!(
        mentioning,
        vec![Axiom::sub_class_of(
            concept("Item"),
            ClassExpression::DataAllValuesFrom {
                property: role.iri().clone(),
                datatype: Datatype::String,
            }
        )]
    );
}

#[test]
fn test_exactly_one_attribute_is_a_single_intersection() {
    let mut model = shop();
    model.classes[1].attributes.push(attribute("price", "EDouble", 1, 1));
    let translation = translate(&model);

    let role = data_role("Item", "price");
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::intersection_of([
            ClassExpression::DataSomeValuesFrom {
                property: role.iri().clone(),
                datatype: Datatype::Double,
            },
            ClassExpression::max_cardinality(1, role.clone()),
        ])
    )));
    assert!(!translation
        .ontology
        .contains(&Axiom::sub_class_of(concept("Item"), ClassExpression::max_cardinality(1, role))));
}

#[test]
fn test_bounded_attribute_follows_cardinality_policy() {
    let mut model = shop();
    model.classes[1].attributes.push(attribute("codes", "EInt", 2, 5));
    let role = data_role("Item", "codes");

    let source = translate(&model);
    assert!(source.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::intersection_of([
            ClassExpression::min_cardinality(5, role.clone()),
            ClassExpression::max_cardinality(5, role.clone()),
        ])
    )));

    let config = CompilerConfig {
        attribute_cardinality: CardinalityPolicy::LowerBound,
        ..CompilerConfig::default()
    };
    let lower = translate_with(config, &model);
    assert!(lower.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::intersection_of([
            ClassExpression::min_cardinality(2, role.clone()),
            ClassExpression::max_cardinality(5, role),
        ])
    )));
}

#[test]
fn test_half_open_attribute_bounds_are_separate() {
    let mut model = shop();
    model.classes[1].attributes.push(attribute("notes", "EString", 0, 3));
    model.classes[1].attributes.push(attribute("labels", "EString", 2, -1));
    let translation = translate(&model);

    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::max_cardinality(3, data_role("Item", "notes"))
    )));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::min_cardinality(2, data_role("Item", "labels"))
    )));
}

#[test]
fn test_association_cardinality_comes_from_opposite_end() {
    let translation = translate(&shop());
    let items = object_role("Order", "items");
    let order = object_role("Item", "order");

    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Order"),
        ClassExpression::intersection_of([
            ClassExpression::min_cardinality(1, items.clone()),
            ClassExpression::max_cardinality(3, items.clone()),
        ])
    )));
    assert!(translation
        .ontology
        .contains(&Axiom::inverse_properties(order.clone(), items.clone())));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        ClassExpression::Thing,
        ClassExpression::intersection_of([
            ClassExpression::all_values_from(items, concept("Item")),
            ClassExpression::all_values_from(order.clone(), concept("Order")),
        ])
    )));
    // [0..*] on the other end restricts nothing
    assert!(axioms_on(&translation, "Item")
        .iter()
        .all(|axiom| !format!("{:?}", axiom).contains(order.iri().as_str())));
}

#[test]
fn test_association_cardinality_from_own_end() {
    let config = CompilerConfig {
        association_cardinality: AssociationCardinality::OwnEnd,
        ..CompilerConfig::default()
    };
    let translation = translate_with(config, &shop());
    let order = object_role("Item", "order");

    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::intersection_of([
            ClassExpression::min_cardinality(1, order.clone()),
            ClassExpression::max_cardinality(3, order),
        ])
    )));
}

#[test]
fn test_enumeration_is_a_nominal() {
    let mut model = shop();
    model.enums.push(EnumEntity {
        name: "Status".to_string(),
        literals: vec!["open".to_string(), "closed".to_string()],
    });
    model.classes[0].attributes.push(attribute("status", "Status", 0, 1));
    let translation = translate(&model);

    let status = ClassExpression::Named(naming().enumeration("Status"));
    assert!(translation.ontology.contains(&Axiom::equivalent_classes([
        status.clone(),
        ClassExpression::one_of([naming().literal("open"), naming().literal("closed")]),
    ])));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Order"),
        ClassExpression::all_values_from(object_role("Order", "status"), status)
    )));
}

#[test]
fn test_parameterless_operation_types_its_result() {
    let mut model = shop();
    model.classes[0].operations.push(OperationEntity {
        name: "total".to_string(),
        return_type: Some(TypeRef::Unresolved("EDouble".to_string())),
        parameters: vec![],
    });
    let translation = translate(&model);

    let role = PropertyExpression::DataProperty(naming().return_role("Order", "total", Some("double")));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Order"),
        ClassExpression::intersection_of([
            ClassExpression::DataAllValuesFrom {
                property: role.iri().clone(),
                datatype: Datatype::Double,
            },
            ClassExpression::max_cardinality(1, role),
        ])
    )));
}

#[test]
fn test_operation_with_parameters_is_reified() {
    let mut model = shop();
    model.classes[0].operations.push(OperationEntity {
        name: "discount".to_string(),
        return_type: Some(TypeRef::Unresolved("Item".to_string())),
        parameters: vec![ParameterEntity {
            name: "rate".to_string(),
            ty: Some(TypeRef::Unresolved("EDouble".to_string())),
        }],
    });
    let translation = translate(&model);

    let naming = naming();
    let tuple = ClassExpression::Named(naming.operation_concept("Order", "discount", Some("Item")));
    let this = PropertyExpression::ObjectProperty(naming.this_role("Order", "discount"));
    let rate = PropertyExpression::DataProperty(naming.parameter_role("Order", "discount", "rate"));
    let result = PropertyExpression::ObjectProperty(naming.return_role("Order", "discount", Some("Item")));

    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        tuple.clone(),
        ClassExpression::intersection_of([
            ClassExpression::some_values_from(this.clone(), ClassExpression::Thing),
            ClassExpression::max_cardinality(1, this.clone()),
            ClassExpression::min_cardinality(1, rate.clone()),
            ClassExpression::max_cardinality(1, rate.clone()),
        ])
    )));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        tuple.clone(),
        ClassExpression::DataAllValuesFrom {
            property: rate.iri().clone(),
            datatype: Datatype::Double,
        }
    )));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Order"),
        ClassExpression::all_values_from(
            this.inverse(),
            ClassExpression::union_of([
                ClassExpression::complement_of(tuple),
                ClassExpression::all_values_from(result, concept("Item")),
            ])
        )
    )));
}

#[test]
fn test_void_operation_without_parameters_emits_nothing() {
    let mut model = shop();
    let baseline = translate(&model).ontology.len();
    model.classes[0].operations.push(OperationEntity {
        name: "touch".to_string(),
        return_type: None,
        parameters: vec![],
    });
    assert_eq!(translate(&model).ontology.len(), baseline);
}

fn vehicles() -> EntityModel {
    let mut model = EntityModel::new("shop");
    let vehicle = ClassEntity::new("Vehicle");
    let mut car = ClassEntity::new("Car");
    car.supertypes.push("Vehicle".to_string());
    let mut bike = ClassEntity::new("Bike");
    bike.supertypes.push("Vehicle".to_string());
    model.classes = vec![vehicle, car, bike];
    model.classes[0].attributes.push(attribute("wheels", "EInt", 0, 1));
    model
}

#[test]
fn test_plain_inheritance_emits_subsumption_only() {
    let translation = translate(&vehicles());

    assert!(translation
        .ontology
        .contains(&Axiom::sub_class_of(concept("Car"), concept("Vehicle"))));
    assert!(translation
        .ontology
        .contains(&Axiom::sub_class_of(concept("Bike"), concept("Vehicle"))));
    assert!(translation
        .ontology
        .iter()
        .all(|axiom| !matches!(axiom, Axiom::DisjointClasses(_))));
    // inherited attributes get per-class roles
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Car"),
        ClassExpression::max_cardinality(1, data_role("Car", "wheels"))
    )));
}

#[test]
fn test_disjoint_covering_inheritance() {
    let config = CompilerConfig {
        inheritance: InheritanceMode::DisjointCovering,
        ..CompilerConfig::default()
    };
    let translation = translate_with(config, &vehicles());

    assert!(translation
        .ontology
        .contains(&Axiom::disjoint_classes([concept("Car"), concept("Bike")])));
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Vehicle"),
        ClassExpression::union_of([concept("Car"), concept("Bike")])
    )));
}

#[test]
fn test_constraints_become_subsumptions() {
    let mut model = shop();
    model.classes[0]
        .annotations
        .push(invariant("hasItems", "self.items->notEmpty()"));
    let translation = translate(&model);

    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Order"),
        ClassExpression::some_values_from(object_role("Order", "items"), ClassExpression::Thing)
    )));
    let report = &translation.constraints[0];
    assert_eq!(report.outcome, ConstraintOutcome::Emitted);
    assert_eq!(report.normalized.as_deref(), Some("self.items->notEmpty()"));
    assert_eq!(report.rounds, Some(0));
}

#[test]
fn test_for_all_constraint_navigates_through_inverse_end() {
    let mut model = shop();
    model.classes[0].attributes.push(attribute("paid", "EBoolean", 0, 1));
    model.classes[1]
        .annotations
        .push(invariant("paidOrder", "self.order->forAll(o | o.paid)"));
    let translation = translate(&model);

    let paid = ClassExpression::DataSomeValuesFrom {
        property: naming().role("Order", "paid"),
        datatype: Datatype::Literal,
    };
    assert!(translation.ontology.contains(&Axiom::sub_class_of(
        concept("Item"),
        ClassExpression::complement_of(ClassExpression::some_values_from(
            object_role("Item", "order"),
            ClassExpression::complement_of(paid)
        ))
    )));
    assert_eq!(translation.constraints[0].rounds, Some(1));
}

#[test]
fn test_annotations_from_other_sources_are_ignored() {
    let mut model = shop();
    model.classes[0].annotations.push(Annotation {
        source: "http://www.eclipse.org/emf/2002/GenModel".to_string(),
        details: vec![AnnotationDetail {
            key: "documentation".to_string(),
            value: "An order".to_string(),
        }],
    });
    assert!(translate(&model).constraints.is_empty());
}

#[test]
fn test_unknown_property_fails_strict_compilation() {
    let mut model = shop();
    model.classes[0]
        .annotations
        .push(invariant("broken", "self.lines->isEmpty()"));

    let result = Translator::default().translate(&model);
    match result {
        Err(CompileError::Constraint { class, name, .. }) => {
            assert_eq!(class, "Order");
            assert_eq!(name, "broken");
        }
        other => panic!("expected constraint error, got {:?}", other.map(|t| t.constraints)),
    }
}

#[test]
fn test_lenient_policy_skips_failing_constraints() {
    let mut model = shop();
    model.classes[0]
        .annotations
        .push(invariant("broken", "self.lines->isEmpty()"));
    model.classes[0]
        .annotations
        .push(invariant("garbled", "self.items->"));
    let config = CompilerConfig {
        constraint_policy: ConstraintPolicy::Lenient,
        ..CompilerConfig::default()
    };
    let translation = translate_with(config, &model);

    assert_eq!(translation.skipped_constraints().count(), 2);
    assert_eq!(translation.ontology, translate(&shop()).ontology);
}

#[test]
fn test_deeply_nested_constraint_is_a_constraint_error() {
    let nested = format!("{}self.items->notEmpty(){}", "(".repeat(10_000), ")".repeat(10_000));
    let mut model = shop();
    model.classes[0].annotations.push(invariant("nested", &nested));

    assert!(matches!(
        Translator::default().translate(&model),
        Err(CompileError::Constraint { ref name, .. }) if name == "nested"
    ));

    let config = CompilerConfig {
        constraint_policy: ConstraintPolicy::Lenient,
        ..CompilerConfig::default()
    };
    let translation = translate_with(config, &model);
    assert_eq!(translation.skipped_constraints().count(), 1);
    assert_eq!(translation.ontology, translate(&shop()).ontology);
}

#[test]
fn test_unsupported_constraints_are_skipped_even_when_strict() {
    let mut model = shop();
    model.classes[0]
        .annotations
        .push(invariant("collected", "self.items->collect(i | i.order)->notEmpty()"));
    let translation = translate(&model);

    let report = &translation.constraints[0];
    assert!(!report.is_emitted());
    assert!(report.to_string().starts_with("Order::collected skipped"));
}

#[test]
fn test_repairs_are_reported_as_diagnostics() {
    let mut model = shop();
    model.classes[0].attributes.push(attribute("", "EInt", 0, 1));
    let translation = translate(&model);

    assert_eq!(translation.diagnostics.len(), 1);
    assert_eq!(translation.model.classes[0].attributes[0].name, "attribute_0");
    assert!(translation.started_at <= translation.completed_at);
}

#[test]
fn test_fatal_model_errors_abort() {
    let mut model = shop();
    model.classes[1].references[0].opposite = None;
    assert!(matches!(
        Translator::default().translate(&model),
        Err(CompileError::Model(_))
    ));
}

#[test]
fn test_compilation_is_idempotent() {
    let mut model = vehicles();
    model.classes.extend(shop().classes);
    model.classes[3]
        .annotations
        .push(invariant("hasItems", "self.items->notEmpty()"));

    let first = translate(&model);
    let second = translate(&model);
    assert_eq!(first.ontology, second.ontology);
    assert_eq!(first.constraints, second.constraints);
}

#[test]
fn test_package_override_changes_identifiers() {
    let config = CompilerConfig {
        package: Some("store".to_string()),
        ..CompilerConfig::default()
    };
    let translation = translate_with(config, &shop());
    let store = NamingScheme::new(DEFAULT_ONTOLOGY_IRI, "store");
    assert!(translation.ontology.classes.contains(&store.class("Order")));
}
