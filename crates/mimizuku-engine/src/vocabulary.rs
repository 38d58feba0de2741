//! 制約式から見たモデル語彙

use mimizuku_core::{EntityModel, TypeRef};
use mimizuku_dl::{ClassExpression, NamingScheme, PropertyExpression};
use mimizuku_ocl::{Navigation, Vocabulary};

/// Resolves constraint navigations with the same role names the compiler emits
pub struct ModelVocabulary<'m> {
    model: &'m EntityModel,
    naming: &'m NamingScheme,
}

impl<'m> ModelVocabulary<'m> {
    pub fn new(model: &'m EntityModel, naming: &'m NamingScheme) -> Self {
        Self { model, naming }
    }
}

impl Vocabulary for ModelVocabulary<'_> {
    fn navigate(&self, class: &str, property: &str) -> Option<Navigation> {
        if let Some(attribute) = self.model.find_attribute(class, property) {
            let role = self.naming.role(class, property);
            return match attribute.ty.as_ref()? {
                TypeRef::Primitive(_) => Some(Navigation {
                    role: PropertyExpression::DataProperty(role),
                    target: None,
                }),
                TypeRef::Class(target) => Some(Navigation {
                    role: PropertyExpression::ObjectProperty(role),
                    target: Some(target.clone()),
                }),
                TypeRef::Enum(_) => Some(Navigation {
                    role: PropertyExpression::ObjectProperty(role),
                    target: None,
                }),
                TypeRef::Unresolved(_) => None,
            };
        }

        let (owner, reference) = self.model.find_reference(class, property)?;
        Some(Navigation {
            role: PropertyExpression::ObjectProperty(self.naming.role(&owner.name, &reference.name)),
            target: Some(reference.target.clone()),
        })
    }

    fn concept(&self, class: &str) -> Option<ClassExpression> {
        self.model
            .class(class)
            .map(|c| ClassExpression::Named(self.naming.class(&c.name)))
    }
}
