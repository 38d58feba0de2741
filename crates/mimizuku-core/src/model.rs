//! メタモデル (エンティティモデル) データ構造

use mimizuku_dl::Datatype;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Annotation source whose details are treated as class invariants
pub const OCL_PIVOT_SOURCE: &str = "http://www.eclipse.org/emf/2002/Ecore/OCL/Pivot";

/// Upper bound value meaning "unbounded"
pub const UNBOUNDED: i32 = -1;

fn nullable_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_upper_bound() -> i32 {
    1
}

/// Declared type of an attribute, parameter or operation result.
///
/// Loaders produce `Unresolved` names; the well-formedness checker turns them
/// into one of the resolved variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    Primitive(Datatype),
    Class(String),
    Enum(String),
    Unresolved(String),
}

impl TypeRef {
    /// Type name as used by the naming scheme
    pub fn name(&self) -> String {
        match self {
            TypeRef::Primitive(datatype) => match datatype {
                Datatype::Integer => "integer".to_string(),
                Datatype::Float => "float".to_string(),
                Datatype::Double => "double".to_string(),
                Datatype::Boolean => "boolean".to_string(),
                Datatype::String => "string".to_string(),
                Datatype::Literal => "literal".to_string(),
            },
            TypeRef::Class(name) | TypeRef::Enum(name) | TypeRef::Unresolved(name) => name.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, TypeRef::Unresolved(_))
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        TypeRef::Unresolved(value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.name()
    }
}

/// Checked multiplicity: `upper == None` means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    /// `None` when the raw bounds break a multiplicity invariant:
    /// upper ≠ 0, upper ≥ −1, lower ≥ 0, and upper ≥ lower when finite
    pub fn from_bounds(lower: i32, upper: i32) -> Option<Self> {
        if upper == 0 || upper < UNBOUNDED || lower < 0 {
            return None;
        }
        if upper == UNBOUNDED {
            return Some(Self { lower: lower as u32, upper: None });
        }
        if upper < lower {
            return None;
        }
        Some(Self {
            lower: lower as u32,
            upper: Some(upper as u32),
        })
    }

    pub fn is_exactly_one(&self) -> bool {
        self.lower == 1 && self.upper == Some(1)
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "[{}..{}]", self.lower, upper),
            None => write!(f, "[{}..*]", self.lower),
        }
    }
}

/// Key/value pair of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationDetail {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub source: String,
    #[serde(default)]
    pub details: Vec<AnnotationDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntity {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub lower_bound: i32,
    #[serde(default = "default_upper_bound")]
    pub upper_bound: i32,
}

/// Association end owned by a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: String,
    /// Target class name
    pub target: String,
    /// Name of the opposite reference on the target class
    #[serde(default)]
    pub opposite: Option<String>,
    #[serde(default)]
    pub lower_bound: i32,
    #[serde(default = "default_upper_bound")]
    pub upper_bound: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterEntity {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntity {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: String,
    /// `None` for void operations
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<ParameterEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntity {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeEntity>,
    #[serde(default)]
    pub references: Vec<ReferenceEntity>,
    #[serde(default)]
    pub operations: Vec<OperationEntity>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            attributes: Vec::new(),
            references: Vec::new(),
            operations: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn reference(&self, name: &str) -> Option<&ReferenceEntity> {
        self.references.iter().find(|r| r.name == name)
    }

    /// Named constraint texts from annotations whose source is in `sources`
    pub fn constraints<'a>(
        &'a self,
        sources: &'a [String],
    ) -> impl Iterator<Item = &'a AnnotationDetail> + 'a {
        self.annotations
            .iter()
            .filter(move |a| sources.iter().any(|s| s == &a.source))
            .flat_map(|a| a.details.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntity {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: String,
    #[serde(default)]
    pub literals: Vec<String>,
}

/// Identity of a reference: owning class plus reference name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReferenceKey {
    pub owner: String,
    pub name: String,
}

impl ReferenceKey {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// One package of the metamodel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityModel {
    /// Package prefix used by the naming scheme
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub classes: Vec<ClassEntity>,
    #[serde(default)]
    pub enums: Vec<EnumEntity>,
}

impl EntityModel {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            classes: Vec::new(),
            enums: Vec::new(),
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumEntity> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Strict ancestors of `class`, nearest first. Cycles are cut.
    pub fn ancestors(&self, class: &str) -> Vec<&ClassEntity> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(class.to_string());

        let mut queue: VecDeque<&str> = VecDeque::new();
        if let Some(start) = self.class(class) {
            queue.extend(start.supertypes.iter().map(String::as_str));
        }

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.to_string()) {
                continue;
            }
            if let Some(parent) = self.class(name) {
                queue.extend(parent.supertypes.iter().map(String::as_str));
                result.push(parent);
            }
        }

        result
    }

    /// `class` followed by its ancestors
    pub fn lineage(&self, class: &str) -> Vec<&ClassEntity> {
        let mut lineage: Vec<&ClassEntity> = self.class(class).into_iter().collect();
        lineage.extend(self.ancestors(class));
        lineage
    }

    /// Names of `class` and every ancestor
    pub fn type_closure(&self, class: &str) -> BTreeSet<String> {
        self.lineage(class).into_iter().map(|c| c.name.clone()).collect()
    }

    pub fn is_subtype_of(&self, class: &str, ancestor: &str) -> bool {
        class == ancestor || self.ancestors(class).iter().any(|c| c.name == ancestor)
    }

    /// Own and inherited attributes
    pub fn all_attributes(&self, class: &str) -> Vec<&AttributeEntity> {
        self.lineage(class).into_iter().flat_map(|c| c.attributes.iter()).collect()
    }

    /// Own and inherited operations
    pub fn all_operations(&self, class: &str) -> Vec<&OperationEntity> {
        self.lineage(class).into_iter().flat_map(|c| c.operations.iter()).collect()
    }

    /// Looks `name` up among the references of `class` and its ancestors,
    /// returning the declaring class with the reference
    pub fn find_reference(&self, class: &str, name: &str) -> Option<(&ClassEntity, &ReferenceEntity)> {
        self.lineage(class)
            .into_iter()
            .find_map(|owner| owner.reference(name).map(|r| (owner, r)))
    }

    pub fn find_attribute(&self, class: &str, name: &str) -> Option<&AttributeEntity> {
        self.all_attributes(class).into_iter().find(|a| a.name == name)
    }

    /// Opposite end of `reference`, which is owned by `owner`
    pub fn opposite(&self, reference: &ReferenceEntity) -> Option<(&ClassEntity, &ReferenceEntity)> {
        let opposite_name = reference.opposite.as_deref()?;
        let target = self.class(&reference.target)?;
        target.reference(opposite_name).map(|r| (target, r))
    }

    pub fn direct_subclasses(&self, class: &str) -> Vec<&ClassEntity> {
        self.classes
            .iter()
            .filter(|c| c.supertypes.iter().any(|s| s == class))
            .collect()
    }

    /// Every reference with its key, in declaration order
    pub fn references(&self) -> impl Iterator<Item = (ReferenceKey, &ReferenceEntity)> + '_ {
        self.classes.iter().flat_map(|class| {
            class
                .references
                .iter()
                .map(move |r| (ReferenceKey::new(class.name.clone(), r.name.clone()), r))
        })
    }
}
