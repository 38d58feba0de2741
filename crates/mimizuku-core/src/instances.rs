//! オブジェクトモデル (インスタンス) データ構造

use crate::model::{EntityModel, ReferenceKey};
use crate::InstanceError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One object of the instance model, tagged with its most specific class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInstance {
    pub id: String,
    pub class: String,
}

/// Outgoing links of one object through one reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInstance {
    pub source: String,
    pub reference: String,
    /// Target object ids, in link order
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Instance model as supplied by a loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceModel {
    #[serde(default)]
    pub objects: Vec<ObjectInstance>,
    #[serde(default)]
    pub links: Vec<LinkInstance>,
}

/// Objects grouped by class, each object also listed under every ancestor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePool {
    groups: BTreeMap<String, Vec<String>>,
}

impl InstancePool {
    /// Object ids grouped under `class`, in instance-model order
    pub fn instances_of(&self, class: &str) -> &[String] {
        self.groups.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn contains(&self, class: &str, id: &str) -> bool {
        self.instances_of(class).iter().any(|o| o == id)
    }
}

/// Recorded links keyed by reference, then by source object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPool {
    links: BTreeMap<ReferenceKey, BTreeMap<String, Vec<String>>>,
}

impl LinkPool {
    /// Linked targets of `source` through `reference`, `None` when unlinked
    pub fn targets(&self, reference: &ReferenceKey, source: &str) -> Option<&[String]> {
        self.links
            .get(reference)
            .and_then(|by_source| by_source.get(source))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.links.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InstanceModel {
    /// Builds the grouped object pool and the link pool, checking every id
    /// and reference against `model`
    pub fn pools(&self, model: &EntityModel) -> Result<(InstancePool, LinkPool), InstanceError> {
        let mut pool = InstancePool::default();
        let mut classes_by_id = BTreeMap::new();
        let mut seen = HashSet::new();

        for object in &self.objects {
            if !seen.insert(object.id.as_str()) {
                return Err(InstanceError::DuplicateObject(object.id.clone()));
            }
            if model.class(&object.class).is_none() {
                return Err(InstanceError::UnknownClass {
                    object: object.id.clone(),
                    class: object.class.clone(),
                });
            }
            for class in model.lineage(&object.class) {
                pool.groups
                    .entry(class.name.clone())
                    .or_default()
                    .push(object.id.clone());
            }
            classes_by_id.insert(object.id.as_str(), object.class.as_str());
        }

        let mut links = LinkPool::default();
        for link in &self.links {
            let source_class = classes_by_id
                .get(link.source.as_str())
                .ok_or_else(|| InstanceError::UnknownObject(link.source.clone()))?;

            let (owner, reference) = model
                .find_reference(source_class, &link.reference)
                .ok_or_else(|| InstanceError::UnknownReference {
                    class: source_class.to_string(),
                    reference: link.reference.clone(),
                })?;

            for target in &link.targets {
                let target_class = classes_by_id
                    .get(target.as_str())
                    .ok_or_else(|| InstanceError::UnknownObject(target.clone()))?;
                if !model.is_subtype_of(target_class, &reference.target) {
                    return Err(InstanceError::IncompatibleTarget {
                        object: target.clone(),
                        reference: format!("{}.{}", owner.name, reference.name),
                    });
                }
            }

            links
                .links
                .entry(ReferenceKey::new(owner.name.clone(), reference.name.clone()))
                .or_default()
                .entry(link.source.clone())
                .or_default()
                .extend(link.targets.iter().cloned());
        }

        Ok((pool, links))
    }
}
