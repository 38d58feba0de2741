//! エンティティモデルローダー

use crate::instances::InstanceModel;
use crate::model::EntityModel;
use crate::LoaderError;
use std::path::Path;

/// Entity model loader trait
pub trait ModelLoader {
    fn load_model(&self, source: &str) -> Result<EntityModel, LoaderError>;

    fn load_instances(&self, source: &str) -> Result<InstanceModel, LoaderError>;

    fn load_model_file(&self, path: &Path) -> Result<EntityModel, LoaderError> {
        let source = std::fs::read_to_string(path).map_err(|e| LoaderError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.load_model(&source)
    }

    fn load_instances_file(&self, path: &Path) -> Result<InstanceModel, LoaderError> {
        let source = std::fs::read_to_string(path).map_err(|e| LoaderError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.load_instances(&source)
    }
}

/// JSON loader (serde representation of the model types)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load_model(&self, source: &str) -> Result<EntityModel, LoaderError> {
        Ok(serde_json::from_str(source)?)
    }

    fn load_instances(&self, source: &str) -> Result<InstanceModel, LoaderError> {
        Ok(serde_json::from_str(source)?)
    }
}
