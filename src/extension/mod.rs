//! Core extension
//!
//! Built-in types, the data mappers and transformers they use, and the
//! listeners they attach.

pub mod data_mapper;
pub mod listener;
pub mod transformer;
pub mod types;

use std::sync::Arc;

use crate::core::block_type::{BlockType, BlockTypeExtension};
use crate::core::error::BlockError;
use crate::core::guess::TypeGuesser;
use crate::core::registry::{BlockExtension, PreloadedExtension};

/// Extension providing the built-in types
#[derive(Clone)]
pub struct CoreExtension {
    inner: PreloadedExtension,
}

impl CoreExtension {
    pub fn new() -> Self {
        let inner = PreloadedExtension::new()
            .with_type(types::BaseBlockType)
            .with_type(types::FieldType)
            .with_type(types::TextType)
            .with_type(types::IntegerType)
            .with_type(types::CheckboxType)
            .with_type(types::DateType)
            .with_type(types::ObjectType)
            .with_type(types::CollectionType)
            .with_type(types::PanelType);
        Self { inner }
    }

    /// Names of the built-in types
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.inner.type_names()
    }
}

impl Default for CoreExtension {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockExtension for CoreExtension {
    fn get_type(&self, name: &str) -> Result<Arc<dyn BlockType>, BlockError> {
        self.inner.get_type(name)
    }

    fn has_type(&self, name: &str) -> bool {
        self.inner.has_type(name)
    }

    fn type_extensions(&self, name: &str) -> Vec<Arc<dyn BlockTypeExtension>> {
        self.inner.type_extensions(name)
    }

    fn has_type_extensions(&self, name: &str) -> bool {
        self.inner.has_type_extensions(name)
    }

    fn type_guesser(&self) -> Option<Arc<dyn TypeGuesser>> {
        self.inner.type_guesser()
    }
}
