//! Frozen block configuration

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use super::event::EventDispatcher;
use super::factory::BlockFactory;
use super::mapper::DataMapper;
use super::options::Options;
use super::property_path::PropertyPath;
use super::resolved::ResolvedBlockType;
use super::transformer::TransformerChain;
use super::Data;

/// Immutable snapshot of a builder, shared by a block and its dispatch calls
pub struct BlockConfig {
    pub(crate) name: String,
    pub(crate) resolved_type: Arc<ResolvedBlockType>,
    pub(crate) options: Options,
    pub(crate) data: Data,
    pub(crate) data_locked: bool,
    pub(crate) data_class: Option<String>,
    pub(crate) empty_data: Data,
    pub(crate) mapped: bool,
    pub(crate) property_path: Option<PropertyPath>,
    pub(crate) compound: bool,
    pub(crate) view_transformers: TransformerChain,
    pub(crate) model_transformers: TransformerChain,
    pub(crate) data_mapper: Option<Arc<dyn DataMapper>>,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) attributes: IndexMap<String, Data>,
    pub(crate) allowed_children: Option<Vec<String>>,
    pub(crate) factory: BlockFactory,
}

impl BlockConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolved_type(&self) -> &Arc<ResolvedBlockType> {
        &self.resolved_type
    }

    /// Name of the resolved type
    pub fn type_name(&self) -> &str {
        self.resolved_type.name()
    }

    /// Validated options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Configured data, used by `Block::initialize`
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Whether mappers leave this block's data alone
    pub fn is_data_locked(&self) -> bool {
        self.data_locked
    }

    pub fn data_class(&self) -> Option<&str> {
        self.data_class.as_deref()
    }

    /// View data used when a bind submits nothing
    pub fn empty_data(&self) -> &Data {
        &self.empty_data
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn property_path(&self) -> Option<&PropertyPath> {
        self.property_path.as_ref()
    }

    pub fn is_compound(&self) -> bool {
        self.compound
    }

    pub fn view_transformers(&self) -> &TransformerChain {
        &self.view_transformers
    }

    pub fn model_transformers(&self) -> &TransformerChain {
        &self.model_transformers
    }

    pub fn data_mapper(&self) -> Option<&Arc<dyn DataMapper>> {
        self.data_mapper.as_ref()
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn attributes(&self) -> &IndexMap<String, Data> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Data> {
        self.attributes.get(key)
    }

    /// Type names accepted as children, `None` when unrestricted
    pub fn allowed_children(&self) -> Option<&[String]> {
        self.allowed_children.as_deref()
    }

    /// Factory the block was built with, for listeners that create children
    pub fn factory(&self) -> &BlockFactory {
        &self.factory
    }
}

impl fmt::Debug for BlockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockConfig")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("compound", &self.compound)
            .field("mapped", &self.mapped)
            .field("property_path", &self.property_path)
            .field("data_locked", &self.data_locked)
            .field("view_transformers", &self.view_transformers.len())
            .field("model_transformers", &self.model_transformers.len())
            .field("has_mapper", &self.data_mapper.is_some())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
