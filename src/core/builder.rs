//! Block builder
//!
//! A [`BlockBuilder`] is the mutable stage of a block. Type hooks and callers
//! configure it (options, listeners, transformers, mapper, children) and
//! [`BlockBuilder::get_block`] consumes it into a runtime [`Block`] with a
//! frozen [`BlockConfig`].

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use super::block::Block;
use super::config::BlockConfig;
use super::error::BlockError;
use super::event::{BlockListener, EventDispatcher, EventKind, EventSubscriber};
use super::factory::BlockFactory;
use super::mapper::DataMapper;
use super::options::Options;
use super::property_path::PropertyPath;
use super::resolved::ResolvedBlockType;
use super::transformer::{DataTransformer, TransformerChain};
use super::Data;

/// Mutable, tree-shaped assembly of a block
pub struct BlockBuilder {
    name: String,
    factory: BlockFactory,
    resolved_type: Arc<ResolvedBlockType>,
    options: Options,
    data: Data,
    data_locked: bool,
    data_class: Option<String>,
    empty_data: Data,
    mapped: bool,
    property_path: Option<PropertyPath>,
    compound: bool,
    view_transformers: TransformerChain,
    model_transformers: TransformerChain,
    data_mapper: Option<Arc<dyn DataMapper>>,
    dispatcher: EventDispatcher,
    attributes: IndexMap<String, Data>,
    allowed_children: Option<Vec<String>>,
    children: IndexMap<String, BlockBuilder>,
}

/// Check a block name: letters, digits, `_`, `-` and `:`, not starting with `-` or `:`
pub fn validate_name(name: &str) -> Result<(), BlockError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphanumeric() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'))
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(BlockError::InvalidArgument(format!(
            "The name \"{name}\" contains illegal characters. Names should start with a letter, digit or underscore and only contain letters, digits, underscores (\"_\"), hyphens (\"-\") and colons (\":\")"
        )))
    }
}

impl BlockBuilder {
    pub(crate) fn new(
        name: &str,
        factory: BlockFactory,
        resolved_type: Arc<ResolvedBlockType>,
        options: Options,
    ) -> Result<Self, BlockError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            factory,
            resolved_type,
            options,
            data: Data::Null,
            data_locked: false,
            data_class: None,
            empty_data: Data::Null,
            mapped: true,
            property_path: None,
            compound: false,
            view_transformers: TransformerChain::new(),
            model_transformers: TransformerChain::new(),
            data_mapper: None,
            dispatcher: EventDispatcher::new(),
            attributes: IndexMap::new(),
            allowed_children: None,
            children: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn factory(&self) -> &BlockFactory {
        &self.factory
    }

    pub fn resolved_type(&self) -> &Arc<ResolvedBlockType> {
        &self.resolved_type
    }

    /// Validated options the builder was created with
    pub fn options(&self) -> &Options {
        &self.options
    }

    // ── Children ──────────────────────────────────────────────────────────

    /// Add a child builder, replacing a child of the same name
    ///
    /// # Errors
    /// `BadMethodCall` when the builder is not compound.
    pub fn add(&mut self, child: BlockBuilder) -> Result<&mut Self, BlockError> {
        if !self.compound {
            return Err(BlockError::BadMethodCall(format!(
                "Cannot add child \"{}\" to the non-compound block \"{}\"",
                child.name, self.name
            )));
        }
        self.children.insert(child.name.clone(), child);
        Ok(self)
    }

    /// Create a child builder through the factory and add it
    pub fn add_child(
        &mut self,
        name: &str,
        type_name: &str,
        options: Options,
    ) -> Result<&mut Self, BlockError> {
        let child = self
            .factory
            .create_named_builder(name, type_name, Data::Null, options)?;
        self.add(child)
    }

    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.children.shift_remove(name);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BlockBuilder> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BlockBuilder> {
        self.children.get_mut(name)
    }

    /// Child builders in insertion order
    pub fn children(&self) -> impl Iterator<Item = &BlockBuilder> {
        self.children.values()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    // ── Pipeline ──────────────────────────────────────────────────────────

    pub fn set_data_mapper(&mut self, mapper: Option<Arc<dyn DataMapper>>) -> &mut Self {
        self.data_mapper = mapper;
        self
    }

    pub fn data_mapper(&self) -> Option<&Arc<dyn DataMapper>> {
        self.data_mapper.as_ref()
    }

    pub fn add_event_listener<L>(&mut self, kind: EventKind, priority: i32, listener: L) -> &mut Self
    where
        L: BlockListener + 'static,
    {
        self.dispatcher.add_listener(kind, priority, Arc::new(listener));
        self
    }

    pub fn add_event_subscriber<S>(&mut self, subscriber: S) -> &mut Self
    where
        S: EventSubscriber + 'static,
    {
        self.dispatcher.add_subscriber(Arc::new(subscriber));
        self
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Append a view transformer (normalized ↔ view)
    pub fn add_view_transformer<T: DataTransformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.view_transformers.push(Arc::new(transformer));
        self
    }

    pub fn prepend_view_transformer<T: DataTransformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.view_transformers.prepend(Arc::new(transformer));
        self
    }

    pub fn reset_view_transformers(&mut self) -> &mut Self {
        self.view_transformers.clear();
        self
    }

    /// Append a model transformer (model ↔ normalized)
    pub fn add_model_transformer<T: DataTransformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.model_transformers.push(Arc::new(transformer));
        self
    }

    pub fn prepend_model_transformer<T: DataTransformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.model_transformers.prepend(Arc::new(transformer));
        self
    }

    pub fn reset_model_transformers(&mut self) -> &mut Self {
        self.model_transformers.clear();
        self
    }

    pub fn view_transformers(&self) -> &TransformerChain {
        &self.view_transformers
    }

    pub fn model_transformers(&self) -> &TransformerChain {
        &self.model_transformers
    }

    // ── Settings ──────────────────────────────────────────────────────────

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Data>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Data> {
        self.attributes.get(key)
    }

    pub fn set_compound(&mut self, compound: bool) -> &mut Self {
        self.compound = compound;
        self
    }

    pub fn is_compound(&self) -> bool {
        self.compound
    }

    pub fn set_mapped(&mut self, mapped: bool) -> &mut Self {
        self.mapped = mapped;
        self
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Property path inside the parent's data; `None` falls back to the name
    pub fn set_property_path(&mut self, path: Option<PropertyPath>) -> &mut Self {
        self.property_path = path;
        self
    }

    pub fn property_path(&self) -> Option<&PropertyPath> {
        self.property_path.as_ref()
    }

    /// Data set by `Block::initialize`
    pub fn set_data(&mut self, data: Data) -> &mut Self {
        self.data = data;
        self
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn set_data_locked(&mut self, locked: bool) -> &mut Self {
        self.data_locked = locked;
        self
    }

    pub fn is_data_locked(&self) -> bool {
        self.data_locked
    }

    pub fn set_empty_data(&mut self, empty_data: Data) -> &mut Self {
        self.empty_data = empty_data;
        self
    }

    pub fn empty_data(&self) -> &Data {
        &self.empty_data
    }

    pub fn set_data_class(&mut self, data_class: Option<String>) -> &mut Self {
        self.data_class = data_class;
        self
    }

    pub fn data_class(&self) -> Option<&str> {
        self.data_class.as_deref()
    }

    /// Restrict children to the given type names (or their descendants)
    pub fn set_allowed_children(&mut self, allowed: Option<Vec<String>>) -> &mut Self {
        self.allowed_children = allowed;
        self
    }

    pub fn allowed_children(&self) -> Option<&[String]> {
        self.allowed_children.as_deref()
    }

    // ── Freeze ────────────────────────────────────────────────────────────

    /// Freeze this builder and its children into a block
    ///
    /// # Errors
    /// * `InvalidArgument` when a compound builder has no data mapper, or a
    ///   non-compound builder has one
    /// * `InvalidChild` when a child's type is not allowed
    pub fn get_block(self) -> Result<Block, BlockError> {
        match (self.compound, self.data_mapper.is_some()) {
            (true, false) => {
                return Err(BlockError::InvalidArgument(format!(
                    "The compound block \"{}\" requires a data mapper",
                    self.name
                )))
            }
            (false, true) => {
                return Err(BlockError::InvalidArgument(format!(
                    "The non-compound block \"{}\" cannot have a data mapper",
                    self.name
                )))
            }
            _ => {}
        }

        let property_path = match (self.property_path, self.mapped) {
            (Some(path), _) => Some(path),
            (None, true) => Some(PropertyPath::parse(&self.name)?),
            (None, false) => None,
        };

        let config = BlockConfig {
            name: self.name,
            resolved_type: self.resolved_type,
            options: self.options,
            data: self.data,
            data_locked: self.data_locked,
            data_class: self.data_class,
            empty_data: self.empty_data,
            mapped: self.mapped,
            property_path,
            compound: self.compound,
            view_transformers: self.view_transformers,
            model_transformers: self.model_transformers,
            data_mapper: self.data_mapper,
            dispatcher: self.dispatcher,
            attributes: self.attributes,
            allowed_children: self.allowed_children,
            factory: self.factory,
        };

        let mut block = Block::new(config);
        for (_, child) in self.children {
            block.add(child.get_block()?)?;
        }
        tracing::trace!(block = %block.name(), block_type = %block.type_name(), children = block.child_count(), "block frozen");
        Ok(block)
    }
}

impl fmt::Debug for BlockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockBuilder")
            .field("name", &self.name)
            .field("type", &self.resolved_type.name())
            .field("compound", &self.compound)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}
