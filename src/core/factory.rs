//! Block factory
//!
//! Entry point for creating blocks and builders by type name. A factory shares
//! one [`BlockRegistry`]; cloning a factory is cheap.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::block::Block;
use super::block_type::{BlockType, BlockTypeExtension};
use super::builder::BlockBuilder;
use super::error::BlockError;
use super::guess::{TypeGuess, TypeGuesser};
use super::options::Options;
use super::registry::{BlockExtension, BlockRegistry, PreloadedExtension};
use super::{unique_name, Data};
use crate::extension::CoreExtension;

/// Creates blocks and builders from registered types
#[derive(Clone)]
pub struct BlockFactory {
    registry: Arc<BlockRegistry>,
}

impl BlockFactory {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self { registry }
    }

    /// Start configuring a factory with the core types
    pub fn builder() -> BlockFactoryBuilder {
        BlockFactoryBuilder::new()
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Create a block with a generated name
    pub fn create(&self, type_name: &str, data: Data, options: Options) -> Result<Block, BlockError> {
        self.create_named(&unique_name("block"), type_name, data, options)
    }

    /// Create and initialize a block
    ///
    /// # Arguments
    /// * `name` - Block name, unique among its siblings
    /// * `type_name` - Registered type name
    /// * `data` - Initial model data (`null` keeps the `data` option)
    /// * `options` - Options validated against the type's merged schema
    ///
    /// # Example
    /// ```
    /// use typed_blocks::core::{BlockFactory, Options};
    /// use serde_json::json;
    ///
    /// let factory = BlockFactory::builder().build();
    /// let block = factory
    ///     .create_named("title", "text", json!("Hello"), Options::new())
    ///     .unwrap();
    /// assert_eq!(block.view_data(), &json!("Hello"));
    /// ```
    pub fn create_named(
        &self,
        name: &str,
        type_name: &str,
        data: Data,
        options: Options,
    ) -> Result<Block, BlockError> {
        let mut block = self
            .create_named_builder(name, type_name, data, options)?
            .get_block()?;
        block.initialize()?;
        Ok(block)
    }

    /// Create a builder with a generated name
    pub fn create_builder(
        &self,
        type_name: &str,
        data: Data,
        options: Options,
    ) -> Result<BlockBuilder, BlockError> {
        self.create_named_builder(&unique_name("block"), type_name, data, options)
    }

    /// Create a builder; a non-null `data` becomes the `data` option
    pub fn create_named_builder(
        &self,
        name: &str,
        type_name: &str,
        data: Data,
        options: Options,
    ) -> Result<BlockBuilder, BlockError> {
        let resolved = self.registry.resolve(type_name)?;
        let mut options = options;
        if !data.is_null() {
            options.insert("data", data);
        }
        resolved.create_builder(self, name, options)
    }

    /// Create a block for `class::property`, guessing its type
    pub fn create_for_property(
        &self,
        class: &str,
        property: &str,
        data: Data,
        options: Options,
    ) -> Result<Block, BlockError> {
        let mut block = self
            .create_builder_for_property(class, property, data, options)?
            .get_block()?;
        block.initialize()?;
        Ok(block)
    }

    /// Create a builder for `class::property`
    ///
    /// The type comes from the guesser chain (`text` when nothing is guessed).
    /// Guessed `required` and maximum length fill in options the caller did
    /// not supply.
    pub fn create_builder_for_property(
        &self,
        class: &str,
        property: &str,
        data: Data,
        options: Options,
    ) -> Result<BlockBuilder, BlockError> {
        let Some(guesser) = self.registry.type_guesser() else {
            return self.create_named_builder(property, "text", data, options);
        };

        let guess = guesser
            .guess_type(class, property)
            .unwrap_or_else(|| TypeGuess::new("text", Options::new(), super::guess::Confidence::Low));
        tracing::debug!(class, property, block_type = guess.type_name(), "type guessed");

        let mut merged = guess.options().clone();
        if let Some(required) = guesser.guess_required(class, property) {
            merged.insert("required", *required.value());
        }
        merged.merge(options);
        if let Some(max_length) = guesser.guess_max_length(class, property) {
            let max_length = Data::from(*max_length.value());
            match merged.remove("attr") {
                Some(Data::Object(mut attr)) => {
                    attr.entry("maxlength").or_insert(max_length);
                    merged.insert("attr", Data::Object(attr));
                }
                // not an object: left for the resolver to reject
                Some(other) => {
                    merged.insert("attr", other);
                }
                None => {
                    let mut attr = serde_json::Map::new();
                    attr.insert("maxlength".to_string(), max_length);
                    merged.insert("attr", Data::Object(attr));
                }
            }
        }

        self.create_named_builder(property, guess.type_name(), data, merged)
    }

    /// Create and initialize a block tree from a definition
    pub fn create_from_definition(&self, definition: &BlockDefinition) -> Result<Block, BlockError> {
        let mut block = self.create_builder_from_definition(definition)?.get_block()?;
        block.initialize()?;
        Ok(block)
    }

    /// Create a builder tree from a definition
    pub fn create_builder_from_definition(
        &self,
        definition: &BlockDefinition,
    ) -> Result<BlockBuilder, BlockError> {
        let mut builder = self.create_named_builder(
            &definition.name,
            &definition.type_name,
            Data::Null,
            definition.options.clone(),
        )?;
        for child in &definition.children {
            builder.add(self.create_builder_from_definition(child)?)?;
        }
        Ok(builder)
    }
}

impl std::fmt::Debug for BlockFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockFactory")
            .field("registry", &self.registry)
            .finish()
    }
}

/// Serializable description of a block tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockDefinition>,
}

impl BlockDefinition {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            options: Options::new(),
            children: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_child(mut self, child: BlockDefinition) -> Self {
        self.children.push(child);
        self
    }
}

/// Configures the extensions of a factory
///
/// The core extension always comes first; loose types, type extensions and
/// guessers are collected into one extension registered last.
#[derive(Default)]
pub struct BlockFactoryBuilder {
    extensions: Vec<Arc<dyn BlockExtension>>,
    types: Vec<Arc<dyn BlockType>>,
    type_extensions: Vec<Arc<dyn BlockTypeExtension>>,
    guessers: Vec<Arc<dyn TypeGuesser>>,
}

impl BlockFactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_extension<E: BlockExtension + 'static>(mut self, extension: E) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn add_type<T: BlockType + 'static>(mut self, block_type: T) -> Self {
        self.types.push(Arc::new(block_type));
        self
    }

    pub fn add_type_extension<E: BlockTypeExtension + 'static>(mut self, extension: E) -> Self {
        self.type_extensions.push(Arc::new(extension));
        self
    }

    pub fn add_type_guesser<G: TypeGuesser + 'static>(mut self, guesser: G) -> Self {
        self.guessers.push(Arc::new(guesser));
        self
    }

    /// Build the registry and the factory
    pub fn build(self) -> BlockFactory {
        let mut extensions: Vec<Arc<dyn BlockExtension>> = vec![Arc::new(CoreExtension::new())];
        extensions.extend(self.extensions);

        if !self.types.is_empty() || !self.type_extensions.is_empty() || !self.guessers.is_empty() {
            let mut loose = PreloadedExtension::new();
            for block_type in self.types {
                loose = loose.with_shared_type(block_type);
            }
            for extension in self.type_extensions {
                loose = loose.with_shared_type_extension(extension);
            }
            for guesser in self.guessers {
                loose = loose.with_type_guesser(guesser);
            }
            extensions.push(Arc::new(loose));
        }

        BlockFactory::new(Arc::new(BlockRegistry::new(extensions)))
    }
}
