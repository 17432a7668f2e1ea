//! Block Registry - resolves type names to resolved block types
//!
//! The registry aggregates extensions (providers of types, type extensions and
//! type guessers). It supports:
//! - Type resolution with parent chains and type extensions
//! - Detection of missing, misregistered and circular types
//! - A resolution cache shared by every factory using the registry
//! - Guesser aggregation

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::block_type::{BlockType, BlockTypeExtension};
use super::error::BlockError;
use super::guess::{TypeGuesser, TypeGuesserChain};
use super::resolved::ResolvedBlockType;

/// Provider of types, type extensions and a type guesser
pub trait BlockExtension: Send + Sync {
    /// Load a type by the name it was registered under
    ///
    /// # Errors
    /// `InvalidArgument` when the type is unknown to this extension, or was
    /// registered under a name different from its own.
    fn get_type(&self, name: &str) -> Result<Arc<dyn BlockType>, BlockError>;

    fn has_type(&self, name: &str) -> bool;

    /// Extensions of a type, in registration order
    fn type_extensions(&self, name: &str) -> Vec<Arc<dyn BlockTypeExtension>>;

    fn has_type_extensions(&self, name: &str) -> bool;

    fn type_guesser(&self) -> Option<Arc<dyn TypeGuesser>>;
}

/// Extension populated up front with type instances
#[derive(Clone, Default)]
pub struct PreloadedExtension {
    types: IndexMap<String, Arc<dyn BlockType>>,
    type_extensions: IndexMap<String, Vec<Arc<dyn BlockTypeExtension>>>,
    guessers: Vec<Arc<dyn TypeGuesser>>,
}

impl PreloadedExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its own name
    pub fn with_type<T: BlockType + 'static>(self, block_type: T) -> Self {
        self.with_shared_type(Arc::new(block_type))
    }

    pub fn with_shared_type(mut self, block_type: Arc<dyn BlockType>) -> Self {
        self.types.insert(block_type.name().to_string(), block_type);
        self
    }

    /// Register a type under an explicit key
    pub fn with_type_as(mut self, name: &str, block_type: Arc<dyn BlockType>) -> Self {
        self.types.insert(name.to_string(), block_type);
        self
    }

    pub fn with_type_extension<E: BlockTypeExtension + 'static>(self, extension: E) -> Self {
        self.with_shared_type_extension(Arc::new(extension))
    }

    pub fn with_shared_type_extension(mut self, extension: Arc<dyn BlockTypeExtension>) -> Self {
        self.type_extensions
            .entry(extension.extended_type().to_string())
            .or_default()
            .push(extension);
        self
    }

    pub fn with_type_guesser(mut self, guesser: Arc<dyn TypeGuesser>) -> Self {
        self.guessers.push(guesser);
        self
    }

    /// Registered type keys
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl BlockExtension for PreloadedExtension {
    fn get_type(&self, name: &str) -> Result<Arc<dyn BlockType>, BlockError> {
        let block_type = self.types.get(name).ok_or_else(|| {
            BlockError::InvalidArgument(format!("The type \"{name}\" cannot be loaded by this extension"))
        })?;
        if block_type.name() != name {
            return Err(BlockError::InvalidArgument(format!(
                "The type name registered for \"{name}\" does not match the actual name \"{}\"",
                block_type.name()
            )));
        }
        Ok(Arc::clone(block_type))
    }

    fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    fn type_extensions(&self, name: &str) -> Vec<Arc<dyn BlockTypeExtension>> {
        self.type_extensions.get(name).cloned().unwrap_or_default()
    }

    fn has_type_extensions(&self, name: &str) -> bool {
        self.type_extensions.get(name).is_some_and(|list| !list.is_empty())
    }

    fn type_guesser(&self) -> Option<Arc<dyn TypeGuesser>> {
        match self.guessers.len() {
            0 => None,
            1 => self.guessers.first().cloned(),
            _ => Some(Arc::new(TypeGuesserChain::new(self.guessers.clone()))),
        }
    }
}

/// Block registry resolving and caching types
///
/// The cache uses parking_lot's `RwLock` so concurrent readers never contend
/// once a type is resolved.
pub struct BlockRegistry {
    extensions: Vec<Arc<dyn BlockExtension>>,
    types: RwLock<HashMap<String, Arc<ResolvedBlockType>>>,
    guesser: Option<TypeGuesserChain>,
}

impl BlockRegistry {
    /// Create a registry over the given extensions
    ///
    /// Extensions are queried in order; the first one that knows a type name
    /// provides it.
    ///
    /// # Example
    /// ```
    /// use typed_blocks::core::registry::BlockRegistry;
    /// use typed_blocks::extension::CoreExtension;
    /// use std::sync::Arc;
    ///
    /// let registry = BlockRegistry::new(vec![Arc::new(CoreExtension::new())]);
    /// assert!(registry.has_type("text"));
    /// ```
    pub fn new(extensions: Vec<Arc<dyn BlockExtension>>) -> Self {
        let guessers: Vec<Arc<dyn TypeGuesser>> =
            extensions.iter().filter_map(|e| e.type_guesser()).collect();
        let guesser = (!guessers.is_empty()).then(|| TypeGuesserChain::new(guessers));
        Self {
            extensions,
            types: RwLock::new(HashMap::new()),
            guesser,
        }
    }

    pub fn extensions(&self) -> &[Arc<dyn BlockExtension>] {
        &self.extensions
    }

    /// Resolve a type name
    ///
    /// # Arguments
    /// * `name` - The registered type name
    ///
    /// # Returns
    /// * `Ok(Arc<ResolvedBlockType>)` - the cached resolution, or a fresh one
    /// * `Err(BlockError::InvalidArgument)` if the type or one of its
    ///   ancestors cannot be loaded, or the parent chain is circular
    pub fn resolve(&self, name: &str) -> Result<Arc<ResolvedBlockType>, BlockError> {
        self.resolve_chain(name, &mut Vec::new())
    }

    fn resolve_chain(
        &self,
        name: &str,
        chain: &mut Vec<String>,
    ) -> Result<Arc<ResolvedBlockType>, BlockError> {
        if let Some(resolved) = self.types.read().get(name) {
            tracing::trace!(block_type = name, "type cache hit");
            return Ok(Arc::clone(resolved));
        }
        if chain.iter().any(|n| n == name) {
            return Err(BlockError::InvalidArgument(format!(
                "Circular reference detected for type \"{name}\" ({} > {name})",
                chain.join(" > ")
            )));
        }

        let inner = self.load_type(name)?;
        let parent = match inner.parent() {
            Some(parent_name) => {
                chain.push(name.to_string());
                let parent = self.resolve_chain(parent_name, chain);
                chain.pop();
                Some(parent?)
            }
            None => None,
        };
        let resolved = Arc::new(ResolvedBlockType::new(inner, self.type_extensions(name), parent)?);
        tracing::debug!(
            block_type = name,
            extensions = resolved.type_extensions().len(),
            "type resolved"
        );

        let mut types = self.types.write();
        Ok(Arc::clone(types.entry(name.to_string()).or_insert(resolved)))
    }

    fn load_type(&self, name: &str) -> Result<Arc<dyn BlockType>, BlockError> {
        match self.extensions.iter().find(|e| e.has_type(name)) {
            Some(extension) => extension.get_type(name),
            None => Err(BlockError::InvalidArgument(format!(
                "Could not load type \"{name}\""
            ))),
        }
    }

    /// Whether a type name can be resolved
    pub fn has_type(&self, name: &str) -> bool {
        self.types.read().contains_key(name) || self.resolve(name).is_ok()
    }

    /// Extensions of a type across all extensions, in registration order
    pub fn type_extensions(&self, name: &str) -> Vec<Arc<dyn BlockTypeExtension>> {
        self.extensions
            .iter()
            .flat_map(|e| e.type_extensions(name))
            .collect()
    }

    pub fn has_type_extensions(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e.has_type_extensions(name))
    }

    /// Guesser chain over every extension's guesser
    pub fn type_guesser(&self) -> Option<&TypeGuesserChain> {
        self.guesser.as_ref()
    }

    /// Number of cached resolutions
    pub fn resolved_count(&self) -> usize {
        self.types.read().len()
    }
}

impl std::fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("extensions", &self.extensions.len())
            .field("resolved", &self.types.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
