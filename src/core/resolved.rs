//! Resolved block types
//!
//! A [`ResolvedBlockType`] is a block type merged with its parent chain and
//! with every extension registered for it. Resolution happens once per type
//! name (see [`BlockRegistry`](super::registry::BlockRegistry)); the merged
//! option schema is computed eagerly so a resolved type is read-only afterwards.

use std::fmt;
use std::sync::Arc;

use super::block::Block;
use super::block_type::{BlockType, BlockTypeExtension};
use super::builder::BlockBuilder;
use super::error::BlockError;
use super::factory::BlockFactory;
use super::options::{Options, OptionsResolver};
use super::view::ViewMut;

/// Block type merged with its ancestry and extensions
pub struct ResolvedBlockType {
    inner: Arc<dyn BlockType>,
    extensions: Vec<Arc<dyn BlockTypeExtension>>,
    parent: Option<Arc<ResolvedBlockType>>,
    options_resolver: OptionsResolver,
}

impl ResolvedBlockType {
    /// Merge a type with its extensions and its resolved parent
    ///
    /// # Errors
    /// `InvalidArgument` when the parent does not match the type's declared
    /// parent, or an extension targets another type.
    pub fn new(
        inner: Arc<dyn BlockType>,
        extensions: Vec<Arc<dyn BlockTypeExtension>>,
        parent: Option<Arc<ResolvedBlockType>>,
    ) -> Result<Self, BlockError> {
        let declared = inner.parent();
        let actual = parent.as_ref().map(|p| p.name());
        if declared != actual {
            return Err(BlockError::InvalidArgument(format!(
                "The type \"{}\" declares parent {:?} but was resolved with parent {:?}",
                inner.name(),
                declared,
                actual
            )));
        }
        if let Some(ext) = extensions.iter().find(|e| e.extended_type() != inner.name()) {
            return Err(BlockError::InvalidArgument(format!(
                "A type extension for \"{}\" cannot extend the type \"{}\"",
                ext.extended_type(),
                inner.name()
            )));
        }

        let mut options_resolver = parent
            .as_ref()
            .map(|p| p.options_resolver.clone())
            .unwrap_or_default();
        inner.configure_options(&mut options_resolver);
        for extension in &extensions {
            extension.configure_options(&mut options_resolver);
        }

        Ok(Self {
            inner,
            extensions,
            parent,
            options_resolver,
        })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn parent(&self) -> Option<&Arc<ResolvedBlockType>> {
        self.parent.as_ref()
    }

    pub fn inner_type(&self) -> &Arc<dyn BlockType> {
        &self.inner
    }

    pub fn type_extensions(&self) -> &[Arc<dyn BlockTypeExtension>] {
        &self.extensions
    }

    /// Merged option schema of the whole ancestry
    pub fn options_resolver(&self) -> &OptionsResolver {
        &self.options_resolver
    }

    /// Validate and complete an option bag
    pub fn resolve_options(&self, options: Options) -> Result<Options, BlockError> {
        self.options_resolver.resolve(options)
    }

    /// Whether this type is `name` or descends from it
    pub fn is_type_of(&self, name: &str) -> bool {
        self.hierarchy().any(|t| t.name() == name)
    }

    /// Type names from the root ancestor down to this type
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hierarchy().map(|t| t.name()).collect();
        names.reverse();
        names
    }

    /// This type, then its parent, up to the root
    fn hierarchy(&self) -> impl Iterator<Item = &ResolvedBlockType> {
        std::iter::successors(Some(self), |t| t.parent.as_deref())
    }

    /// Create a builder of this type with validated options and run the build hooks
    pub fn create_builder(
        self: &Arc<Self>,
        factory: &BlockFactory,
        name: &str,
        options: Options,
    ) -> Result<BlockBuilder, BlockError> {
        let options = self.resolve_options(options)?;
        let mut builder = BlockBuilder::new(name, factory.clone(), Arc::clone(self), options.clone())?;
        self.build_block(&mut builder, &options)?;
        tracing::trace!(block = name, block_type = self.name(), "builder created");
        Ok(builder)
    }

    /// Run `build_block` hooks, parent first
    pub fn build_block(&self, builder: &mut BlockBuilder, options: &Options) -> Result<(), BlockError> {
        if let Some(parent) = &self.parent {
            parent.build_block(builder, options)?;
        }
        self.inner.build_block(builder, options)?;
        for extension in &self.extensions {
            extension.build_block(builder, options)?;
        }
        Ok(())
    }

    /// Run `build_view` hooks, parent first
    pub fn build_view(&self, view: &mut ViewMut<'_>, block: &Block, options: &Options) {
        if let Some(parent) = &self.parent {
            parent.build_view(view, block, options);
        }
        self.inner.build_view(view, block, options);
        for extension in &self.extensions {
            extension.build_view(view, block, options);
        }
    }

    /// Run `finish_view` hooks, parent first
    pub fn finish_view(&self, view: &mut ViewMut<'_>, block: &Block, options: &Options) {
        if let Some(parent) = &self.parent {
            parent.finish_view(view, block, options);
        }
        self.inner.finish_view(view, block, options);
        for extension in &self.extensions {
            extension.finish_view(view, block, options);
        }
    }

    /// Run `add_child` hooks, parent first; the first error rejects the child
    pub fn add_child(&self, child: &Block, block: &Block, options: &Options) -> Result<(), BlockError> {
        if let Some(parent) = &self.parent {
            parent.add_child(child, block, options)?;
        }
        self.inner.add_child(child, block, options)?;
        for extension in &self.extensions {
            extension.add_child(child, block, options)?;
        }
        Ok(())
    }

    /// Run `remove_child` hooks, parent first
    pub fn remove_child(&self, child: &Block, block: &Block, options: &Options) {
        if let Some(parent) = &self.parent {
            parent.remove_child(child, block, options);
        }
        self.inner.remove_child(child, block, options);
        for extension in &self.extensions {
            extension.remove_child(child, block, options);
        }
    }
}

impl fmt::Debug for ResolvedBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedBlockType")
            .field("name", &self.name())
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("extensions", &self.extensions.len())
            .field("options", &self.options_resolver.defined_options().collect::<Vec<_>>())
            .finish()
    }
}
