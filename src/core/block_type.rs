//! Block type and type extension contracts
//!
//! A block type is a stateless descriptor registered once per process. It
//! names itself, optionally names a parent type, declares its options and
//! configures builders and views through hooks. A type extension attaches the
//! same hooks to an existing type, selected by the extended type's name.
//!
//! Hook order for a type `T` with ancestry `root → ... → T`: every level runs
//! parent-first, and within a level the type's own hook runs before the hooks
//! of its extensions (in registration order).

use super::block::Block;
use super::builder::BlockBuilder;
use super::error::BlockError;
use super::options::{Options, OptionsResolver};
use super::view::ViewMut;

/// Block type
pub trait BlockType: Send + Sync {
    /// Unique name under which the type is registered
    fn name(&self) -> &str;

    /// Name of the parent type
    fn parent(&self) -> Option<&str> {
        None
    }

    /// Declare options and their defaults
    fn configure_options(&self, _resolver: &mut OptionsResolver) {}

    /// Configure a builder of this type
    fn build_block(&self, _builder: &mut BlockBuilder, _options: &Options) -> Result<(), BlockError> {
        Ok(())
    }

    /// Populate view variables, before the children's views are built
    fn build_view(&self, _view: &mut ViewMut<'_>, _block: &Block, _options: &Options) {}

    /// Populate view variables, after the children's views are built
    fn finish_view(&self, _view: &mut ViewMut<'_>, _block: &Block, _options: &Options) {}

    /// Called when `child` is attached to `block`; an error rejects the child
    fn add_child(&self, _child: &Block, _block: &Block, _options: &Options) -> Result<(), BlockError> {
        Ok(())
    }

    /// Called after `child` was detached from `block`
    fn remove_child(&self, _child: &Block, _block: &Block, _options: &Options) {}
}

/// Extension of an existing block type
pub trait BlockTypeExtension: Send + Sync {
    /// Name of the type this extension applies to
    fn extended_type(&self) -> &str;

    fn configure_options(&self, _resolver: &mut OptionsResolver) {}

    fn build_block(&self, _builder: &mut BlockBuilder, _options: &Options) -> Result<(), BlockError> {
        Ok(())
    }

    fn build_view(&self, _view: &mut ViewMut<'_>, _block: &Block, _options: &Options) {}

    fn finish_view(&self, _view: &mut ViewMut<'_>, _block: &Block, _options: &Options) {}

    fn add_child(&self, _child: &Block, _block: &Block, _options: &Options) -> Result<(), BlockError> {
        Ok(())
    }

    fn remove_child(&self, _child: &Block, _block: &Block, _options: &Options) {}
}
