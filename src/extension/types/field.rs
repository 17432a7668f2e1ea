//! Leaf field type

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::options::{Options, OptionsResolver, ValueKind};
use crate::core::view::ViewMut;
use crate::extension::listener::TrimListener;

/// Base of every non-compound input
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldType;

impl BlockType for FieldType {
    fn name(&self) -> &str {
        "field"
    }

    fn parent(&self) -> Option<&str> {
        Some("block")
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver
            .set_default("compound", false)
            .set_default("disabled", false)
            .set_allowed_kinds("disabled", &[ValueKind::Bool])
            .set_default("trim", true)
            .set_allowed_kinds("trim", &[ValueKind::Bool]);
    }

    fn build_block(&self, builder: &mut BlockBuilder, options: &Options) -> Result<(), BlockError> {
        if options.get_bool("trim").unwrap_or(true) {
            builder.add_event_subscriber(TrimListener);
        }
        Ok(())
    }

    fn build_view(&self, view: &mut ViewMut<'_>, _block: &Block, options: &Options) {
        view.set("disabled", options.get_bool("disabled").unwrap_or(false));
    }
}
