//! Collection of entries of one type

use serde_json::json;

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::options::{Options, OptionsResolver, ValueKind};
use crate::core::view::ViewMut;
use crate::extension::listener::ResizeBlockListener;

/// Compound block with one `entry_type` child per collection entry
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionType;

impl BlockType for CollectionType {
    fn name(&self) -> &str {
        "collection"
    }

    fn parent(&self) -> Option<&str> {
        Some("block")
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver
            .set_default("compound", true)
            .set_default("empty_data", json!([]))
            .set_default("entry_type", "text")
            .set_allowed_kinds("entry_type", &[ValueKind::String])
            .set_default("entry_options", json!({}))
            .set_allowed_kinds("entry_options", &[ValueKind::Object])
            .set_default("allow_add", false)
            .set_allowed_kinds("allow_add", &[ValueKind::Bool])
            .set_default("allow_delete", false)
            .set_allowed_kinds("allow_delete", &[ValueKind::Bool]);
    }

    fn build_block(&self, builder: &mut BlockBuilder, options: &Options) -> Result<(), BlockError> {
        let entry_type = options.get_str("entry_type").unwrap_or("text").to_string();
        let entry_options = Options::from_json(options.value("entry_options"))?;
        let listener = ResizeBlockListener::new(
            builder.factory().clone(),
            entry_type,
            entry_options,
            options.get_bool("allow_add").unwrap_or(false),
            options.get_bool("allow_delete").unwrap_or(false),
        );
        builder.add_event_subscriber(listener);
        Ok(())
    }

    fn build_view(&self, view: &mut ViewMut<'_>, _block: &Block, options: &Options) {
        view.set("allow_add", options.get_bool("allow_add").unwrap_or(false))
            .set("allow_delete", options.get_bool("allow_delete").unwrap_or(false));
    }
}
