//! Nested object

use serde_json::json;

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::options::{Options, OptionsResolver};
use crate::core::view::ViewMut;

/// Compound block holding an object whose fields are its children
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectType;

impl BlockType for ObjectType {
    fn name(&self) -> &str {
        "object"
    }

    fn parent(&self) -> Option<&str> {
        Some("block")
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver.set_default("compound", true).set_default("empty_data", json!({}));
    }

    fn build_view(&self, view: &mut ViewMut<'_>, block: &Block, _options: &Options) {
        view.set("data_class", block.config().data_class());
    }
}
