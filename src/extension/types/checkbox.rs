//! Checkbox

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::options::{Options, OptionsResolver, ValueKind};
use crate::core::view::ViewMut;
use crate::extension::transformer::BooleanToStringTransformer;

/// Boolean model data; checked when the view data is not null
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxType;

impl BlockType for CheckboxType {
    fn name(&self) -> &str {
        "checkbox"
    }

    fn parent(&self) -> Option<&str> {
        Some("field")
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver
            .set_default("value", "1")
            .set_allowed_kinds("value", &[ValueKind::String])
            .set_default("required", false);
    }

    fn build_block(&self, builder: &mut BlockBuilder, options: &Options) -> Result<(), BlockError> {
        let value = options.get_str("value").unwrap_or("1");
        builder.add_view_transformer(BooleanToStringTransformer::new(value));
        Ok(())
    }

    fn build_view(&self, view: &mut ViewMut<'_>, block: &Block, options: &Options) {
        view.set("value", options.value("value"))
            .set("checked", !block.view_data().is_null());
    }
}
