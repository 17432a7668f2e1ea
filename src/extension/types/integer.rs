//! Integer input

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::options::Options;
use crate::core::view::ViewMut;
use crate::extension::transformer::IntegerToStringTransformer;

/// Integer model data shown as a string
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

impl BlockType for IntegerType {
    fn name(&self) -> &str {
        "integer"
    }

    fn parent(&self) -> Option<&str> {
        Some("field")
    }

    fn build_block(&self, builder: &mut BlockBuilder, _options: &Options) -> Result<(), BlockError> {
        builder.add_view_transformer(IntegerToStringTransformer);
        Ok(())
    }

    fn build_view(&self, view: &mut ViewMut<'_>, _block: &Block, _options: &Options) {
        view.set("type", "number");
    }
}
