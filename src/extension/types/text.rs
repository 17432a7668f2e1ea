//! Text input

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::options::Options;
use crate::core::view::ViewMut;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextType;

impl BlockType for TextType {
    fn name(&self) -> &str {
        "text"
    }

    fn parent(&self) -> Option<&str> {
        Some("field")
    }

    fn build_view(&self, view: &mut ViewMut<'_>, _block: &Block, _options: &Options) {
        view.set("type", "text");
    }
}
