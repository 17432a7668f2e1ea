//! Date input
//!
//! Model data is an ISO calendar date string. The `single_text` widget shows
//! it as one string in `format`; the `parts` widget is compound, with
//! `year`, `month` and `day` integer children.

use serde_json::json;

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::options::{Options, OptionsResolver, ValueKind};
use crate::core::view::ViewMut;
use crate::core::Data;
use crate::extension::transformer::{DateStringTransformer, DateToPartsTransformer};

#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl BlockType for DateType {
    fn name(&self) -> &str {
        "date"
    }

    fn parent(&self) -> Option<&str> {
        Some("field")
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver
            .set_default("widget", "single_text")
            .set_allowed_values("widget", vec![json!("single_text"), json!("parts")])
            .set_default("format", "%Y-%m-%d")
            .set_allowed_kinds("format", &[ValueKind::String])
            .set_normalizer("compound", |options, _| {
                Ok(Data::Bool(options.get_str("widget") == Some("parts")))
            });
    }

    fn build_block(&self, builder: &mut BlockBuilder, options: &Options) -> Result<(), BlockError> {
        if options.get_str("widget") == Some("parts") {
            builder.add_view_transformer(DateToPartsTransformer);
            for part in ["year", "month", "day"] {
                builder.add_child(part, "integer", Options::new())?;
            }
        } else {
            let format = options.get_str("format").unwrap_or("%Y-%m-%d");
            builder.add_view_transformer(DateStringTransformer::new(format));
        }
        Ok(())
    }

    fn build_view(&self, view: &mut ViewMut<'_>, _block: &Block, options: &Options) {
        view.set("widget", options.value("widget"))
            .set("type", "date");
    }
}
