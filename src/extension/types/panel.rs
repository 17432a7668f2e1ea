//! Presentational container

use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::mapper::DataMapper;
use crate::core::options::{Options, OptionsResolver};
use crate::extension::data_mapper::WrapperMapper;
use std::sync::Arc;

/// Groups children without taking part in data mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelType;

impl BlockType for PanelType {
    fn name(&self) -> &str {
        "panel"
    }

    fn parent(&self) -> Option<&str> {
        Some("block")
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver.set_default("compound", true).set_default("mapped", false);
    }

    fn build_block(&self, builder: &mut BlockBuilder, _options: &Options) -> Result<(), BlockError> {
        builder.set_data_mapper(Some(Arc::new(WrapperMapper) as Arc<dyn DataMapper>));
        Ok(())
    }
}
