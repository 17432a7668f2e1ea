//! Mapper for purely presentational containers

use crate::core::block::Block;
use crate::core::error::BlockError;
use crate::core::mapper::DataMapper;
use crate::core::Data;

/// Maps nothing in either direction
///
/// Children of a wrapper keep their own data; the wrapper only groups them.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapperMapper;

impl DataMapper for WrapperMapper {
    fn map_data_to_views(&self, _data: &Data, _children: Vec<&mut Block>) -> Result<(), BlockError> {
        Ok(())
    }

    fn map_views_to_data(&self, _children: Vec<&Block>, _data: &mut Data) -> Result<(), BlockError> {
        Ok(())
    }
}
