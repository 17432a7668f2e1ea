//! Property-path data mapper

use crate::core::block::Block;
use crate::core::error::BlockError;
use crate::core::mapper::DataMapper;
use crate::core::{is_empty_data, Data};

/// Reads and writes each child's slice at the child's property path
///
/// Unmapped children and children without a path are skipped both ways.
/// Data-locked children keep their configured data.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyPathMapper;

impl DataMapper for PropertyPathMapper {
    fn map_data_to_views(&self, data: &Data, children: Vec<&mut Block>) -> Result<(), BlockError> {
        if is_empty_data(data) {
            return Ok(());
        }
        if !data.is_object() && !data.is_array() {
            return Err(BlockError::unexpected_type("object or array", data));
        }

        for child in children {
            let value = {
                let config = child.config();
                if !config.is_mapped() || config.is_data_locked() {
                    continue;
                }
                match config.property_path() {
                    Some(path) => path.get_value(data).cloned().unwrap_or(Data::Null),
                    None => continue,
                }
            };
            child.set_data(value)?;
        }
        Ok(())
    }

    fn map_views_to_data(&self, children: Vec<&Block>, data: &mut Data) -> Result<(), BlockError> {
        if !data.is_null() && !data.is_object() && !data.is_array() {
            return Err(BlockError::unexpected_type("object, array or null", data));
        }

        for child in children {
            let config = child.config();
            if !config.is_mapped() || !child.is_bound() || !child.is_synchronized() {
                continue;
            }
            if let Some(path) = config.property_path() {
                path.set_value(data, child.data().clone())?;
            }
        }
        Ok(())
    }
}
