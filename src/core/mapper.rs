//! Data mapper contract
//!
//! A compound block never hands its data to its children directly; its data
//! mapper decides which slice of the parent's data each child receives, and
//! composes the parent's data back from its bound children.

use super::block::Block;
use super::error::BlockError;
use super::Data;

/// Bridge between a compound block's data and its children
///
/// Both directions work on the parent's view data, after its view
/// transformers. A compound block with a view transformer (the `parts` date
/// widget turns a date string into `{year, month, day}`) hands its children
/// the transformed shape, and composes that same shape back on bind before
/// its view transformers are reversed.
pub trait DataMapper: Send + Sync {
    /// Push slices of `data` into the children (through each child's `set_data`)
    ///
    /// `null` and empty collections are a no-op.
    fn map_data_to_views(&self, data: &Data, children: Vec<&mut Block>) -> Result<(), BlockError>;

    /// Write the children's data back into `data`
    fn map_views_to_data(&self, children: Vec<&Block>, data: &mut Data) -> Result<(), BlockError>;
}
