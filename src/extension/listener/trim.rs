//! Whitespace trimming of submitted strings

use crate::core::error::BlockError;
use crate::core::event::{BlockEvent, BlockListener, EventKind, EventSubscriber};
use crate::core::Data;

/// Trims leading and trailing whitespace from a submitted string
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimListener;

impl BlockListener for TrimListener {
    fn handle(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        if let Data::String(s) = event.data() {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                let trimmed = trimmed.to_string();
                event.set_data(Data::String(trimmed));
            }
        }
        Ok(())
    }
}

impl EventSubscriber for TrimListener {
    fn subscribed_events(&self) -> Vec<(EventKind, i32)> {
        vec![(EventKind::PreBind, 0)]
    }
}
