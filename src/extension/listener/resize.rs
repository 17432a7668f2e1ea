//! Collection resizing
//!
//! Keeps the children of a collection block in line with the keys of the
//! collection it holds: one child per entry, named after the entry's key and
//! mapped at the property path `[key]`.

use std::fmt;

use crate::core::block::Block;
use crate::core::error::BlockError;
use crate::core::event::{BlockEvent, BlockListener, EventKind, EventSubscriber};
use crate::core::factory::BlockFactory;
use crate::core::options::Options;
use crate::core::Data;

/// Adds and removes children to mirror a collection
pub struct ResizeBlockListener {
    factory: BlockFactory,
    entry_type: String,
    entry_options: Options,
    allow_add: bool,
    allow_delete: bool,
    remove_on_set_data: bool,
}

impl ResizeBlockListener {
    pub fn new(
        factory: BlockFactory,
        entry_type: impl Into<String>,
        entry_options: Options,
        allow_add: bool,
        allow_delete: bool,
    ) -> Self {
        Self {
            factory,
            entry_type: entry_type.into(),
            entry_options,
            allow_add,
            allow_delete,
            remove_on_set_data: true,
        }
    }

    /// Whether set-data drops children whose key is gone (default `true`)
    pub fn with_remove_on_set_data(mut self, remove: bool) -> Self {
        self.remove_on_set_data = remove;
        self
    }

    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    fn create_entry(&self, key: &str) -> Result<Block, BlockError> {
        let mut options = self.entry_options.clone();
        options.insert("property_path", format!("[{key}]"));
        self.factory
            .create_named(key, &self.entry_type, Data::Null, options)
    }

    fn pre_set_data(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        let keys = match collection_keys(event.data()) {
            Some(keys) => keys,
            None if event.data().is_null() => return Ok(()),
            None => return Err(BlockError::unexpected_type("array or object", event.data())),
        };
        let block = event.block_mut();

        if self.remove_on_set_data {
            let stale: Vec<String> = block
                .child_names()
                .filter(|name| !keys.iter().any(|k| k.as_str() == *name))
                .map(str::to_string)
                .collect();
            for name in stale {
                tracing::debug!(block = %block.name(), child = %name, "resize: removing entry");
                block.remove(&name)?;
            }
        }

        for key in &keys {
            if !block.has(key) {
                tracing::debug!(block = %block.name(), child = %key, "resize: adding entry");
                let entry = self.create_entry(key)?;
                block.add(entry)?;
            }
        }
        block.reorder_children(&keys);
        Ok(())
    }

    fn pre_bind(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        let keys = match collection_keys(event.data()) {
            Some(keys) => keys,
            None if event.data().is_null() => Vec::new(),
            // a scalar submission is rejected when the collection itself is bound
            None => return Ok(()),
        };
        let block = event.block_mut();

        if self.allow_delete {
            let missing: Vec<String> = block
                .child_names()
                .filter(|name| !keys.iter().any(|k| k.as_str() == *name))
                .map(str::to_string)
                .collect();
            for name in missing {
                tracing::debug!(block = %block.name(), child = %name, "resize: deleting submitted entry");
                block.remove(&name)?;
            }
        }

        if self.allow_add {
            for key in &keys {
                if !block.has(key) {
                    tracing::debug!(block = %block.name(), child = %key, "resize: adding submitted entry");
                    let entry = self.create_entry(key)?;
                    block.add(entry)?;
                }
            }
        }
        Ok(())
    }

    fn on_bind(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        if !self.allow_delete {
            return Ok(());
        }
        let data = match event.data().clone() {
            Data::Object(map) => {
                let kept = map
                    .into_iter()
                    .filter(|(key, _)| event.block().has(key))
                    .collect();
                Data::Object(kept)
            }
            Data::Array(items) => {
                let kept: Vec<(usize, Data)> = items
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| event.block().has(&i.to_string()))
                    .collect();
                // entries stay at their child's key; a hole keeps the keys as an object
                if kept.iter().enumerate().all(|(position, (i, _))| position == *i) {
                    Data::Array(kept.into_iter().map(|(_, value)| value).collect())
                } else {
                    Data::Object(kept.into_iter().map(|(i, value)| (i.to_string(), value)).collect())
                }
            }
            other => other,
        };
        event.set_data(data);
        Ok(())
    }
}

/// Keys of an array (its indexes) or of an object
fn collection_keys(data: &Data) -> Option<Vec<String>> {
    match data {
        Data::Array(items) => Some((0..items.len()).map(|i| i.to_string()).collect()),
        Data::Object(map) => Some(map.keys().cloned().collect()),
        _ => None,
    }
}

impl BlockListener for ResizeBlockListener {
    fn handle(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        match event.kind() {
            EventKind::PreSetData => self.pre_set_data(event),
            EventKind::PreBind => self.pre_bind(event),
            EventKind::Bind => self.on_bind(event),
            _ => Ok(()),
        }
    }
}

impl EventSubscriber for ResizeBlockListener {
    fn subscribed_events(&self) -> Vec<(EventKind, i32)> {
        vec![
            (EventKind::PreSetData, 0),
            (EventKind::PreBind, 0),
            (EventKind::Bind, 50),
        ]
    }
}

impl fmt::Debug for ResizeBlockListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeBlockListener")
            .field("entry_type", &self.entry_type)
            .field("entry_options", &self.entry_options)
            .field("allow_add", &self.allow_add)
            .field("allow_delete", &self.allow_delete)
            .field("remove_on_set_data", &self.remove_on_set_data)
            .finish()
    }
}
