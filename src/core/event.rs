//! Block lifecycle events
//!
//! Listeners are attached per event kind with a numeric priority. Dispatch
//! runs the highest priority first; listeners with equal priority run in
//! registration order. A listener receives the block being processed and the
//! data of the current phase, and may replace that data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::block::Block;
use super::error::BlockError;
use super::Data;

/// Lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Before model data is transformed; data is the model data
    PreSetData,
    /// After the block and its children received their data
    PostSetData,
    /// Before submitted data is bound; data is the submitted view data
    PreBind,
    /// After view data was reverse-transformed; data is the normalized data
    Bind,
    /// After binding completed; data is the model data
    PostBind,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::PreSetData => "pre_set_data",
            EventKind::PostSetData => "post_set_data",
            EventKind::PreBind => "pre_bind",
            EventKind::Bind => "bind",
            EventKind::PostBind => "post_bind",
        };
        f.write_str(name)
    }
}

/// Event passed to listeners
pub struct BlockEvent<'a> {
    kind: EventKind,
    block: &'a mut Block,
    data: Data,
}

impl<'a> BlockEvent<'a> {
    pub fn new(kind: EventKind, block: &'a mut Block, data: Data) -> Self {
        Self { kind, block, data }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn block(&self) -> &Block {
        self.block
    }

    /// Mutable access to the block, e.g. to add or remove children
    pub fn block_mut(&mut self) -> &mut Block {
        self.block
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Replace the data carried to the next pipeline stage
    pub fn set_data(&mut self, data: Data) {
        self.data = data;
    }

    pub fn into_data(self) -> Data {
        self.data
    }
}

/// Event listener
pub trait BlockListener: Send + Sync {
    fn handle(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError>;
}

impl<F> BlockListener for F
where
    F: Fn(&mut BlockEvent<'_>) -> Result<(), BlockError> + Send + Sync,
{
    fn handle(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        self(event)
    }
}

/// Listener that declares the events it wants, with their priorities
pub trait EventSubscriber: BlockListener {
    fn subscribed_events(&self) -> Vec<(EventKind, i32)>;
}

#[derive(Clone)]
struct ListenerEntry {
    priority: i32,
    listener: Arc<dyn BlockListener>,
}

/// Priority-ordered listener lists, one per event kind
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: HashMap<EventKind, Vec<ListenerEntry>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener
    pub fn add_listener(&mut self, kind: EventKind, priority: i32, listener: Arc<dyn BlockListener>) {
        let list = self.listeners.entry(kind).or_default();
        // list stays sorted by descending priority, insertion order within a priority
        let pos = list.partition_point(|entry| entry.priority >= priority);
        list.insert(pos, ListenerEntry { priority, listener });
    }

    /// Attach a subscriber to every event it declares
    pub fn add_subscriber<S: EventSubscriber + 'static>(&mut self, subscriber: Arc<S>) {
        for (kind, priority) in subscriber.subscribed_events() {
            self.add_listener(kind, priority, subscriber.clone());
        }
    }

    /// Detach a listener; returns whether it was attached
    pub fn remove_listener(&mut self, kind: EventKind, listener: &Arc<dyn BlockListener>) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|entry| !Arc::ptr_eq(&entry.listener, listener));
        before != list.len()
    }

    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.listeners.get(&kind).is_some_and(|list| !list.is_empty())
    }

    /// Listeners of an event kind in dispatch order
    pub fn listeners(&self, kind: EventKind) -> impl Iterator<Item = &Arc<dyn BlockListener>> {
        self.listeners
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|entry| &entry.listener)
    }

    /// Run every listener of the event's kind; the first error stops dispatch
    pub fn dispatch(&self, event: &mut BlockEvent<'_>) -> Result<(), BlockError> {
        for listener in self.listeners(event.kind()) {
            listener.handle(event)?;
        }
        Ok(())
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, list) in &self.listeners {
            let priorities: Vec<i32> = list.iter().map(|e| e.priority).collect();
            map.entry(kind, &priorities);
        }
        map.finish()
    }
}
