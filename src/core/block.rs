//! Runtime block
//!
//! A [`Block`] owns its frozen configuration and its ordered children, and
//! drives the two data pipelines:
//!
//! ```text
//! set_data:  PRE_SET_DATA → model transformers → view transformers
//!            → mapper (view data → children) → POST_SET_DATA
//! bind:      PRE_BIND → children bound → mapper (children → view data)
//!            → view transformers⁻¹ → BIND → model transformers⁻¹ → POST_BIND
//! ```
//!
//! Errors raised by `set_data` are returned to the caller. Errors raised while
//! binding are recorded on the block that failed and reported by
//! [`Block::errors`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::config::BlockConfig;
use super::error::BlockError;
use super::event::{BlockEvent, EventKind};
use super::property_path::PropertyPath;
use super::transformer::TransformationFailed;
use super::view::BlockView;
use super::Data;

/// Lifecycle state of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    /// No data was set yet
    New,
    /// Data was set and the block can be bound
    DataSet,
    /// Submitted data was bound
    Bound,
}

/// Saved data of a subtree, put back when set_data fails halfway
#[derive(Debug)]
struct DataSnapshot {
    model_data: Data,
    norm_data: Data,
    view_data: Data,
    extra_data: Data,
    state: BlockState,
    transformation_failure: Option<BlockError>,
    children: Vec<(String, DataSnapshot)>,
}

/// Runtime block node
#[derive(Debug)]
pub struct Block {
    config: Arc<BlockConfig>,
    parent: Option<String>,
    children: IndexMap<String, Block>,
    model_data: Data,
    norm_data: Data,
    view_data: Data,
    extra_data: Data,
    state: BlockState,
    lock_set_data: bool,
    transformation_failure: Option<BlockError>,
    valid: bool,
}

impl Block {
    pub(crate) fn new(config: BlockConfig) -> Self {
        Self {
            config: Arc::new(config),
            parent: None,
            children: IndexMap::new(),
            model_data: Data::Null,
            norm_data: Data::Null,
            view_data: Data::Null,
            extra_data: Data::Null,
            state: BlockState::New,
            lock_set_data: false,
            transformation_failure: None,
            valid: true,
        }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// Name of the resolved type
    pub fn type_name(&self) -> &str {
        self.config.type_name()
    }

    pub fn property_path(&self) -> Option<&PropertyPath> {
        self.config.property_path()
    }

    pub fn is_compound(&self) -> bool {
        self.config.is_compound()
    }

    /// Name of the parent block, if attached
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    // ── Children ──────────────────────────────────────────────────────────

    /// Attach a child, replacing a child of the same name
    ///
    /// When this block already has data, the child receives its slice
    /// through the data mapper.
    ///
    /// # Errors
    /// * `AlreadyBound` after the block was bound, unless its data is being set again
    /// * `BadMethodCall` when the block is not compound
    /// * `InvalidChild` when the child's type is not allowed here
    /// * any error raised by an `add_child` hook or by the mapper
    pub fn add(&mut self, mut child: Block) -> Result<&mut Self, BlockError> {
        if self.state == BlockState::Bound && !self.lock_set_data {
            return Err(BlockError::AlreadyBound(self.name().to_string()));
        }
        if !self.is_compound() {
            return Err(BlockError::BadMethodCall(format!(
                "Cannot add child \"{}\" to the non-compound block \"{}\"",
                child.name(),
                self.name()
            )));
        }

        let config = Arc::clone(&self.config);
        if let Some(allowed) = config.allowed_children() {
            let child_type = child.config.resolved_type();
            if !allowed.iter().any(|name| child_type.is_type_of(name)) {
                return Err(BlockError::InvalidChild {
                    parent: self.name().to_string(),
                    parent_type: self.type_name().to_string(),
                    child: child.name().to_string(),
                    child_type: child.type_name().to_string(),
                });
            }
        }
        config
            .resolved_type()
            .add_child(&child, self, config.options())?;

        let name = child.name().to_string();
        if self.children.contains_key(&name) {
            self.remove(&name)?;
        }
        child.parent = Some(self.name().to_string());
        self.children.insert(name.clone(), child);

        if !self.lock_set_data && self.state != BlockState::New {
            if let (Some(mapper), Some(child)) = (config.data_mapper(), self.children.get_mut(&name)) {
                mapper
                    .map_data_to_views(&self.view_data, vec![child])
                    .map_err(|e| e.in_block(config.name(), config.type_name()))?;
            }
        }
        Ok(self)
    }

    /// Detach a child
    ///
    /// # Errors
    /// `AlreadyBound` after the block was bound, unless its data is being set again.
    pub fn remove(&mut self, name: &str) -> Result<Option<Block>, BlockError> {
        if self.state == BlockState::Bound && !self.lock_set_data {
            return Err(BlockError::AlreadyBound(self.name().to_string()));
        }
        let Some(mut child) = self.children.shift_remove(name) else {
            return Ok(None);
        };
        let config = Arc::clone(&self.config);
        config
            .resolved_type()
            .remove_child(&child, self, config.options());
        child.parent = None;
        Ok(Some(child))
    }

    pub fn has(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Block> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.children.get_mut(name)
    }

    /// Children in order
    pub fn children(&self) -> impl Iterator<Item = &Block> {
        self.children.values()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.children.values_mut()
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Reorder children; names not listed keep their relative order at the end
    pub fn reorder_children<S: AsRef<str>>(&mut self, order: &[S]) {
        let positions: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref(), i))
            .collect();
        let position = |name: &str| positions.get(name).copied().unwrap_or(usize::MAX);
        self.children
            .sort_by(|a, _, b, _| position(a.as_str()).cmp(&position(b.as_str())));
    }

    // ── Data ──────────────────────────────────────────────────────────────

    /// Model data
    pub fn data(&self) -> &Data {
        &self.model_data
    }

    pub fn norm_data(&self) -> &Data {
        &self.norm_data
    }

    pub fn view_data(&self) -> &Data {
        &self.view_data
    }

    /// Submitted keys that matched no child
    pub fn extra_data(&self) -> &Data {
        &self.extra_data
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.state == BlockState::Bound
    }

    /// Failure recorded by the last bind, if any
    pub fn transformation_failure(&self) -> Option<&BlockError> {
        self.transformation_failure.as_ref()
    }

    /// Whether the last bind reached the model data
    pub fn is_synchronized(&self) -> bool {
        self.transformation_failure.is_none()
    }

    /// Synchronized and not invalidated by a listener, recursively
    pub fn is_valid(&self) -> bool {
        self.valid && self.is_synchronized() && self.children.values().all(Block::is_valid)
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Push model data through the forward pipeline
    ///
    /// # Errors
    /// * `BadMethodCall` when called from a PRE_SET_DATA listener of this block
    /// * any error raised by a listener, a transformer or the mapper, wrapped
    ///   with this block's name and type
    ///
    /// A failed call leaves the data, state and recorded failures of the
    /// whole subtree as they were. Children added or removed by PRE_SET_DATA
    /// listeners stay added or removed.
    pub fn set_data(&mut self, model: Data) -> Result<&mut Self, BlockError> {
        if self.lock_set_data {
            return Err(BlockError::BadMethodCall(format!(
                "set_data() cannot be called on the block \"{}\" while its own data is being set",
                self.name()
            )));
        }
        let config = Arc::clone(&self.config);

        self.lock_set_data = true;
        let prepared = self.prepare_data(&config, model);
        self.lock_set_data = false;
        let (model, norm, view) = prepared?;

        let snapshot = self.snapshot();
        self.reset_bound();
        self.model_data = model;
        self.norm_data = norm;
        self.view_data = view;
        self.state = BlockState::DataSet;
        tracing::trace!(block = %config.name(), "data set");

        if let Err(err) = self.finish_set_data(&config) {
            self.restore(snapshot);
            return Err(err);
        }
        Ok(self)
    }

    /// Mapper and POST_SET_DATA, once the new data is committed
    fn finish_set_data(&mut self, config: &BlockConfig) -> Result<(), BlockError> {
        if let Some(mapper) = config.data_mapper() {
            if !self.children.is_empty() {
                mapper
                    .map_data_to_views(&self.view_data, self.children.values_mut().collect())
                    .map_err(|e| e.in_block(config.name(), config.type_name()))?;
            }
        }
        let model = self.model_data.clone();
        self.dispatch(config, EventKind::PostSetData, model)?;
        Ok(())
    }

    /// PRE_SET_DATA and the forward transformer chains
    fn prepare_data(&mut self, config: &BlockConfig, model: Data) -> Result<(Data, Data, Data), BlockError> {
        let model = self.dispatch(config, EventKind::PreSetData, model)?;
        let wrap = |e: BlockError| e.in_block(config.name(), config.type_name());
        let norm = config
            .model_transformers()
            .transform(model.clone())
            .map_err(|e| wrap(e.into()))?;
        let view = config
            .view_transformers()
            .transform(norm.clone())
            .map_err(|e| wrap(e.into()))?;
        Ok((model, norm, view))
    }

    /// Data and lifecycle fields of the subtree
    fn snapshot(&self) -> DataSnapshot {
        DataSnapshot {
            model_data: self.model_data.clone(),
            norm_data: self.norm_data.clone(),
            view_data: self.view_data.clone(),
            extra_data: self.extra_data.clone(),
            state: self.state,
            transformation_failure: self.transformation_failure.clone(),
            children: self
                .children
                .iter()
                .map(|(name, child)| (name.clone(), child.snapshot()))
                .collect(),
        }
    }

    /// Put back a snapshot; children added or removed since are left as they are
    fn restore(&mut self, snapshot: DataSnapshot) {
        self.model_data = snapshot.model_data;
        self.norm_data = snapshot.norm_data;
        self.view_data = snapshot.view_data;
        self.extra_data = snapshot.extra_data;
        self.state = snapshot.state;
        self.transformation_failure = snapshot.transformation_failure;
        for (name, child_snapshot) in snapshot.children {
            if let Some(child) = self.children.get_mut(&name) {
                child.restore(child_snapshot);
            }
        }
    }

    /// Clear bind results below a block whose data was set again
    fn reset_bound(&mut self) {
        if self.state == BlockState::Bound {
            self.state = BlockState::DataSet;
        }
        self.transformation_failure = None;
        self.extra_data = Data::Null;
        for child in self.children.values_mut() {
            child.reset_bound();
        }
    }

    /// Set the configured data on every block of the tree that has none yet
    pub fn initialize(&mut self) -> Result<&mut Self, BlockError> {
        if self.state == BlockState::New {
            let data = self.config.data().clone();
            self.set_data(data)?;
        }
        for child in self.children.values_mut() {
            child.initialize()?;
        }
        Ok(self)
    }

    /// Bind submitted view data through the reverse pipeline
    ///
    /// Data errors are recorded (see [`Block::transformation_failure`]) rather
    /// than returned.
    ///
    /// # Errors
    /// `AlreadyBound` when the block was bound since its data was last set.
    pub fn bind(&mut self, submitted: Data) -> Result<&mut Self, BlockError> {
        if self.state == BlockState::Bound {
            return Err(BlockError::AlreadyBound(self.name().to_string()));
        }
        let config = Arc::clone(&self.config);
        self.transformation_failure = None;
        self.extra_data = Data::Null;

        let mut failure = self.bind_data(&config, submitted).err();
        let model = self.model_data.clone();
        if let Err(err) = self.dispatch(&config, EventKind::PostBind, model) {
            failure.get_or_insert(err);
        }
        self.state = BlockState::Bound;

        if let Some(err) = failure {
            let err = err.in_block(config.name(), config.type_name());
            tracing::debug!(block = %config.name(), block_type = %config.type_name(), error = %err, "bind failed");
            self.transformation_failure = Some(err);
        } else {
            tracing::trace!(block = %config.name(), "bound");
        }
        Ok(self)
    }

    fn bind_data(&mut self, config: &BlockConfig, submitted: Data) -> Result<(), BlockError> {
        let submitted = self.dispatch(config, EventKind::PreBind, submitted)?;

        let view = if config.is_compound() {
            if !matches!(submitted, Data::Null | Data::Object(_) | Data::Array(_)) {
                return Err(TransformationFailed::expected("object or array", &submitted).into());
            }
            for child in self.children.values_mut() {
                let slice = submitted_slice(&submitted, child.name());
                if let Err(err) = child.bind(slice) {
                    tracing::debug!(block = %config.name(), child = %child.name(), error = %err, "child bind rejected");
                    child.transformation_failure.get_or_insert(err);
                }
            }
            self.extra_data = extra_keys(&submitted, &self.children);

            let mut view = if self.view_data.is_null() {
                config.empty_data().clone()
            } else {
                self.view_data.clone()
            };
            if let Some(mapper) = config.data_mapper() {
                mapper.map_views_to_data(self.children.values().collect(), &mut view)?;
            }
            view
        } else if submitted.is_null() {
            config.empty_data().clone()
        } else {
            submitted
        };
        self.view_data = view.clone();

        let norm = config.view_transformers().reverse_transform(view)?;
        let norm = self.dispatch(config, EventKind::Bind, norm)?;
        let model = config.model_transformers().reverse_transform(norm.clone())?;
        self.norm_data = norm;
        self.model_data = model;
        Ok(())
    }

    /// Run the listeners of one event; returns the (possibly replaced) data
    fn dispatch(&mut self, config: &BlockConfig, kind: EventKind, data: Data) -> Result<Data, BlockError> {
        if !config.dispatcher().has_listeners(kind) {
            return Ok(data);
        }
        let mut event = BlockEvent::new(kind, self, data);
        config
            .dispatcher()
            .dispatch(&mut event)
            .map_err(|e| e.in_block(config.name(), config.type_name()))?;
        Ok(event.into_data())
    }

    /// Recorded failures of the subtree, keyed by dotted block path
    pub fn errors(&self) -> Vec<(String, &BlockError)> {
        let mut errors = Vec::new();
        self.collect_errors(self.name().to_string(), &mut errors);
        errors
    }

    fn collect_errors<'a>(&'a self, path: String, errors: &mut Vec<(String, &'a BlockError)>) {
        if let Some(err) = &self.transformation_failure {
            errors.push((path.clone(), err));
        }
        for child in self.children.values() {
            child.collect_errors(format!("{path}.{}", child.name()), errors);
        }
    }

    /// Compile the view tree of this block
    pub fn create_view(&self) -> BlockView {
        BlockView::compile(self)
    }
}

/// Value submitted for one child (`null` when absent)
fn submitted_slice(submitted: &Data, name: &str) -> Data {
    let value = match submitted {
        Data::Object(map) => map.get(name),
        Data::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    };
    value.cloned().unwrap_or(Data::Null)
}

/// Submitted entries that match no child
fn extra_keys(submitted: &Data, children: &IndexMap<String, Block>) -> Data {
    let extra: serde_json::Map<String, Data> = match submitted {
        Data::Object(map) => map
            .iter()
            .filter(|(key, _)| !children.contains_key(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        Data::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, value)| (i.to_string(), value))
            .filter(|(key, _)| !children.contains_key(key.as_str()))
            .map(|(key, value)| (key, value.clone()))
            .collect(),
        _ => serde_json::Map::new(),
    };
    if extra.is_empty() {
        Data::Null
    } else {
        Data::Object(extra)
    }
}
