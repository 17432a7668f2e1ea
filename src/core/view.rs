//! Block views
//!
//! A [`BlockView`] is the render-ready projection of a block tree: one node per
//! block, each with an ordered variable map and ordered, name-keyed children.
//! Nodes live in an arena and refer to their parent by index, so ancestor
//! lookups never involve shared ownership.

use indexmap::IndexMap;

use super::block::Block;
use super::Data;

/// View variables
pub type Vars = IndexMap<String, Data>;

/// Index of a node inside its [`BlockView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

#[derive(Debug, Clone)]
struct ViewNode {
    name: String,
    vars: Vars,
    parent: Option<ViewId>,
    children: IndexMap<String, ViewId>,
}

/// Compiled view tree; the root is the block `create_view` was called on
#[derive(Debug, Clone)]
pub struct BlockView {
    nodes: Vec<ViewNode>,
}

impl BlockView {
    /// Compile the view of a block tree, depth-first
    pub fn compile(block: &Block) -> Self {
        let mut view = Self { nodes: Vec::new() };
        view.compile_node(block, None);
        tracing::trace!(block = %block.name(), nodes = view.nodes.len(), "view compiled");
        view
    }

    fn compile_node(&mut self, block: &Block, parent: Option<ViewId>) -> ViewId {
        let id = ViewId(self.nodes.len());
        self.nodes.push(ViewNode {
            name: block.name().to_string(),
            vars: Vars::new(),
            parent,
            children: IndexMap::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.insert(block.name().to_string(), id);
        }

        let resolved = block.config().resolved_type();
        let options = block.config().options();
        resolved.build_view(&mut ViewMut { view: self, id }, block, options);
        for child in block.children() {
            self.compile_node(child, Some(id));
        }
        resolved.finish_view(&mut ViewMut { view: self, id }, block, options);
        id
    }

    pub fn root(&self) -> ViewRef<'_> {
        ViewRef { view: self, id: ViewId(0) }
    }

    pub fn get(&self, id: ViewId) -> Option<ViewRef<'_>> {
        (id.0 < self.nodes.len()).then_some(ViewRef { view: self, id })
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: ViewId) -> &ViewNode {
        &self.nodes[id.0]
    }
}

/// Read-only handle on one view node
#[derive(Debug, Clone, Copy)]
pub struct ViewRef<'a> {
    view: &'a BlockView,
    id: ViewId,
}

impl<'a> ViewRef<'a> {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.view.node(self.id).name
    }

    pub fn vars(&self) -> &'a Vars {
        &self.view.node(self.id).vars
    }

    pub fn var(&self, key: &str) -> Option<&'a Data> {
        self.vars().get(key)
    }

    /// String variable
    pub fn var_str(&self, key: &str) -> Option<&'a str> {
        self.var(key).and_then(Data::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.view.node(self.id).parent.is_none()
    }

    pub fn parent(&self) -> Option<ViewRef<'a>> {
        self.view
            .node(self.id)
            .parent
            .map(|id| ViewRef { view: self.view, id })
    }

    /// Parent, grandparent, ... up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = ViewRef<'a>> {
        std::iter::successors(self.parent(), |v| v.parent())
    }

    pub fn child(&self, name: &str) -> Option<ViewRef<'a>> {
        let view = self.view;
        view.node(self.id)
            .children
            .get(name)
            .map(|&id| ViewRef { view, id })
    }

    pub fn children(&self) -> impl Iterator<Item = ViewRef<'a>> {
        let view = self.view;
        view.node(self.id)
            .children
            .values()
            .map(move |&id| ViewRef { view, id })
    }

    pub fn child_count(&self) -> usize {
        self.view.node(self.id).children.len()
    }
}

/// Mutable handle on the node being built; handed to view hooks
pub struct ViewMut<'a> {
    view: &'a mut BlockView,
    id: ViewId,
}

impl<'a> ViewMut<'a> {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.view.node(self.id).name
    }

    pub fn vars(&self) -> &Vars {
        &self.view.node(self.id).vars
    }

    pub fn vars_mut(&mut self) -> &mut Vars {
        &mut self.view.nodes[self.id.0].vars
    }

    pub fn get(&self, key: &str) -> Option<&Data> {
        self.vars().get(key)
    }

    /// Set a variable; later writers win
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Data>) -> &mut Self {
        self.vars_mut().insert(key.into(), value.into());
        self
    }

    /// Parent node, already built
    pub fn parent(&self) -> Option<ViewRef<'_>> {
        self.as_view().parent()
    }

    /// Children built so far (all of them in `finish_view`)
    pub fn children(&self) -> impl Iterator<Item = ViewRef<'_>> {
        self.as_view().children()
    }

    pub fn as_view(&self) -> ViewRef<'_> {
        ViewRef {
            view: &*self.view,
            id: self.id,
        }
    }
}
