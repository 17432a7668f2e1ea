//! Rendering contract
//!
//! Markup is produced by an external engine. [`BlockRenderer`] picks which
//! engine block renders a view part: it walks the view's `block_prefixes`
//! from the most specific (the node's unique prefix) to the least specific
//! (the root type) and renders the first `<prefix>_<suffix>` the engine knows.

use anyhow::{bail, Result};

use crate::core::view::{Vars, ViewRef};

/// External template engine
pub trait RendererEngine {
    /// Whether the engine can render `block_name` for this view
    fn has_block(&self, view: ViewRef<'_>, block_name: &str) -> bool;

    /// Render `block_name` with the given variables
    fn render_block(&self, view: ViewRef<'_>, block_name: &str, variables: &Vars) -> Result<String>;
}

/// Resolves view parts to engine blocks
#[derive(Debug, Clone)]
pub struct BlockRenderer<E> {
    engine: E,
}

impl<E: RendererEngine> BlockRenderer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Render the most specific `<prefix>_<suffix>` block
    ///
    /// `variables` are layered over the view's own variables.
    ///
    /// # Errors
    /// When no candidate block exists, or the engine fails.
    pub fn search_and_render(&self, view: ViewRef<'_>, suffix: &str, variables: Vars) -> Result<String> {
        let prefixes: Vec<&str> = view
            .var("block_prefixes")
            .and_then(|p| p.as_array())
            .map(|p| p.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        for prefix in prefixes.iter().rev() {
            let block_name = format!("{prefix}_{suffix}");
            if self.engine.has_block(view, &block_name) {
                let mut vars = view.vars().clone();
                vars.extend(variables);
                tracing::trace!(view = view.name(), block_name = %block_name, "rendering");
                return self.engine.render_block(view, &block_name, &vars);
            }
        }

        bail!(
            "Unable to render the \"{suffix}\" of \"{}\": none of the blocks \"{}\" exists",
            view.name(),
            prefixes
                .iter()
                .rev()
                .map(|p| format!("{p}_{suffix}"))
                .collect::<Vec<_>>()
                .join("\", \"")
        )
    }

    pub fn widget(&self, view: ViewRef<'_>, variables: Vars) -> Result<String> {
        self.search_and_render(view, "widget", variables)
    }

    pub fn label(&self, view: ViewRef<'_>, variables: Vars) -> Result<String> {
        self.search_and_render(view, "label", variables)
    }

    pub fn row(&self, view: ViewRef<'_>, variables: Vars) -> Result<String> {
        self.search_and_render(view, "row", variables)
    }
}
