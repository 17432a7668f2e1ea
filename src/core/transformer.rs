//! Data transformers
//!
//! A block holds its data in three representations:
//!
//! | Representation | Owner | Example (date) |
//! |----------------|-------|----------------|
//! | model | the application | `"2024-03-01"` |
//! | normalized | the block | `"2024-03-01"` |
//! | view | the renderer / submitted input | `{"year": 2024, "month": 3, "day": 1}` |
//!
//! Model transformers convert model ↔ normalized, view transformers convert
//! normalized ↔ view. The two chains are ordered independently. The forward
//! direction walks a chain front to back; the reverse direction walks it back
//! to front.

use std::sync::Arc;

use super::Data;

/// A transformer could not convert its input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unable to transform value: {message}")]
pub struct TransformationFailed {
    message: String,
}

impl TransformationFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Failure for an input of the wrong kind
    pub fn expected(expected: &str, given: &Data) -> Self {
        Self::new(format!(
            "expected {expected}, {} given",
            crate::core::value_kind(given)
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Bidirectional converter between two data representations
///
/// Implementations must be pure: the output depends only on the input.
pub trait DataTransformer: Send + Sync {
    /// Forward direction (model → normalized, or normalized → view)
    fn transform(&self, value: Data) -> Result<Data, TransformationFailed>;

    /// Reverse direction (view → normalized, or normalized → model)
    fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed>;
}

/// Ordered list of transformers
#[derive(Clone, Default)]
pub struct TransformerChain {
    transformers: Vec<Arc<dyn DataTransformer>>,
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end of the chain
    pub fn push(&mut self, transformer: Arc<dyn DataTransformer>) {
        self.transformers.push(transformer);
    }

    /// Insert at the front of the chain
    pub fn prepend(&mut self, transformer: Arc<dyn DataTransformer>) {
        self.transformers.insert(0, transformer);
    }

    pub fn clear(&mut self) {
        self.transformers.clear();
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DataTransformer>> {
        self.transformers.iter()
    }

    /// Run every transformer front to back
    pub fn transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        self.transformers
            .iter()
            .try_fold(value, |value, t| t.transform(value))
    }

    /// Run every transformer back to front
    pub fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        self.transformers
            .iter()
            .rev()
            .try_fold(value, |value, t| t.reverse_transform(value))
    }
}
