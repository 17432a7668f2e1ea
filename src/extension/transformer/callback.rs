//! Closure-backed transformer

use std::fmt;
use std::sync::Arc;

use crate::core::transformer::{DataTransformer, TransformationFailed};
use crate::core::Data;

type Callback = Arc<dyn Fn(Data) -> Result<Data, TransformationFailed> + Send + Sync>;

/// Transformer built from a pair of closures
#[derive(Clone)]
pub struct CallbackTransformer {
    transform: Callback,
    reverse_transform: Callback,
}

impl CallbackTransformer {
    pub fn new<F, R>(transform: F, reverse_transform: R) -> Self
    where
        F: Fn(Data) -> Result<Data, TransformationFailed> + Send + Sync + 'static,
        R: Fn(Data) -> Result<Data, TransformationFailed> + Send + Sync + 'static,
    {
        Self {
            transform: Arc::new(transform),
            reverse_transform: Arc::new(reverse_transform),
        }
    }
}

impl DataTransformer for CallbackTransformer {
    fn transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        (self.transform)(value)
    }

    fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        (self.reverse_transform)(value)
    }
}

impl fmt::Debug for CallbackTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackTransformer")
    }
}
