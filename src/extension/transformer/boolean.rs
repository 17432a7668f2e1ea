//! Boolean ↔ string

use crate::core::transformer::{DataTransformer, TransformationFailed};
use crate::core::Data;

/// Normalized booleans ↔ checkbox view values
///
/// `true` is shown as the configured value and `false` as `null`. Any
/// submitted string binds to `true`; `null` binds to `false`.
#[derive(Debug, Clone)]
pub struct BooleanToStringTransformer {
    true_value: String,
}

impl BooleanToStringTransformer {
    pub fn new(true_value: impl Into<String>) -> Self {
        Self {
            true_value: true_value.into(),
        }
    }

    pub fn true_value(&self) -> &str {
        &self.true_value
    }
}

impl DataTransformer for BooleanToStringTransformer {
    fn transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null | Data::Bool(false) => Ok(Data::Null),
            Data::Bool(true) => Ok(Data::String(self.true_value.clone())),
            other => Err(TransformationFailed::expected("bool", &other)),
        }
    }

    fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null => Ok(Data::Bool(false)),
            Data::String(_) => Ok(Data::Bool(true)),
            other => Err(TransformationFailed::expected("string", &other)),
        }
    }
}
