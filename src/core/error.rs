//! Error types for type resolution, block assembly and data binding
//!
//! Errors fall into three kinds:
//! - **configuration** errors raised while resolving types or assembling a
//!   block tree (unknown option, invalid child, unknown type, ...)
//! - **data** errors raised while moving data through a block (unexpected
//!   shape, failed transformation)
//! - **state** errors raised when a block is used out of lifecycle order

use crate::core::transformer::TransformationFailed;

/// Broad classification of a [`BlockError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised during type resolution or builder assembly; fatal to that construction
    Configuration,
    /// Raised while data is set or bound; scoped to the offending block
    Data,
    /// Raised when an operation is invalid for the block's lifecycle state
    State,
}

/// Block engine errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlockError {
    /// An option key is not part of the merged option schema
    #[error("The option \"{option}\" does not exist. Known options are: \"{known}\"")]
    UnknownOption { option: String, known: String },

    /// A required option was not supplied
    #[error("The required option \"{option}\" is missing")]
    MissingOption { option: String },

    /// An option value is not allowed by the schema
    #[error("The option \"{option}\" has an invalid value: {reason}")]
    InvalidOption { option: String, reason: String },

    /// Invalid argument supplied to the registry, a guess or a factory
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A child's type is not accepted by its parent
    #[error(
        "The child \"{child}\" (type \"{child_type}\") is not allowed in the block \"{parent}\" (type \"{parent_type}\")"
    )]
    InvalidChild {
        parent: String,
        parent_type: String,
        child: String,
        child_type: String,
    },

    /// A mapper, listener or transformer received data of the wrong shape
    #[error("Expected argument of type \"{expected}\", \"{given}\" given")]
    UnexpectedType { expected: String, given: String },

    /// A transformer could not convert its input
    #[error(transparent)]
    TransformationFailed(#[from] TransformationFailed),

    /// A data error raised while processing a specific block
    #[error("Block \"{block}\" (type \"{block_type}\"): {source}")]
    Data {
        block: String,
        block_type: String,
        #[source]
        source: Box<BlockError>,
    },

    /// The method may not be called in the current context
    #[error("Bad method call: {0}")]
    BadMethodCall(String),

    /// `bind` was called twice in one data-set cycle, or the tree was changed after binding
    #[error("The block \"{0}\" is already bound")]
    AlreadyBound(String),
}

impl BlockError {
    /// Build an [`BlockError::UnexpectedType`] describing the given value
    pub fn unexpected_type(expected: impl Into<String>, given: &serde_json::Value) -> Self {
        BlockError::UnexpectedType {
            expected: expected.into(),
            given: crate::core::value_kind(given).to_string(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlockError::UnknownOption { .. }
            | BlockError::MissingOption { .. }
            | BlockError::InvalidOption { .. }
            | BlockError::InvalidArgument(_)
            | BlockError::InvalidChild { .. } => ErrorKind::Configuration,
            BlockError::UnexpectedType { .. }
            | BlockError::TransformationFailed(_)
            | BlockError::Data { .. } => ErrorKind::Data,
            BlockError::BadMethodCall(_) | BlockError::AlreadyBound(_) => ErrorKind::State,
        }
    }

    /// Attach block context to a data error.
    ///
    /// Configuration and state errors pass through untouched, and an error
    /// that already names a block keeps its innermost context.
    pub fn in_block(self, block: &str, block_type: &str) -> Self {
        match self {
            BlockError::UnexpectedType { .. } | BlockError::TransformationFailed(_) => {
                BlockError::Data {
                    block: block.to_string(),
                    block_type: block_type.to_string(),
                    source: Box::new(self),
                }
            }
            other => other,
        }
    }

    /// Strip [`BlockError::Data`] wrappers
    pub fn root_cause(&self) -> &BlockError {
        match self {
            BlockError::Data { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_block_wraps_data_errors_only() {
        let err = BlockError::unexpected_type("array", &json!("x")).in_block("tags", "collection");
        assert!(matches!(err, BlockError::Data { ref block, .. } if block == "tags"));
        assert_eq!(err.kind(), ErrorKind::Data);
        assert!(matches!(err.root_cause(), BlockError::UnexpectedType { given, .. } if given == "string"));

        let err = BlockError::MissingOption { option: "x".into() }.in_block("a", "text");
        assert!(matches!(err, BlockError::MissingOption { .. }));
    }

    #[test]
    fn test_in_block_keeps_innermost_context() {
        let inner = BlockError::unexpected_type("object", &json!(1)).in_block("street", "text");
        let outer = inner.in_block("address", "object");
        assert!(matches!(outer, BlockError::Data { ref block, .. } if block == "street"));
    }

    #[test]
    fn test_invalid_child_message_names_both_blocks() {
        let err = BlockError::InvalidChild {
            parent: "form".into(),
            parent_type: "panel".into(),
            child: "age".into(),
            child_type: "integer".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("form") && msg.contains("panel"));
        assert!(msg.contains("age") && msg.contains("integer"));
    }
}
