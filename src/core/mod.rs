//! Core block abstractions
//!
//! This module holds the type system (types, extensions, resolution, registry),
//! the builder that assembles a block tree, the runtime block with its
//! set-data/bind lifecycle, and the view compiler.

pub mod error;
pub mod options;
pub mod property_path;
pub mod guess;
pub mod transformer;
pub mod event;
pub mod mapper;
pub mod block_type;
pub mod resolved;
pub mod registry;
pub mod config;
pub mod builder;
pub mod block;
pub mod view;
pub mod factory;

use uuid::Uuid;

/// Model, normalized, view and option values
pub type Data = serde_json::Value;

pub use block::{Block, BlockState};
pub use block_type::{BlockType, BlockTypeExtension};
pub use builder::BlockBuilder;
pub use config::BlockConfig;
pub use error::{BlockError, ErrorKind};
pub use event::{BlockEvent, BlockListener, EventDispatcher, EventKind, EventSubscriber};
pub use factory::{BlockDefinition, BlockFactory, BlockFactoryBuilder};
pub use guess::{best_guess, Confidence, Guess, TypeGuess, TypeGuesser, TypeGuesserChain, ValueGuess};
pub use mapper::DataMapper;
pub use options::{Options, OptionsResolver, ValueKind};
pub use property_path::{PathElement, PropertyPath};
pub use registry::{BlockExtension, BlockRegistry, PreloadedExtension};
pub use resolved::ResolvedBlockType;
pub use transformer::{DataTransformer, TransformationFailed, TransformerChain};
pub use view::{BlockView, ViewId, ViewMut, ViewRef, Vars};

/// Short name of a value's kind, for error messages
pub fn value_kind(value: &Data) -> &'static str {
    ValueKind::of(value).as_str()
}

/// `null`, a zero-length array or a zero-size object
pub fn is_empty_data(value: &Data) -> bool {
    match value {
        Data::Null => true,
        Data::Array(items) => items.is_empty(),
        Data::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Generate a name that is unique for the process, e.g. `block_3f2a...`
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
