//! Typed Blocks - declarative engine for composable, typed block trees
//!
//! This crate resolves block types (with inheritance and type extensions)
//! from a registry, assembles block trees through builders, moves data
//! through them in both directions and compiles render-ready views.
//!
//! ```
//! use typed_blocks::{BlockFactory, Options};
//! use serde_json::json;
//!
//! let factory = BlockFactory::builder().build();
//! let mut builder = factory.create_named_builder("user", "object", json!(null), Options::new()).unwrap();
//! builder.add_child("name", "text", Options::new()).unwrap();
//! builder.add_child("age", "integer", Options::new()).unwrap();
//!
//! let mut user = builder.get_block().unwrap();
//! user.set_data(json!({"name": "Ada", "age": 36})).unwrap();
//! assert_eq!(user.get("age").unwrap().view_data(), &json!("36"));
//!
//! user.bind(json!({"name": " Grace ", "age": "45"})).unwrap();
//! assert_eq!(user.data(), &json!({"name": "Grace", "age": 45}));
//! ```

pub mod core;
pub mod extension;
pub mod render;
mod tests;

// Re-export commonly used types
pub use core::{
    Block, BlockBuilder, BlockDefinition, BlockError, BlockFactory, BlockFactoryBuilder, BlockRegistry,
    BlockType, BlockTypeExtension, BlockView, Data, EventKind, Options, OptionsResolver,
};
pub use extension::CoreExtension;
pub use render::{BlockRenderer, RendererEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
