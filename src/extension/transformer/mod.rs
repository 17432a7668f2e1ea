//! Built-in data transformers

pub mod boolean;
pub mod callback;
pub mod date;
pub mod integer;

pub use boolean::BooleanToStringTransformer;
pub use callback::CallbackTransformer;
pub use date::{DateStringTransformer, DateToPartsTransformer};
pub use integer::IntegerToStringTransformer;
