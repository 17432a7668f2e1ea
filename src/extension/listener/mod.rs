//! Built-in event listeners

pub mod resize;
pub mod trim;

pub use resize::ResizeBlockListener;
pub use trim::TrimListener;
