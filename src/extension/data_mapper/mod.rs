//! Built-in data mappers

pub mod property_path_mapper;
pub mod wrapper_mapper;

pub use property_path_mapper::PropertyPathMapper;
pub use wrapper_mapper::WrapperMapper;
