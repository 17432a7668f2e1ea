//! Built-in block types
//!
//! ```text
//! block ─┬─ field ─┬─ text
//!        │         ├─ integer
//!        │         ├─ checkbox
//!        │         └─ date
//!        ├─ object
//!        ├─ collection
//!        └─ panel
//! ```

pub mod block;
pub mod checkbox;
pub mod collection;
pub mod date;
pub mod field;
pub mod integer;
pub mod object;
pub mod panel;
pub mod text;

pub use block::BaseBlockType;
pub use checkbox::CheckboxType;
pub use collection::CollectionType;
pub use date::DateType;
pub use field::FieldType;
pub use integer::IntegerType;
pub use object::ObjectType;
pub use panel::PanelType;
pub use text::TextType;
