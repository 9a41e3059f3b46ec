//! Database entities
//!
//! Stored shapes for the SurrealDB tables. Status enums and snapshot types
//! come from `shared`; these structs add identity and storage bookkeeping.

pub mod cart_line;
pub mod catalog_item;
pub mod job;
pub mod order;
pub mod serde_helpers;
pub mod withdrawal;

// Re-exports
pub use cart_line::*;
pub use catalog_item::*;
pub use job::*;
pub use order::*;
pub use withdrawal::*;
