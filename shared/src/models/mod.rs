//! Data models
//!
//! Shared between market-server and frontend (via API). Status enums own
//! their transition tables so server and clients agree on the lifecycle.

pub mod cart;
pub mod earnings;
pub mod job;
pub mod order;
pub mod role;

// Re-exports
pub use cart::*;
pub use earnings::*;
pub use job::*;
pub use order::*;
pub use role::*;
