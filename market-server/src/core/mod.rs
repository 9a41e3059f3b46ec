//! Core module - server configuration and state
//!
//! # Structure
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared server state

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
