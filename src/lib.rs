//! Note store library for the pocketnotes application
//!
//! This library provides the core of a local-first note-taking app: the
//! canonical note/category collections, their JSON persistence, and the
//! query/filter/sort views that every consumer screen is built on.

mod config;
mod errors;
mod note;
mod query;
mod storage;
mod store;
mod types;

// Re-export key components
pub use config::*;
pub use errors::*;
pub use note::*;
pub use query::*;
pub use storage::*;
pub use store::*;
pub use types::*;
