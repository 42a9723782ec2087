//! Storage abstraction and implementations for LecTrack.
//!
//! This crate provides the persistence contract for progress records with
//! an in-memory and a JSON-file implementation, plus the lecture catalog.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
pub mod json_storage;
pub mod catalog;

pub use trait_::{ProgressStore, StorageError, Result};
pub use memory::MemoryStorage;
pub use json_storage::JsonStorage;
pub use catalog::{LectureCatalog, StaticCatalog};
