//! # Atlas Model
//!
//! Normalized library records for the process catalogue: processes, building
//! blocks, typed links and free-text notes, plus the merge operation that
//! combines library fragments from imports and persistence into one
//! consistent model.
//!
//! The library is owned by exactly one writer at a time and is replaced
//! wholesale on load/import; it is never patched in place by two callers.

mod dependencies;
mod merge;
mod types;

pub use dependencies::{add_link_unique, ensure_process, synthetic_id};
pub use merge::merge;
pub use types::{
    BuildingBlock, Library, Link, LinkKind, Process, ProcessKind, PropertyValue, StorageLocation,
    StorageValue,
};
