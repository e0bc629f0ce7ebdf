//! Optional multi-device sync
//!
//! Journals sharing a sync code converge on one document through a remote
//! store. The model is last-writer-wins at collection granularity; there
//! is no conflict resolution beyond that.

pub mod adapter;
pub mod engine;
pub mod merge;

pub use adapter::{FileRemote, MemoryRemote, RemoteStore, SyncError};
pub use engine::{connect, SyncHandle, SyncStatus};
pub use merge::{apply_payload, SyncPayload};
