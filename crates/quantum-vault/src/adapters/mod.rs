//! # Adapters Layer
//!
//! - `storage/` - `KeyValueStore` implementations (memory, file)
//! - `infra/` - clocks
//! - `events` - event sinks

pub mod events;
pub mod infra;
pub mod storage;

pub use events::{BroadcastEventSink, LoggingEventSink};
pub use infra::{ManualTimeSource, SystemTimeSource};
pub use storage::{FileBackedKVStore, InMemoryKVStore};
