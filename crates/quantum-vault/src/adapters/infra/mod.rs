//! Infrastructure Adapters
//!
//! Implementations of the clock trait.

mod time;

pub use time::{ManualTimeSource, SystemTimeSource};
