//! # Shared Types Crate
//!
//! Primitive identifiers shared by the vault core and its runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hash, address and index widths are defined
//!   once here and used everywhere else.
//! - **Text at the edges**: only the runtime parses hex; the core works on
//!   fixed-size byte arrays.

pub mod encoding;
pub mod entities;

pub use encoding::*;
pub use entities::*;
