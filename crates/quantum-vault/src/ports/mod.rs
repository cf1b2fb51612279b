//! # Ports Layer
//!
//! Port traits for the quantum authorization vault.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (the vault API)
//! - `outbound.rs` - Driven ports (storage, clock, event sink)

pub mod inbound;
pub mod outbound;
