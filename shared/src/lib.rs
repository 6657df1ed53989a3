//! Shared types for the Cotiza console
//!
//! Domain models used across the client, editor core and export crates:
//! quotations with their sections and line items, visit records, catalog
//! entries and the read-only company/technician snapshots.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
