//! Data models
//!
//! Shared between the API client and the console front-end.
//! All IDs are `i64` (server-side INTEGER PRIMARY KEY), except the
//! quotation document id which is a server-assigned string.

pub mod catalog;
pub mod company;
pub mod entity;
pub mod line_item;
pub mod quotation;
pub mod visit;

// Re-exports
pub use catalog::*;
pub use company::*;
pub use entity::*;
pub use line_item::*;
pub use quotation::*;
pub use visit::*;
