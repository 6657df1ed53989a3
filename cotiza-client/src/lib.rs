//! Cotiza Client - HTTP client for the management API
//!
//! Typed REST calls for entities, catalogs, quotations and visits, plus
//! the request coordination helpers the editor UI relies on.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod images;
pub mod resources;
pub mod response;

pub use client::NetworkClient;
pub use config::ClientConfig;
pub use coordinator::{Debouncer, RequestCoordinator};
pub use error::{ClientError, ClientResult};
pub use images::ImageFetcher;
pub use resources::ListQuery;
pub use response::ApiResponse;
