// petadmin-api: Async Rust client for the pet registry REST backend

pub mod auth;
pub mod client;
pub mod error;
pub mod pets;
pub mod transport;
pub mod tutors;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
