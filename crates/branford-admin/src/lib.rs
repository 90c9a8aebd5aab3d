//! Admin client for the Branford content API.
//!
//! [`client::ApiClient`] speaks the HTTP API, [`store::CollectionStore`] keeps one
//! collection in sync for an edit screen and [`pipeline`] prepares images for upload.

pub mod client;
pub mod pipeline;
pub mod store;

pub use client::{ApiClient, ClientError};
