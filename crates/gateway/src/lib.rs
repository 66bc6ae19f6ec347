pub mod client;
pub mod error;
pub mod models;
pub mod payloads;
pub mod service;

pub use client::{Credential, HttpUpstreamClient, UpstreamClient};
pub use error::UpstreamError;
pub use service::UpstreamGateway;
