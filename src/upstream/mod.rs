//! Upstream Subsonic access: request signing, the HTTP client and payload shapes.

pub mod auth;
pub mod client;
pub mod wire;

pub use auth::{Credentials, SignedRequest};
pub use client::SubsonicClient;
