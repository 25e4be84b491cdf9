//! waymark-core - Core types and traits for the waymark location SDK.

pub mod error;
pub mod source;
pub mod store;
pub mod types;

pub use error::Error;
pub use source::{LocationSource, SampleStream};
pub use store::{MemoryTokenStore, TokenStore};
pub use types::{AccessToken, ApiKey, ApiUrl, LocationSample, RefreshToken, TokenSet, UpdateAck};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
