//! Core waymark types.
//!
//! These types enforce SDK invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_key;
mod api_url;
mod location;
mod tokens;

pub use api_key::ApiKey;
pub use api_url::ApiUrl;
pub use location::{LocationSample, UpdateAck};
pub use tokens::{AccessToken, RefreshToken, TokenSet};
