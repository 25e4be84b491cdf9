//! waymark-http - HTTP-backed session and delivery pipeline.
//!
//! The entry point is [`Session::initialize`], which authenticates with the
//! service and returns a handle for once-shot and continuous location
//! reporting.
//!
//! # Example
//!
//! ```no_run
//! use waymark_core::{ApiKey, ApiUrl, MemoryTokenStore};
//! use waymark_http::{Config, Session};
//! # use waymark_core::{LocationSource, SampleStream};
//! # struct Gps;
//! # impl LocationSource for Gps {
//! #     fn stream_samples(&self, _: std::time::Duration) -> waymark_core::Result<SampleStream> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! # async fn example() -> waymark_core::Result<()> {
//! let config = Config::new(ApiUrl::new("https://api.example.com")?, ApiKey::new("sk-live-0123"));
//! let session = Session::initialize(config, Gps, MemoryTokenStore::new()).await?;
//!
//! session.request_once(
//!     |lat, lon| println!("reported {lat}, {lon}"),
//!     |code, message| eprintln!("update failed ({code}): {message}"),
//! );
//! # Ok(())
//! # }
//! ```

mod api;
mod auth;
mod client;
mod endpoints;
mod pipeline;
mod refresh;
mod session;
mod transport;

pub use session::{Config, Session};
