//! Shorttags metrics SDK for Rust.
//!
//! Turns business events (signups, payments, pageviews, ...) into flat
//! metric maps and posts them to the Shorttags notify endpoint. Each call
//! is a single request with no batching or retrying.
//!
//! # Example
//!
//! ```rust,ignore
//! use shorttags::Shorttags;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shorttags::Error> {
//!     let client = Shorttags::builder("api_key", "my-site")
//!         .environment("production")
//!         .build()?;
//!
//!     client.subscription("pro")
//!         .property("mrr", 29.0)
//!         .send()
//!         .await?;
//!
//!     client.feature_used("export").send().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

mod builders;
mod client;
mod config;
mod error;
mod events;
mod transport;
mod types;

pub use client::{SendableEvent, Shorttags};
pub use config::{
    Config, Enabled, ShorttagsBuilder, DEFAULT_BASE_URL, DEFAULT_OPEN_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use error::Error;
pub use events::Event;
pub use types::{Metrics, TrackResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
