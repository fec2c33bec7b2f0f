//! # Download queue controller using the NZBGet JSON-RPC API.
//!
//! usage:
//!
//! ```rust,ignore
//! use nzbget_controller::{ClientConfig, NzbGetClient};
//! use nzbget_types::{AddOptions, DownloadQueue, Priority};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:6789/jsonrpc")
//!         .with_credentials("nzbget", "tegbzn6789");
//!     let client = NzbGetClient::try_new(config)?;
//!
//!     let options = AddOptions::default()
//!         .with_category("tv")
//!         .with_priority(Priority::High);
//!     let id = client.add("https://indexer.example/get/1234.nzb", options).await?;
//!     println!("Queued as {id}");
//!
//!     for group in client.list().await?.groups {
//!         println!("{} {} {}", group.id, group.name, group.status);
//!     }
//!     Ok(())
//! }
//! ```
//!

mod client;
mod config;
mod conversions;
mod ingest;
mod ops;
#[cfg(test)]
mod testutil;
mod transport;

pub use client::NzbGetClient;
pub use config::{ClientConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_RPC_TIMEOUT, DEFAULT_URL};
pub use ops::{Envelope, RpcError, Transport, TransportError};
pub use transport::HttpTransport;

#[cfg(test)]
use {axum as _, tracing_subscriber as _};
