//! # Moosend Adapter - Subscriber API Tabular Bridge
//!
//! ## Purpose
//!
//! Adapts Moosend's paginated subscriber REST API into a tabular data
//! source: a lazy full-table scan yielding typed row-mappings, and
//! insert/update/delete operations bridged onto the service's
//! subscribe/remove endpoints. Originally written as a host-database
//! plugin; this crate is the standalone rendition, embeddable in any
//! runtime that can drive the [`TableSource`] contract.
//!
//! ## Integration Points
//!
//! - **Input Source**: `GET lists/{list}/subscribers/Subscribed.json`,
//!   paginated with a fixed total page count taken from page 1
//! - **Write Targets**: `POST subscribers/{list}/subscribe.json` (upsert
//!   by email) and `POST subscribers/{list}/remove.json`
//! - **Transport**: blocking HTTP behind the [`HttpTransport`] trait;
//!   production uses `reqwest`, tests a scripted in-memory transport
//! - **Diagnostics**: the [`LogSink`] collaborator carries warnings and
//!   errors to the host; the default sink forwards to `tracing`
//!
//! ## Concurrency Model
//!
//! Single-threaded, synchronous, blocking I/O throughout. No retries,
//! no backoff, no cancellation: a scan is a pull-based iterator and
//! stopping early simply stops the network traffic.
//!
//! ## Example
//!
//! ```rust,no_run
//! use moosend_adapter::{Column, ColumnType, MoosendAdapter, MoosendConfig};
//!
//! # fn main() -> moosend_adapter::Result<()> {
//! let config = MoosendConfig::new("api-key", "list-id").with_primary_key("Email");
//! let columns = vec![
//!     Column::new("Email", ColumnType::Text),
//!     Column::new("Name", ColumnType::Text),
//!     Column::new("CreatedOn", ColumnType::TimestampTz),
//! ];
//! let adapter = MoosendAdapter::connect(config, columns)?;
//!
//! for row in adapter.scan(&[]) {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod coerce;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod resolve;
pub mod schema;
pub mod sink;
pub mod source;
pub mod wire;

pub use adapter::{MoosendAdapter, TableSource};
pub use coerce::coerce;
pub use config::{MoosendConfig, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE};
pub use error::{AdapterError, Result};
pub use fetch::{HttpTransport, PageFetcher, ReqwestTransport, ScriptedTransport};
pub use logging::{LogSink, MemoryLog, Severity, TracingLog};
pub use resolve::resolve;
pub use schema::{Column, ColumnType, Qualifier, Row, Value, MAIN_FIELDS};
pub use sink::SubscriberSink;
pub use source::{ScanIter, SubscriberSource};
