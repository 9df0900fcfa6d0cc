//! Blocking client for the haveibeenpwned breach service.
//!
//! # Overview
//! Looks up the breaches and pastes an account appears in, lists known
//! breaches and data classes, and runs the k-anonymity password-range
//! check. Each call is one `GET` against one of two hosts: the breach API
//! or the password-range API.
//!
//! # Design
//! - `PwnedClient` holds an immutable `ClientConfig` and a `Transport`; it
//!   keeps no mutable state, so one client can serve many threads.
//! - Every operation is split into `build_*` (produces the request) and
//!   `parse_*` (interprets the response), with an executing method on top.
//! - Account lookups are gated behind an API key. A missing key, an empty
//!   identifier or a malformed range prefix fails before the transport runs.
//! - Non-success statuses map to typed `ApiError` variants; there is no
//!   retry. Rate limiting and outages are left to the caller.
//! - The library emits `tracing` events but never installs a subscriber.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod range;
pub mod request;
pub mod status;
pub mod transport;
pub mod types;

pub use client::PwnedClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpRequest, HttpResponse};
pub use range::{PasswordHash, RangeEntry};
pub use request::Resource;
pub use status::ResponseCode;
pub use transport::{Transport, UreqTransport};
pub use types::{Breach, BreachedAccountOptions, DataClasses, Paste};
