//! Blocking client for the account-management REST API.
//!
//! # Overview
//! [`AccountClient`] creates, fetches, deletes and lists accounts under
//! `/v1/organisation/accounts`. Requests and responses travel in JSON:API
//! style envelopes (`{"data": ...}`); any status outside `[200, 300)` is
//! returned as [`ApiError::Rejected`] with the server's decoded error payload.
//!
//! # Design
//! - `AccountClient` holds only a base URL and a [`Transport`]; it keeps no
//!   per-call state and does no retries, caching or local validation.
//! - Each operation is split into `build_*` (produces an [`HttpRequest`]) and
//!   `parse_*` (consumes an [`HttpResponse`]); `create`/`fetch`/`delete`/`list`
//!   run the round trip through the transport in between.
//! - [`UreqTransport`] is the default transport. Any
//!   `Fn(HttpRequest) -> Result<HttpResponse>` can stand in for it.
//!
//! ```no_run
//! use accountapi::{Account, AccountClient, Attributes};
//!
//! let client = AccountClient::new("http://localhost:8080");
//! let account = Account::new(
//!     "ad27e265-9605-4b4b-a0e5-3003ea9cc4dc",
//!     "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
//!     Attributes {
//!         country: Some("GB".to_string()),
//!         ..Default::default()
//!     },
//! );
//! let created = client.create(&account)?;
//! client.delete(&created)?;
//! # Ok::<(), accountapi::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::AccountClient;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Account, Attributes, Envelope, ACCOUNT_TYPE};
