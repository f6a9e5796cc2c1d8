//! Account API client.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! executing methods (`create`, `fetch`, `delete`, `list`) glue the two
//! together through the client's [`Transport`]. Besides the transport the
//! client holds only its base URL, so a single instance can be shared
//! between threads.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Account, Envelope};

const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// Client for the `/v1/organisation/accounts` resource.
#[derive(Debug, Clone)]
pub struct AccountClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl AccountClient<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    /// Client for the host named by `API_HOST_ADDR`, see [`config::host_address`].
    pub fn from_env() -> Self {
        Self::new(&config::host_address())
    }
}

impl<T> AccountClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn accounts_url(&self) -> String {
        format!("{}{ACCOUNTS_PATH}", self.base_url)
    }

    pub fn build_create_account(&self, account: &Account) -> Result<HttpRequest> {
        json_request(HttpMethod::Post, self.accounts_url(), &Envelope::new(account))
    }

    pub fn build_fetch_account(&self, id: &str) -> HttpRequest {
        bodiless(HttpMethod::Get, format!("{}/{id}", self.accounts_url()))
    }

    /// Only `id` and `version` of `account` are used.
    pub fn build_delete_account(&self, account: &Account) -> HttpRequest {
        bodiless(
            HttpMethod::Delete,
            format!("{}/{}?version={}", self.accounts_url(), account.id, account.version),
        )
    }

    /// Page parameters are passed through unchecked; the server rejects
    /// negative values and treats a page size of 0 as unlimited.
    pub fn build_list_accounts(&self, page_size: i64, page_number: i64) -> HttpRequest {
        bodiless(
            HttpMethod::Get,
            format!(
                "{}?page%5Bsize%5D={page_size}&page%5Bnumber%5D={page_number}",
                self.accounts_url()
            ),
        )
    }

    pub fn parse_create_account(&self, response: HttpResponse) -> Result<Account> {
        decode::<Envelope<Account>>(response)?
            .map(Envelope::into_inner)
            .ok_or(ApiError::EmptyResponse)
    }

    pub fn parse_fetch_account(&self, response: HttpResponse) -> Result<Account> {
        decode::<Envelope<Account>>(response)?
            .map(Envelope::into_inner)
            .ok_or(ApiError::EmptyResponse)
    }

    pub fn parse_delete_account(&self, response: HttpResponse) -> Result<()> {
        decode::<serde_json::Value>(response)?;
        Ok(())
    }

    pub fn parse_list_accounts(&self, response: HttpResponse) -> Result<Vec<Account>> {
        Ok(decode::<Envelope<Option<Vec<Account>>>>(response)?
            .and_then(Envelope::into_inner)
            .unwrap_or_default())
    }
}

impl<T: Transport> AccountClient<T> {
    /// Create `account`; returns the server's representation of it.
    pub fn create(&self, account: &Account) -> Result<Account> {
        let response = self.dispatch(self.build_create_account(account)?)?;
        self.parse_create_account(response)
    }

    pub fn fetch(&self, id: &str) -> Result<Account> {
        let response = self.dispatch(self.build_fetch_account(id))?;
        self.parse_fetch_account(response)
    }

    /// Delete `account` at its current `version`.
    pub fn delete(&self, account: &Account) -> Result<()> {
        let response = self.dispatch(self.build_delete_account(account))?;
        self.parse_delete_account(response)
    }

    pub fn list(&self, page_size: i64, page_number: i64) -> Result<Vec<Account>> {
        let response = self.dispatch(self.build_list_accounts(page_size, page_number))?;
        self.parse_list_accounts(response)
    }

    fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn bodiless(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

/// A request carrying `body` as JSON.
fn json_request<B: Serialize + ?Sized>(method: HttpMethod, url: String, body: &B) -> Result<HttpRequest> {
    let body = serde_json::to_string(body).map_err(ApiError::Serialization)?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map a response to its decoded body.
///
/// Statuses outside `[200, 300)` become `Rejected` with the body parsed as
/// untyped JSON. An empty success body decodes to `None`.
fn decode<R: DeserializeOwned>(response: HttpResponse) -> Result<Option<R>> {
    if !response.is_success() {
        let status = response.status;
        let body = serde_json::from_str(&response.body)
            .map_err(|source| ApiError::ErrorBodyDecode { status, source })?;
        return Err(ApiError::Rejected { status, body });
    }
    if response.body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(ApiError::Deserialization)
}
