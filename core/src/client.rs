//! Request builder, response parser and executing client for the breach
//! service.
//!
//! # Design
//! `PwnedClient` holds an immutable `ClientConfig` and a `Transport`; it
//! keeps no state between calls. Every operation comes in three forms:
//! `build_*` produces the `HttpRequest` without touching the network,
//! `parse_*` interprets an `HttpResponse`, and the plain method runs
//! build, transport and parse in one blocking call. Local precondition
//! failures surface from `build_*`, so they never reach the transport.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::range::{suffix_count, PasswordHash};
use crate::request::{build_request, Resource};
use crate::status::check_status;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Breach, BreachedAccountOptions, DataClasses, Paste};

/// Blocking client for the breach service.
#[derive(Debug, Clone)]
pub struct PwnedClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl PwnedClient<UreqTransport> {
    /// Client for the public service using the default transport.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_transport(ClientConfig::new().with_api_key(api_key), UreqTransport::new())
    }

    /// Client configured from `HIBP_API_KEY`, `HIBP_API_URL` and `HIBP_RANGE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::with_transport(ClientConfig::from_env()?, UreqTransport::new()))
    }
}

impl<T: Transport> PwnedClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // --- build ---

    pub fn build_account_breaches(
        &self,
        account: &str,
        options: &BreachedAccountOptions,
    ) -> Result<HttpRequest, ApiError> {
        build_request(&self.config, &Resource::BreachedAccount(account), &options.query())
    }

    pub fn build_breached_sites(&self, domain: Option<&str>) -> Result<HttpRequest, ApiError> {
        let query: Vec<_> = domain
            .filter(|d| !d.is_empty())
            .map(|d| ("domain", d.to_string()))
            .into_iter()
            .collect();
        build_request(&self.config, &Resource::Breaches, &query)
    }

    pub fn build_breached_site(&self, name: &str) -> Result<HttpRequest, ApiError> {
        build_request(&self.config, &Resource::Breach(name), &[])
    }

    pub fn build_data_classes(&self) -> Result<HttpRequest, ApiError> {
        build_request(&self.config, &Resource::DataClasses, &[])
    }

    pub fn build_account_pastes(&self, account: &str) -> Result<HttpRequest, ApiError> {
        build_request(&self.config, &Resource::PasteAccount(account), &[])
    }

    pub fn build_pwned_range(&self, prefix: &str) -> Result<HttpRequest, ApiError> {
        build_request(&self.config, &Resource::Range(prefix), &[])
    }

    // --- parse ---

    pub fn parse_breaches(&self, response: HttpResponse) -> Result<Vec<Breach>, ApiError> {
        decode_json(response)
    }

    pub fn parse_breach(&self, response: HttpResponse) -> Result<Breach, ApiError> {
        decode_json(response)
    }

    pub fn parse_data_classes(&self, response: HttpResponse) -> Result<DataClasses, ApiError> {
        decode_json(response)
    }

    pub fn parse_pastes(&self, response: HttpResponse) -> Result<Vec<Paste>, ApiError> {
        decode_json(response)
    }

    pub fn parse_pwned_range(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    // --- execute ---

    /// Breaches an account appears in.
    ///
    /// Requires an API key. An account with no breaches comes back as
    /// `Err(ApiError::NotFound)`; check `ApiError::is_not_found`.
    pub fn account_breaches(
        &self,
        account: &str,
        options: &BreachedAccountOptions,
    ) -> Result<Vec<Breach>, ApiError> {
        let request = self.build_account_breaches(account, options)?;
        self.parse_breaches(self.send(request)?)
    }

    /// Every breach in the system, optionally only those against `domain`.
    pub fn breached_sites(&self, domain: Option<&str>) -> Result<Vec<Breach>, ApiError> {
        let request = self.build_breached_sites(domain)?;
        self.parse_breaches(self.send(request)?)
    }

    /// A single breach by its stable name, e.g. `"Adobe"`.
    pub fn breached_site(&self, name: &str) -> Result<Breach, ApiError> {
        let request = self.build_breached_site(name)?;
        self.parse_breach(self.send(request)?)
    }

    pub fn data_classes(&self) -> Result<DataClasses, ApiError> {
        let request = self.build_data_classes()?;
        self.parse_data_classes(self.send(request)?)
    }

    /// Pastes an account appears in. Requires an API key.
    pub fn account_pastes(&self, account: &str) -> Result<Vec<Paste>, ApiError> {
        let request = self.build_account_pastes(account)?;
        self.parse_pastes(self.send(request)?)
    }

    /// Raw `SUFFIX:COUNT` lines for every hash starting with `prefix`.
    ///
    /// `prefix` must be the first five hex characters of a SHA-1 hash. Use
    /// `range::suffix_count` on the result to look up the remaining 35.
    pub fn pwned_range(&self, prefix: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.build_pwned_range(prefix)?;
        self.parse_pwned_range(self.send(request)?)
    }

    /// How often `password` appears in the breach corpus, 0 if never.
    ///
    /// Only the five-character hash prefix is sent to the service.
    pub fn password_occurrences(&self, password: &str) -> Result<u64, ApiError> {
        let hash = PasswordHash::from_password(password);
        let body = self.pwned_range(hash.prefix())?;
        suffix_count(&body, hash.suffix())
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(url = %request.url, "sending request");
        let response = self.transport.execute(&request).map_err(ApiError::Transport)?;
        tracing::debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }
}

fn decode_json<D: DeserializeOwned>(response: HttpResponse) -> Result<D, ApiError> {
    check_status(&response)?;
    Ok(serde_json::from_slice(&response.body)?)
}
