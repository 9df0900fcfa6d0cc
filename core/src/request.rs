//! Request construction: resource paths, query strings, headers and the
//! API-key gate.

use crate::config::{parse_base_url, ClientConfig};
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::range::normalize_prefix;

pub const USER_AGENT_HEADER: &str = "user-agent";
pub const API_KEY_HEADER: &str = "hibp-api-key";
pub const CONNECTION_HEADER: &str = "connection";
pub const PADDING_HEADER: &str = "add-padding";

/// A resource exposed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<'a> {
    BreachedAccount(&'a str),
    Breaches,
    Breach(&'a str),
    DataClasses,
    PasteAccount(&'a str),
    Range(&'a str),
}

impl Resource<'_> {
    /// Account lookups are the only resources gated behind an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Resource::BreachedAccount(_) | Resource::PasteAccount(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resource::BreachedAccount(_) => "breachedaccount",
            Resource::Breaches => "breaches",
            Resource::Breach(_) => "breach",
            Resource::DataClasses => "dataclasses",
            Resource::PasteAccount(_) => "pasteaccount",
            Resource::Range(_) => "range",
        }
    }

    fn base<'c>(&self, config: &'c ClientConfig) -> &'c str {
        match self {
            Resource::Range(_) => &config.range_url,
            _ => &config.api_url,
        }
    }

    /// Path segments below the base URL, unescaped.
    fn segments(&self) -> Result<Vec<String>, ApiError> {
        let segments = match self {
            Resource::BreachedAccount(account) | Resource::PasteAccount(account) => {
                vec![self.name().to_string(), required(account, "account")?]
            }
            Resource::Breach(name) => vec![self.name().to_string(), required(name, "breach name")?],
            Resource::Breaches | Resource::DataClasses => vec![self.name().to_string()],
            // The range base URL already ends in `range/`.
            Resource::Range(prefix) => vec![normalize_prefix(prefix)?],
        };
        Ok(segments)
    }
}

fn required(value: &str, what: &'static str) -> Result<String, ApiError> {
    match value {
        "" => Err(ApiError::MissingIdentifier(what)),
        // `PathSegmentsMut::push` drops these instead of escaping them.
        "." | ".." => Err(ApiError::InvalidIdentifier {
            what,
            value: value.to_string(),
        }),
        _ => Ok(value.to_string()),
    }
}

/// Build the `GET` request for `resource`.
///
/// Fails before anything is sent when a gated resource has no API key, a
/// required identifier is empty or a bare dot segment, or a range prefix is
/// malformed. Path
/// segments are percent-encoded; `query` pairs are appended in order and
/// the query string is left off entirely when `query` is empty.
pub fn build_request(
    config: &ClientConfig,
    resource: &Resource<'_>,
    query: &[(&str, String)],
) -> Result<HttpRequest, ApiError> {
    let api_key = match (resource.requires_api_key(), config.api_key.as_deref()) {
        (true, None) => return Err(ApiError::MissingApiKey),
        (true, Some(key)) => Some(key),
        (false, _) => None,
    };

    let base = resource.base(config);
    let mut url = parse_base_url(base)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(base.to_string()))?;
        path.pop_if_empty();
        for segment in resource.segments()? {
            path.push(&segment);
        }
    }
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }

    let mut headers = vec![
        (USER_AGENT_HEADER.to_string(), config.user_agent.clone()),
        (CONNECTION_HEADER.to_string(), "close".to_string()),
    ];
    if let Some(key) = api_key {
        headers.push((API_KEY_HEADER.to_string(), key.to_string()));
    }
    if matches!(resource, Resource::Range(_)) && config.add_padding {
        headers.push((PADDING_HEADER.to_string(), "true".to_string()));
    }

    Ok(HttpRequest {
        url: url.into(),
        headers,
    })
}
