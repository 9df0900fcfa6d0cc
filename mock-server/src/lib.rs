use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const DEFAULT_API_KEY: &str = "test-api-key";
pub const API_KEY_HEADER: &str = "hibp-api-key";
pub const PADDING_HEADER: &str = "add-padding";

/// Number of zero-count lines added to a padded range response.
pub const PADDING_ENTRIES: usize = 4;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Breach {
    pub name: String,
    pub title: String,
    pub domain: String,
    pub breach_date: String,
    pub added_date: String,
    pub modified_date: String,
    pub pwn_count: u64,
    pub description: String,
    pub data_classes: Vec<String>,
    pub is_verified: bool,
    pub is_sensitive: bool,
    pub logo_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TruncatedBreach {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Paste {
    pub source: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub date: String,
    pub email_count: u64,
}

/// In-memory data served by the mock.
#[derive(Clone, Debug)]
pub struct Fixtures {
    pub breaches: Vec<Breach>,
    /// Account to the names of the breaches it appears in.
    pub accounts: HashMap<String, Vec<String>>,
    pub pastes: HashMap<String, Vec<Paste>>,
    pub data_classes: Vec<String>,
    /// Uppercase five-character prefix to `(suffix, count)` entries.
    pub ranges: HashMap<String, Vec<(String, u64)>>,
}

pub const ACCOUNT_EXISTS: &str = "account-exists@hibp-integration-tests.com";
pub const MULTIPLE_BREACHES: &str = "multiple-breaches@hibp-integration-tests.com";
pub const RESERVED_CHARS: &str = "reserved/../chars?x=1#frag +@hibp-integration-tests.com";
pub const PASTE_ACCOUNT: &str = "paste-sensitive-breach@hibp-integration-tests.com";

impl Default for Fixtures {
    fn default() -> Self {
        let adobe = Breach {
            name: "Adobe".into(),
            title: "Adobe".into(),
            domain: "adobe.com".into(),
            breach_date: "2013-10-04".into(),
            added_date: "2013-12-04T00:00:00Z".into(),
            modified_date: "2013-12-04T00:00:00Z".into(),
            pwn_count: 152_445_165,
            description: "In October 2013, 153 million Adobe accounts were breached with each \
                containing an internal ID, username, email, <em>encrypted</em> password and a \
                password hint in plain text."
                .into(),
            data_classes: vec![
                "Email addresses".into(),
                "Password hints".into(),
                "Passwords".into(),
                "Usernames".into(),
            ],
            is_verified: true,
            is_sensitive: false,
            logo_path: "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png".into(),
        };
        let battlefield = Breach {
            name: "BattlefieldHeroes".into(),
            title: "Battlefield Heroes".into(),
            domain: "battlefieldheroes.com".into(),
            breach_date: "2011-06-26".into(),
            added_date: "2014-01-23T13:10:00Z".into(),
            modified_date: "2014-01-23T13:10:00Z".into(),
            pwn_count: 530_270,
            data_classes: vec!["Passwords".into(), "Usernames".into()],
            is_verified: true,
            ..Breach::default()
        };
        let webhost = Breach {
            name: "000webhost".into(),
            title: "000webhost".into(),
            domain: "000webhost.com".into(),
            pwn_count: 14_936_670,
            is_verified: true,
            ..Breach::default()
        };
        let unverified = Breach {
            name: "UnverifiedDump".into(),
            title: "Unverified Dump".into(),
            domain: "unverified.example".into(),
            pwn_count: 1_000,
            is_verified: false,
            ..Breach::default()
        };

        let accounts = HashMap::from([
            (ACCOUNT_EXISTS.to_string(), vec!["Adobe".to_string()]),
            (
                MULTIPLE_BREACHES.to_string(),
                vec![
                    "Adobe".to_string(),
                    "BattlefieldHeroes".to_string(),
                    "UnverifiedDump".to_string(),
                ],
            ),
            (RESERVED_CHARS.to_string(), vec!["Adobe".to_string()]),
        ]);

        let pastes = HashMap::from([(
            PASTE_ACCOUNT.to_string(),
            vec![Paste {
                source: "Pastebin".into(),
                id: "uQNGpAxp".into(),
                title: None,
                date: "2018-06-12T00:51:08Z".into(),
                email_count: 1117,
            }],
        )]);

        let ranges = HashMap::from([(
            "21BD1".to_string(),
            vec![
                ("0018A45C4D1DEF81644B54AB7F969B88D65".to_string(), 3),
                ("2D8D1B3FAACCA6A3C6A91617B2FA32E2F57".to_string(), 1),
                ("2DC183F740EE76F27B78EB39C8AD972A757".to_string(), 83129),
            ],
        )]);

        Self {
            breaches: vec![webhost, adobe, battlefield, unverified],
            accounts,
            pastes,
            data_classes: vec![
                "Account balances".into(),
                "Age groups".into(),
                "Email addresses".into(),
                "Passwords".into(),
            ],
            ranges,
        }
    }
}

pub struct MockState {
    pub api_key: String,
    pub fixtures: Fixtures,
}

pub type SharedState = Arc<MockState>;

#[derive(Deserialize)]
pub struct AccountQuery {
    pub domain: Option<String>,
    #[serde(rename = "truncateResponse")]
    pub truncate_response: Option<bool>,
    #[serde(rename = "includeUnverified")]
    pub include_unverified: Option<bool>,
}

#[derive(Deserialize)]
pub struct DomainQuery {
    pub domain: Option<String>,
}

pub fn app() -> Router {
    app_with(DEFAULT_API_KEY, Fixtures::default())
}

pub fn app_with(api_key: impl Into<String>, fixtures: Fixtures) -> Router {
    let state: SharedState = Arc::new(MockState {
        api_key: api_key.into(),
        fixtures,
    });
    Router::new()
        .route("/breachedaccount/{account}", get(breached_account))
        .route("/breaches", get(breaches))
        .route("/breach/{name}", get(breach))
        .route("/dataclasses", get(data_classes))
        .route("/pasteaccount/{account}", get(paste_account))
        .route("/range/{prefix}", get(range))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, DEFAULT_API_KEY).await
}

pub async fn run_with(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(api_key, Fixtures::default())).await
}

fn require_user_agent(headers: &HeaderMap) -> Result<(), StatusCode> {
    match headers.get(header::USER_AGENT) {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

fn require_api_key(state: &MockState, headers: &HeaderMap) -> Result<(), StatusCode> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(key) if key == state.api_key => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn domain_matches(breach: &Breach, domain: Option<&str>) -> bool {
    match domain.filter(|d| !d.is_empty()) {
        Some(domain) => breach.domain.eq_ignore_ascii_case(domain),
        None => true,
    }
}

async fn breached_account(
    State(state): State<SharedState>,
    Path(account): Path<String>,
    Query(query): Query<AccountQuery>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    require_user_agent(&headers)?;
    require_api_key(&state, &headers)?;
    if account.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    tracing::debug!(%account, "breached account lookup");

    let names = state
        .fixtures
        .accounts
        .get(&account.to_lowercase())
        .ok_or(StatusCode::NOT_FOUND)?;
    let include_unverified = query.include_unverified.unwrap_or(false);
    let matches: Vec<Breach> = state
        .fixtures
        .breaches
        .iter()
        .filter(|b| names.contains(&b.name))
        .filter(|b| include_unverified || b.is_verified)
        .filter(|b| domain_matches(b, query.domain.as_deref()))
        .cloned()
        .collect();
    if matches.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    if query.truncate_response.unwrap_or(true) {
        let truncated: Vec<TruncatedBreach> = matches
            .into_iter()
            .map(|b| TruncatedBreach { name: b.name })
            .collect();
        Ok(Json(truncated).into_response())
    } else {
        Ok(Json(matches).into_response())
    }
}

async fn breaches(
    State(state): State<SharedState>,
    Query(query): Query<DomainQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Breach>>, StatusCode> {
    require_user_agent(&headers)?;
    let breaches = state
        .fixtures
        .breaches
        .iter()
        .filter(|b| domain_matches(b, query.domain.as_deref()))
        .cloned()
        .collect();
    Ok(Json(breaches))
}

async fn breach(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Breach>, StatusCode> {
    require_user_agent(&headers)?;
    state
        .fixtures
        .breaches
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(&name))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn data_classes(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, StatusCode> {
    require_user_agent(&headers)?;
    Ok(Json(state.fixtures.data_classes.clone()))
}

async fn paste_account(
    State(state): State<SharedState>,
    Path(account): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Paste>>, StatusCode> {
    require_user_agent(&headers)?;
    require_api_key(&state, &headers)?;
    state
        .fixtures
        .pastes
        .get(&account.to_lowercase())
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn range(
    State(state): State<SharedState>,
    Path(prefix): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    if prefix.len() != 5 || !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let prefix = prefix.to_ascii_uppercase();

    let mut lines: Vec<String> = state
        .fixtures
        .ranges
        .get(&prefix)
        .into_iter()
        .flatten()
        .map(|(suffix, count)| format!("{suffix}:{count}"))
        .collect();

    let padded = headers
        .get(PADDING_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    if padded {
        lines.extend((0..PADDING_ENTRIES).map(|i| format!("{:035X}:0", i + 1)));
    }

    Ok((
        [(header::CONTENT_TYPE, "text/plain")],
        lines.join("\r\n"),
    )
        .into_response())
}
