//! Domain records returned by the breach service.
//!
//! # Design
//! Every field is optional on the wire: absent fields decode to their
//! default instead of failing. All fields serialise, so encoding a record
//! and decoding it again yields an equal value.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// One data-breach event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Breach {
    /// Stable identifier, used as the path segment of `breach/{name}`.
    pub name: String,
    pub title: String,
    pub domain: String,
    pub breach_date: String,
    pub added_date: String,
    pub modified_date: String,
    pub pwn_count: u64,
    /// Free text; may contain HTML markup.
    pub description: String,
    pub data_classes: DataClasses,
    pub is_verified: bool,
    pub is_fabricated: bool,
    pub is_sensitive: bool,
    pub is_retired: bool,
    pub is_spam_list: bool,
    pub is_malware: bool,
    pub logo_path: String,
}

/// One paste-site exposure of an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Paste {
    pub source: String,
    #[serde(rename = "Id")]
    pub id: String,
    pub title: Option<String>,
    pub date: String,
    pub email_count: u64,
}

/// Data-class names in the order the service returned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DataClasses(pub Vec<String>);

impl Deref for DataClasses {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for DataClasses {
    fn from(classes: Vec<String>) -> Self {
        DataClasses(classes)
    }
}

/// Options for an account breach lookup.
///
/// The defaults match the service's: names only, unverified breaches
/// excluded, no domain filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachedAccountOptions {
    /// Only return breaches against this domain. Ignored when empty.
    pub domain: Option<String>,
    /// Return breach names only instead of full records.
    pub truncate: bool,
    pub include_unverified: bool,
}

impl Default for BreachedAccountOptions {
    fn default() -> Self {
        Self {
            domain: None,
            truncate: true,
            include_unverified: false,
        }
    }
}

impl BreachedAccountOptions {
    /// Query pairs for the options that differ from the service defaults.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            query.push(("domain", domain.to_string()));
        }
        if !self.truncate {
            query.push(("truncateResponse", "false".to_string()));
        }
        if self.include_unverified {
            query.push(("includeUnverified", "true".to_string()));
        }
        query
    }
}
