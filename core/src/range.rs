//! Local half of the k-anonymity password check.
//!
//! The password is hashed with SHA-1 on the caller's machine. Only the first
//! five hex characters of the hash are sent to the range endpoint, which
//! answers with every known suffix sharing that prefix as `SUFFIX:COUNT`
//! lines. The remaining 35 characters are matched here and never leave the
//! process.

use sha1::{Digest, Sha1};

use crate::error::ApiError;

pub const PREFIX_LEN: usize = 5;
pub const SUFFIX_LEN: usize = 35;

/// Uppercase hex SHA-1 of a candidate password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    hex: String,
}

impl PasswordHash {
    pub fn from_password(password: &str) -> Self {
        let digest = Sha1::digest(password.as_bytes());
        Self {
            hex: hex::encode_upper(digest),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// The part sent to the service.
    pub fn prefix(&self) -> &str {
        &self.hex[..PREFIX_LEN]
    }

    /// The part matched locally.
    pub fn suffix(&self) -> &str {
        &self.hex[PREFIX_LEN..]
    }
}

// Keep the full hash out of logs.
impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHash")
            .field("prefix", &self.prefix())
            .finish_non_exhaustive()
    }
}

/// One `SUFFIX:COUNT` line of a range response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEntry<'a> {
    pub suffix: &'a str,
    pub count: u64,
}

/// Parse a range response body. Accepts CRLF or LF line endings.
pub fn parse_range(body: &[u8]) -> Result<Vec<RangeEntry<'_>>, ApiError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ApiError::DeserializationError(format!("range body is not UTF-8: {e}")))?;

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (suffix, count) = line.split_once(':').ok_or_else(|| {
                ApiError::DeserializationError(format!("range line without count: {line:?}"))
            })?;
            let count = count.trim().parse().map_err(|e| {
                ApiError::DeserializationError(format!("bad count in range line {line:?}: {e}"))
            })?;
            Ok(RangeEntry {
                suffix: suffix.trim(),
                count,
            })
        })
        .collect()
}

/// Occurrences of `suffix` in a range response, 0 when it is not listed.
pub fn suffix_count(body: &[u8], suffix: &str) -> Result<u64, ApiError> {
    let count = parse_range(body)?
        .into_iter()
        .find(|entry| entry.suffix.eq_ignore_ascii_case(suffix))
        .map_or(0, |entry| entry.count);
    Ok(count)
}

/// Check that `prefix` is five hex characters and return it uppercased.
pub fn normalize_prefix(prefix: &str) -> Result<String, ApiError> {
    if prefix.len() != PREFIX_LEN || !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ApiError::InvalidRangePrefix(prefix.to_string()));
    }
    Ok(prefix.to_ascii_uppercase())
}
