//! Shared `reqwest` plumbing for the upstream clients.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::IntelError;

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, IntelError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("sponsorlens/0.1 (sponsorship-analytics)")
        .build()?)
}

/// Parses `base_url`, normalised to end with exactly one slash so that
/// relative joins append to its path instead of replacing the last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, IntelError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| IntelError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

pub(crate) fn join(base: &Url, path: &str) -> Result<Url, IntelError> {
    base.join(path).map_err(|e| IntelError::InvalidBaseUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
