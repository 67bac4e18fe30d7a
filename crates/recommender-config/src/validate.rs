//! Validation helpers for raw configuration values.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Normalise an optional raw value: surrounding whitespace is dropped and blank
/// strings count as unset.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Parse and vet the API base URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] when the value does not parse and
/// [`ConfigError::UnsupportedBaseUrl`] when it is not an `http`/`https` URL that
/// can carry a path, or when it already carries a query or fragment.
pub fn parse_base_url(value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        source,
    })?;

    let unsupported = |reason| ConfigError::UnsupportedBaseUrl {
        value: value.to_string(),
        reason,
    };

    if !matches!(url.scheme(), "http" | "https") {
        return Err(unsupported("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(unsupported("URL cannot carry a path"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(unsupported("query strings and fragments are not allowed"));
    }

    Ok(url)
}
