//! Command handlers grouped by resource.

pub(crate) mod accelerators;
pub(crate) mod catalog;
pub(crate) mod manifests;
pub(crate) mod models_and_servers;

use crate::client::{CliError, CliResult};

/// Reject flag values that are empty or whitespace.
pub(crate) fn require_value<'a>(flag: &str, value: &'a str) -> CliResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("--{flag} must not be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
pub(crate) mod test_support {
    use anyhow::{Result, anyhow};
    use httpmock::MockServer;
    use recommender_client::{ApiKeyCredentials, RecommenderClient};
    use std::sync::Arc;

    use crate::client::AppContext;

    pub(crate) const TEST_KEY: &str = "test-key";

    pub(crate) fn context_with(server: &MockServer) -> Result<AppContext> {
        context_for(&server.base_url())
    }

    pub(crate) fn context_for(base_url: &str) -> Result<AppContext> {
        Ok(AppContext {
            client: RecommenderClient::from_parts(
                reqwest::Client::new(),
                base_url.parse().map_err(|_| anyhow!("valid URL"))?,
                Arc::new(ApiKeyCredentials::new(TEST_KEY)),
            ),
        })
    }

    pub(crate) fn stdout_text(buffer: Vec<u8>) -> Result<String> {
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_value_trims_and_rejects_blank() {
        assert!(matches!(require_value("model", " gemma "), Ok("gemma")));
        match require_value("model", "   ") {
            Err(CliError::Validation(message)) => {
                assert_eq!(message, "--model must not be empty");
            }
            _ => panic!("expected validation error"),
        }
    }
}
