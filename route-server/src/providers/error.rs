//! Routing provider error types.

/// Errors from a road routing provider.
///
/// These never reach the user directly: the provider chain logs them and
/// moves on to the next provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure: connection refused, DNS, timeout, ...
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected our credentials.
    #[error("unauthorized (check the provider API key)")]
    Unauthorized,

    /// Too many requests.
    #[error("rate limited by provider")]
    RateLimited,

    /// Any other non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expect.
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider is missing required configuration, e.g. an API key.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Fixture data could not be loaded.
    #[error("fixture error: {0}")]
    Fixture(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl ProviderError {
    /// Build a [`ProviderError::Json`] keeping the first 500 characters of
    /// the offending body.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        ProviderError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ProviderError::NotConfigured("missing ORS_API_KEY".into());
        assert_eq!(err.to_string(), "not configured: missing ORS_API_KEY");

        let err = ProviderError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected value (body: <html>)"
        );

        let err = ProviderError::Json {
            message: "expected value".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");
    }

    #[test]
    fn json_helper_truncates_body() {
        let body = "x".repeat(2000);
        let parse_err = serde_json::from_str::<serde_json::Value>(&body).unwrap_err();
        match ProviderError::json(&parse_err, &body) {
            ProviderError::Json { body: Some(b), .. } => assert_eq!(b.len(), 500),
            other => panic!("unexpected {other:?}"),
        }
    }
}
