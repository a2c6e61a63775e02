use std::time::Duration;

/// Connection settings for the configuration backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `https://poem.example.org`.
    pub base_url: String,
    /// Bearer token sent with data requests, if any.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let cfg = ClientConfig::new("http://localhost:8000/");
        assert_eq!(cfg.base_url, "http://localhost:8000");
    }

    #[test]
    fn empty_token_counts_as_none() {
        let cfg = ClientConfig::new("http://x").with_token(Some(String::new()));
        assert_eq!(cfg.token, None);
    }
}
