//! Authentication credentials.
//!
//! The Gitee AI OCR endpoints authenticate with a bearer token; the `None`
//! variant exists for tests and local stand-ins.

/// Authentication credentials for the OCR service.
#[derive(Debug, Clone)]
pub enum GiteeCredentials {
    /// Bearer token authentication.
    Bearer(String),
    /// No authentication (for testing/development).
    None,
}

impl GiteeCredentials {
    /// Create bearer token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Create credentials with no authentication.
    pub fn none() -> Self {
        Self::None
    }

    /// Add the matching authentication headers to a request.
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Bearer(token) => request.header("Authorization", format!("Bearer {token}")),
            Self::None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials() {
        match GiteeCredentials::bearer("test-token") {
            GiteeCredentials::Bearer(token) => assert_eq!(token, "test-token"),
            _ => panic!("Expected bearer credentials"),
        }

        match GiteeCredentials::none() {
            GiteeCredentials::None => {}
            _ => panic!("Expected no credentials"),
        }
    }
}
