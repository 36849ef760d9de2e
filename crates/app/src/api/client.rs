//! HTTP client for the ordering backend.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ApiError;

/// Backend client shared by every API trait.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    token: Option<String>,
    line_removal: bool,
    http: Client,
}

impl HttpApi {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            line_removal: false,
            http: Client::new(),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Use the per-line cart delete endpoint instead of the clear-when-empty workaround.
    #[must_use]
    pub fn with_line_removal(mut self, enabled: bool) -> Self {
        self.line_removal = enabled;
        self
    }

    pub(crate) fn line_removal(&self) -> bool {
        self.line_removal
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "dispatching request");

        let request = self.http.request(method, self.url(path));

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::from_body(status, &text));
        }

        Ok(response)
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let bytes = self.execute(request).await?.bytes().await?;

        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// Send a request whose response body is ignored.
    pub(crate) async fn submit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute(request).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpApi::new("http://localhost:8000/");

        assert_eq!(api.url("/cart"), "http://localhost:8000/cart");
    }

    #[test]
    fn line_removal_is_off_by_default() {
        assert!(!HttpApi::new("http://localhost:8000").line_removal());
        assert!(
            HttpApi::new("http://localhost:8000")
                .with_line_removal(true)
                .line_removal()
        );
    }
}
