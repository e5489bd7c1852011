use reqwest::{Client, Url};

use super::{ApiError, ApiRequest};

/// HTTP client for the daemon API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    /// Execute one API operation and decode its response.
    pub async fn call<R: ApiRequest>(&self, request: R) -> Result<R::Response, ApiError> {
        let response = request
            .build_request(&self.base_url, &self.client)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
