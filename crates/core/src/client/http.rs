//! reqwest-backed `ApiClient`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;

use super::{ApiClient, ApiResponse, TransportError};

/// HTTP client for the driver API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    /// Create a new client using the base URL and timeout from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Join `path` onto the base URL.
    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_builder() {
        TransportError::InvalidUrl(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        let url = self.build_url(path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_url_handles_slashes() {
        let client = HttpApiClient::new(&config_for("http://host/driver/api/")).unwrap();
        assert_eq!(
            client.build_url("drivers/list"),
            "http://host/driver/api/drivers/list"
        );
        assert_eq!(
            client.build_url("/drivers/list"),
            "http://host/driver/api/drivers/list"
        );

        let client = HttpApiClient::new(&config_for("http://host/driver/api")).unwrap();
        assert_eq!(client.build_url("x"), "http://host/driver/api/x");
    }

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things/42"))
            .and(query_param("partnerId", "p1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = HttpApiClient::new(&config_for(&format!("{}/api/", server.uri()))).unwrap();
        let response = client
            .get("things/42", &[("partnerId", "p1")])
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(response.body, "down");
    }

    #[tokio::test]
    async fn test_get_connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is very likely closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = HttpApiClient::new(&config_for(&format!("http://127.0.0.1:{}", port)))
            .unwrap();
        let result = client.get("anything", &[]).await;

        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
