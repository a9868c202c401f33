//! HTTP/JSON client for the external user/post API

use async_trait::async_trait;
use post_sync_domain::{ExternalApi, ExternalApiError, Post, User};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Public API the service was built against
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// reqwest-backed [`ExternalApi`]
pub struct HttpExternalApi {
    client: Client,
    base_url: String,
}

impl HttpExternalApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExternalApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExternalApiError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON resource; any non-2xx status is an error, an empty payload is `None`
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ExternalApiError> {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!(url = %url, "Calling external API");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ExternalApiError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExternalApiError::Network(e.to_string()))?;

        decode_optional(&bytes)
    }
}

/// Empty bodies, `null` and `{}` all mean the resource does not exist
fn decode_optional<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, ExternalApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| ExternalApiError::Decode(e.to_string()))?;

    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(ref map) if map.is_empty() => Ok(None),
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(|e| ExternalApiError::Decode(e.to_string())),
    }
}

#[async_trait]
impl ExternalApi for HttpExternalApi {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, ExternalApiError> {
        self.get_optional(&format!("users/{}", user_id)).await
    }

    async fn fetch_post(&self, id: i64) -> Result<Option<Post>, ExternalApiError> {
        self.get_optional(&format!("posts/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPostRepository;
    use post_sync_domain::usecases::{PostService, PostServiceError};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> HttpExternalApi {
        HttpExternalApi::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_user_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "name": "Leanne Graham",
                "username": "Bret"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = client(mock_server.uri());

        let user = api.fetch_user(1).await.unwrap();

        assert_eq!(
            user,
            Some(User {
                id: 1,
                name: "Leanne Graham".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_user_not_found_is_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/66"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let api = client(mock_server.uri());

        let result = api.fetch_user(66).await;

        assert!(matches!(
            result,
            Err(ExternalApiError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_user_empty_object_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/66"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let api = client(mock_server.uri());

        assert_eq!(api.fetch_user(66).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_with_missing_remote_user_is_external_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/66"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let repository = Arc::new(InMemoryPostRepository::new());
        let service = PostService::new(repository.clone(), Arc::new(client(mock_server.uri())));

        let result = service.create(Post::new(66, "Title", "Body")).await;

        assert!(matches!(
            result,
            Err(PostServiceError::ExternalApi {
                source: ExternalApiError::Status { status: 404, .. },
                ..
            })
        ));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_get_with_missing_remote_post_is_external_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let repository = Arc::new(InMemoryPostRepository::new());
        let service = PostService::new(repository, Arc::new(client(mock_server.uri())));

        let result = service.get(404).await;

        assert!(matches!(result, Err(PostServiceError::ExternalApi { .. })));
    }

    #[tokio::test]
    async fn test_fetch_post_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts/32"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "userId": 1,
                "id": 32,
                "title": "Title",
                "body": "Body"
            })))
            .mount(&mock_server)
            .await;

        let api = client(format!("{}/", mock_server.uri()));

        let post = api.fetch_post(32).await.unwrap();

        assert_eq!(post, Some(Post::new(1, "Title", "Body").with_id(32)));
    }

    #[tokio::test]
    async fn test_fetch_post_null_body_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts/40"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock_server)
            .await;

        let api = client(mock_server.uri());

        assert_eq!(api.fetch_post(40).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let api = client(mock_server.uri());

        let result = api.fetch_post(1).await;

        assert!(matches!(
            result,
            Err(ExternalApiError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let api = client(mock_server.uri());

        let result = api.fetch_user(1).await;

        assert!(matches!(result, Err(ExternalApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Nothing listens on the discard port
        let api = client("http://127.0.0.1:9".to_string());

        let result = api.fetch_user(1).await;

        assert!(matches!(result, Err(ExternalApiError::Network(_))));
    }
}
