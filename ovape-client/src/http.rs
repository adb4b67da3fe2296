//! HTTP transport: bearer auth, JSON bodies, typed error decoding

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;

/// Low-level HTTP client for the stamp server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET without query parameters
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        self.send(request).await
    }

    /// GET with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)).query(query));
        self.send(request).await
    }

    /// POST with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        self.send(request).await
    }

    /// PUT with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.put(self.url(path)).json(body));
        self.send(request).await
    }

    /// DELETE without body
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.delete(self.url(path)));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport)?;

        if !status.is_success() {
            let err = decode_error(&bytes).ok_or_else(|| {
                ClientError::InvalidResponse(format!(
                    "{}: {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                ))
            })?;
            tracing::debug!(code = %err.code, status = %status, "Server rejected request");
            return Err(ClientError::Api(err));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn map_transport(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Http(err)
    }
}

/// Rebuild the typed error from an `ApiResponse` error body
fn decode_error(bytes: &[u8]) -> Option<shared::AppError> {
    serde_json::from_slice::<ApiResponse<serde_json::Value>>(bytes)
        .ok()?
        .into_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AppError, ErrorCode};

    #[test]
    fn test_decode_error_body() {
        let body = serde_json::to_vec(&ApiResponse::<()>::error(
            &AppError::duplicate_phone("01012345678"),
        ))
        .unwrap();
        let err = decode_error(&body).unwrap();
        assert_eq!(err.code, ErrorCode::DuplicatePhone);
    }

    #[test]
    fn test_decode_error_rejects_garbage() {
        assert!(decode_error(b"<html>bad gateway</html>").is_none());
    }

    #[test]
    fn test_url_joins_slashes() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.url("/api/logs"), "http://localhost:3000/api/logs");
        assert_eq!(client.url("health"), "http://localhost:3000/health");
    }
}
