use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::{ApiError, ClientError, Result};
use sift_core::{ClientConfig, ErrorResponse, QueryPairs};

const AGENT_HEADER: &str = "X-Sift-Client";

/// A fully built request, ready to be put on the wire
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport moves one request over the network.
///
/// Implementations only report whether a response arrived; status mapping and
/// decoding happen above this seam.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Default transport backed by a pooled reqwest client
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

enum Body {
    Json(String),
    Raw {
        content: String,
        content_type: &'static str,
    },
}

/// Builds requests against the configured host and decodes responses
pub(crate) struct Requester {
    base_url: Url,
    api_key: Option<String>,
    agent: String,
    transport: Arc<dyn Transport>,
}

impl Requester {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let mut agent = format!("sift-rs (v{})", env!("CARGO_PKG_VERSION"));
        for extra in &config.client_agents {
            agent.push_str(" ; ");
            agent.push_str(extra);
        }

        Ok(Self {
            base_url: base_url(&config.host)?,
            api_key: config.api_key.clone(),
            agent,
            transport,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> Result<T> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> Result<T> {
        self.request(Method::DELETE, path, query, None).await
    }

    pub async fn post<B, T>(&self, path: &str, query: &QueryPairs, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, query, Some(json_body(body)?))
            .await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> Result<T> {
        self.request(Method::POST, path, query, None).await
    }

    pub async fn put<B, T>(&self, path: &str, query: &QueryPairs, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, query, Some(json_body(body)?))
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, query: &QueryPairs, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, query, Some(json_body(body)?))
            .await
    }

    /// Sends a pre-encoded payload untouched, with an explicit content type
    pub async fn send_raw<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &QueryPairs,
        content: String,
        content_type: &'static str,
    ) -> Result<T> {
        let body = Body::Raw {
            content,
            content_type,
        };
        self.request(method, path, query, Some(body)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &QueryPairs,
        body: Option<Body>,
    ) -> Result<T> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::Validation(format!("invalid path {}: {}", path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        let mut headers = vec![(AGENT_HEADER.to_string(), self.agent.clone())];
        if let Some(key) = &self.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {}", key)));
        }

        let body = match body {
            Some(Body::Json(content)) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(content)
            }
            Some(Body::Raw {
                content,
                content_type,
            }) => {
                headers.push(("Content-Type".to_string(), content_type.to_string()));
                Some(content)
            }
            None => None,
        };

        tracing::debug!(method = %method, path = %path, "Sending request");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;

        decode_response(response)
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body> {
    Ok(Body::Json(serde_json::to_string(body)?))
}

fn base_url(host: &str) -> Result<Url> {
    let mut host = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    if !host.ends_with('/') {
        host.push('/');
    }

    Url::parse(&host).map_err(|e| ClientError::Validation(format!("invalid host {}: {}", host, e)))
}

fn decode_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if !(200..300).contains(&response.status) {
        let error = match serde_json::from_str::<ErrorResponse>(&response.body) {
            Ok(body) => ApiError::from_response(response.status, body),
            Err(_) => ApiError {
                status: response.status,
                code: "unknown".to_string(),
                message: response.body,
                error_type: "unknown".to_string(),
                link: None,
            },
        };
        tracing::debug!(status = error.status, code = %error.code, "Server rejected request");
        return Err(error.into());
    }

    let decoded = if response.body.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(&response.body)
    };

    decoded.map_err(|e| {
        ClientError::InvalidResponse(format!("status {} body did not match: {}", response.status, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_response, MockTransport};
    use serde_json::{json, Value};

    fn requester(config: ClientConfig, transport: Arc<MockTransport>) -> Requester {
        Requester::new(&config, transport).unwrap()
    }

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(base_url("localhost:7700").unwrap().as_str(), "http://localhost:7700/");
        assert_eq!(
            base_url("https://search.example.com/api").unwrap().as_str(),
            "https://search.example.com/api/"
        );
    }

    #[tokio::test]
    async fn test_auth_and_agent_headers() {
        let transport = MockTransport::new(|_| Ok(json_response(200, json!({}))));
        let http = requester(
            ClientConfig::new("http://localhost:7700")
                .with_api_key("masterKey")
                .with_client_agent("my-app (v1.0.0)"),
            transport.clone(),
        );

        let _: Value = http.get("version", &QueryPairs::new()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.header("authorization"), Some("Bearer masterKey"));
        let agent = request.header(AGENT_HEADER).unwrap();
        assert!(agent.starts_with("sift-rs (v"));
        assert!(agent.ends_with(" ; my-app (v1.0.0)"));
        assert_eq!(request.url.as_str(), "http://localhost:7700/version");
    }

    #[tokio::test]
    async fn test_no_key_means_no_auth_header() {
        let transport = MockTransport::new(|_| Ok(json_response(200, json!({}))));
        let http = requester(ClientConfig::default(), transport.clone());

        let _: Value = http.get("health", &QueryPairs::new()).await.unwrap();
        assert_eq!(transport.last_request().header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_raw_body_is_forwarded_untouched() {
        let transport = MockTransport::new(|_| Ok(json_response(202, json!({}))));
        let http = requester(ClientConfig::default(), transport.clone());
        let csv = "id;title\n1;Carol\n".to_string();

        let mut query = QueryPairs::new();
        query.push("csvDelimiter", ';');
        let _: Value = http
            .send_raw(Method::POST, "indexes/movies/documents", &query, csv.clone(), "text/csv")
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.header("Content-Type"), Some("text/csv"));
        assert_eq!(request.body.as_deref(), Some(csv.as_str()));
        assert_eq!(request.url.query(), Some("csvDelimiter=%3B"));
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_api_error() {
        let transport = MockTransport::new(|_| {
            Ok(json_response(
                404,
                json!({
                    "message": "Index `movies` not found.",
                    "code": "index_not_found",
                    "type": "invalid_request",
                    "link": "https://docs.example.com/errors#index_not_found"
                }),
            ))
        });
        let http = requester(ClientConfig::default(), transport);

        let err = http
            .get::<Value>("indexes/movies", &QueryPairs::new())
            .await
            .unwrap_err();
        match err {
            ClientError::Api(api) => {
                assert_eq!(api.status, 404);
                assert_eq!(api.code, "index_not_found");
                assert_eq!(api.error_type, "invalid_request");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_envelope_error_body() {
        let transport = MockTransport::new(|_| {
            Ok(HttpResponse {
                status: 502,
                body: "Bad Gateway".to_string(),
            })
        });
        let http = requester(ClientConfig::default(), transport);

        let err = http.get::<Value>("health", &QueryPairs::new()).await.unwrap_err();
        assert_eq!(err.code(), Some("unknown"));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_distinct() {
        let transport = MockTransport::new(|_| {
            Err(ClientError::Transport {
                message: "connection refused".to_string(),
            })
        });
        let http = requester(ClientConfig::default(), transport);

        let err = http.get::<Value>("health", &QueryPairs::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_unexpected_success_body() {
        let transport = MockTransport::new(|_| Ok(json_response(200, json!({ "unexpected": true }))));
        let http = requester(ClientConfig::default(), transport);

        let err = http
            .get::<sift_core::Task>("tasks/1", &QueryPairs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap());
        let http = Requester::new(
            &ClientConfig::new(format!("http://127.0.0.1:{}", port)),
            transport,
        )
        .unwrap();

        let err = http.get::<Value>("health", &QueryPairs::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }), "got {:?}", err);
        assert_eq!(err.code(), None);
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        let transport = MockTransport::new(|_| {
            Ok(HttpResponse {
                status: 204,
                body: String::new(),
            })
        });
        let http = requester(ClientConfig::default(), transport);

        let value: Value = http.delete("keys/abc", &QueryPairs::new()).await.unwrap();
        assert_eq!(value, Value::Null);
        let _: () = http.delete("keys/abc", &QueryPairs::new()).await.unwrap();
    }
}
