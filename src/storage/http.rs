use super::{validate_key, ObjectStore};
use crate::errors::ProviderError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Uploads objects with an HTTP PUT to `base_url/key`.
///
/// If the response body is JSON carrying a `url` field, that URL is returned;
/// otherwise the object URL itself.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ProviderError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            ProviderError::Upstream(format!("Invalid storage base URL '{}': {}", base_url, e))
        })?;
        Ok(Self {
            client: Client::new(),
            base_url,
            token,
        })
    }

    /// URL an object with `key` is uploaded to. Each key segment is
    /// percent-encoded, so `#` and `?` stay part of the file name.
    pub fn object_url(&self, key: &str) -> Result<Url, ProviderError> {
        validate_key(key)?;
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::Upstream(format!(
                    "Storage base URL '{}' cannot hold a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(key.split('/'));
        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ProviderError> {
        let url = self.object_url(key)?;
        let mut request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, content_type)
            .body(content);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await?;
        if !res.status().is_success() {
            let text = res.text().await?;
            return Err(ProviderError::Upstream(format!("Storage error: {}", text)));
        }

        let body = res.text().await?;
        let returned = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["url"].as_str().map(String::from));
        debug!("Uploaded {} to {}", key, url);
        Ok(returned.unwrap_or_else(|| url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::{Extension, Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Received {
        path: String,
        content_type: Option<String>,
        authorization: Option<String>,
        body: Vec<u8>,
    }

    type Log = Arc<Mutex<Vec<Received>>>;

    /// Answers by path: `json` paths echo a CDN url, `fail` paths return 500,
    /// everything else a plain-text body.
    async fn upload(
        Extension(log): Extension<Log>,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> axum::response::Response {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        log.lock().unwrap().push(Received {
            path: uri.path().to_string(),
            content_type: header("content-type"),
            authorization: header("authorization"),
            body: body.to_vec(),
        });

        let path = uri.path();
        if path.contains("fail") {
            (StatusCode::INTERNAL_SERVER_ERROR, "disk full").into_response()
        } else if path.contains("json") {
            Json(json!({ "url": "https://cdn.test/published.html" })).into_response()
        } else {
            "stored".into_response()
        }
    }

    async fn serve() -> (String, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .fallback(upload)
            .layer(Extension(log.clone()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/bucket", addr), log)
    }

    #[test]
    fn object_url_is_nested_under_base() {
        let store = HttpObjectStore::new("https://cdn.example.com/bucket", None).unwrap();
        let url = store.object_url("tasks/t1/app.js").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/bucket/tasks/t1/app.js");
    }

    #[test]
    fn object_url_encodes_reserved_characters() {
        let store = HttpObjectStore::new("https://cdn.example.com/bucket/", None).unwrap();
        let first = store.object_url("tasks/t/page#1.html").unwrap();
        let second = store.object_url("tasks/t/page?2.html").unwrap();
        assert_eq!(
            first.as_str(),
            "https://cdn.example.com/bucket/tasks/t/page%231.html"
        );
        assert_eq!(
            second.as_str(),
            "https://cdn.example.com/bucket/tasks/t/page%3F2.html"
        );
        assert!(first.fragment().is_none());
        assert!(second.query().is_none());
    }

    #[tokio::test]
    async fn returns_url_from_response_body() {
        let (base, log) = serve().await;
        let store = HttpObjectStore::new(&base, Some("secret".into())).unwrap();

        let url = store
            .put_object("tasks/t1/json.html", b"<p/>".to_vec(), "text/html")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/published.html");

        let received = log.lock().unwrap()[0].clone();
        assert_eq!(received.path, "/bucket/tasks/t1/json.html");
        assert_eq!(received.content_type.as_deref(), Some("text/html"));
        assert_eq!(received.authorization.as_deref(), Some("Bearer secret"));
        assert_eq!(received.body, b"<p/>");
    }

    #[tokio::test]
    async fn non_json_body_falls_back_to_object_url() {
        let (base, log) = serve().await;
        let store = HttpObjectStore::new(&base, None).unwrap();

        let url = store
            .put_object("tasks/t1/page#1.css", b"body {}".to_vec(), "text/css")
            .await
            .unwrap();
        assert_eq!(url, format!("{}/tasks/t1/page%231.css", base));

        let received = log.lock().unwrap()[0].clone();
        assert_eq!(received.path, "/bucket/tasks/t1/page%231.css");
        assert_eq!(received.content_type.as_deref(), Some("text/css"));
        assert!(received.authorization.is_none());
    }

    #[tokio::test]
    async fn error_status_carries_body_text() {
        let (base, _log) = serve().await;
        let store = HttpObjectStore::new(&base, None).unwrap();

        let err = store
            .put_object("tasks/t1/fail.html", b"x".to_vec(), "text/html")
            .await
            .unwrap_err();
        match err {
            ProviderError::Upstream(message) => assert!(message.contains("disk full")),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
