use std::time::Duration;

use reqwest::{
    Method, Url,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{Result, SyncError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

/// JSON-over-HTTP client bound to one base URL.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpResourceClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|err| SyncError::InvalidBaseUrl(format!("{base_url}: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(SyncError::from)?;

        Ok(Self {
            base_url: base_url.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.request_with_query(method, path, &[], body).await
    }

    /// Issues one request and decodes the JSON answer.
    ///
    /// An empty success body (e.g. `204 No Content`) decodes to `Value::Null`.
    pub async fn request_with_query(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut req = self.http.request(method.as_reqwest(), self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            return Err(SyncError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let value = self
            .request_with_query(HttpMethod::Get, path, query, None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<TReq: Serialize + ?Sized, TResp: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TResp> {
        let body = serde_json::to_value(body)?;
        let value = self.request(HttpMethod::Post, path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn put<TReq: Serialize + ?Sized, TResp: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TResp> {
        let body = serde_json::to_value(body)?;
        let value = self.request(HttpMethod::Put, path, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = HttpResourceClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(
            client.url("/transacciones/42"),
            "http://127.0.0.1:8000/transacciones/42"
        );
        let client = HttpResourceClient::new("http://10.0.0.2:8000/api").unwrap();
        assert_eq!(client.url("pagos-fijos"), "http://10.0.0.2:8000/api/pagos-fijos");
        assert_eq!(client.base_url(), "http://10.0.0.2:8000/api");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpResourceClient::new("not a url").unwrap_err();
        assert!(matches!(err, SyncError::InvalidBaseUrl(_)));
    }
}
