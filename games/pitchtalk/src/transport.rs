//! HTTP transport for the PitchTalk API.
//!
//! [`Transport`] is the seam between the farming logic and the network:
//! [`HttpTransport`] talks to the real API through an optional proxy, and
//! tests swap in a scripted implementation.

use crate::config::PitchtalkConfig;
use crate::error::PitchtalkError;
use crate::headers::HeaderProfile;
use crate::models::IpResponse;
use async_trait::async_trait;
use core_logic::ProxyConfig;
use reqwest::{Client, Proxy};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One API call. `path` is relative to the API base.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<&'a str>,
    pub telegram_hash: &'a str,
}

impl<'a> ApiRequest<'a> {
    pub fn get(path: impl Into<String>, telegram_hash: &'a str) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            token: None,
            telegram_hash,
        }
    }

    pub fn post(path: impl Into<String>, body: Value, telegram_hash: &'a str) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            token: None,
            telegram_hash,
        }
    }

    pub fn bearer(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }
}

/// A 2xx response. Anything else is reported as an error by the transport.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest<'_>) -> Result<ApiResponse, PitchtalkError>;

    /// Public IP as seen by the remote side.
    async fn resolve_ip(&self) -> Result<String, PitchtalkError>;

    /// Whether calls go through a proxy.
    fn is_proxied(&self) -> bool;
}

/// reqwest-backed transport, one per account.
///
/// The client is built once with the account's proxy, so the binding lasts
/// for the life of the process.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    ip_check_url: String,
    headers: HeaderProfile,
    proxy: Option<ProxyConfig>,
}

impl HttpTransport {
    pub fn new(
        config: &PitchtalkConfig,
        headers: HeaderProfile,
        proxy: Option<ProxyConfig>,
    ) -> Result<Self, PitchtalkError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));

        if let Some(proxy_conf) = &proxy {
            let mut reqwest_proxy = Proxy::all(&proxy_conf.url).map_err(|e| {
                PitchtalkError::ProxyResolution {
                    proxy: proxy_conf.host().to_string(),
                    reason: format!("bad proxy config: {e}"),
                }
            })?;
            if let (Some(u), Some(p)) = (&proxy_conf.username, &proxy_conf.password) {
                reqwest_proxy = reqwest_proxy.basic_auth(u, p);
            }
            builder = builder.proxy(reqwest_proxy);
        } else {
            // direct means direct, even with HTTP(S)_PROXY set
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| PitchtalkError::transport("client", e))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            ip_check_url: config.ip_check_url.clone(),
            headers,
            proxy,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn proxy_label(&self) -> String {
        self.proxy
            .as_ref()
            .map(|p| p.host().to_string())
            .unwrap_or_else(|| "direct".to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest<'_>) -> Result<ApiResponse, PitchtalkError> {
        let endpoint = request.path.clone();
        let headers = self.headers.for_call(request.telegram_hash, request.token)?;
        let url = self.url(&request.path);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.headers(headers).json(body),
            None => builder.headers(headers),
        };

        debug!(method = ?request.method, url = %url, "Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| PitchtalkError::transport(&endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PitchtalkError::transport(&endpoint, e))?;

        if !status.is_success() {
            return Err(PitchtalkError::unexpected(
                endpoint,
                status.as_u16(),
                truncate(&text, 200),
            ));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                PitchtalkError::unexpected(&endpoint, status.as_u16(), format!("invalid JSON: {e}"))
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    async fn resolve_ip(&self) -> Result<String, PitchtalkError> {
        let resolution_error = |reason: String| PitchtalkError::ProxyResolution {
            proxy: self.proxy_label(),
            reason,
        };

        let response = self
            .client
            .get(&self.ip_check_url)
            .send()
            .await
            .map_err(|e| resolution_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(resolution_error(format!(
                "Unable to check the proxy's IP. Status code: {}",
                response.status().as_u16()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| resolution_error(e.to_string()))?;
        parse_ip(&text).ok_or_else(|| resolution_error(format!("unexpected body: {}", truncate(&text, 80))))
    }

    fn is_proxied(&self) -> bool {
        self.proxy.is_some()
    }
}

/// Accepts `{"ip": "..."}` or a bare address.
fn parse_ip(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<IpResponse>(body) {
        return Some(parsed.ip);
    }
    let trimmed = body.trim();
    trimmed
        .parse::<std::net::IpAddr>()
        .ok()
        .map(|_| trimmed.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn direct_transport(base_url: &str) -> HttpTransport {
        let config = PitchtalkConfig {
            api_base_url: base_url.to_string(),
            ip_check_url: format!("{base_url}/ip"),
            request_timeout_secs: 5,
            ..Default::default()
        };
        let headers = HeaderProfile::from_config(&config).unwrap();
        HttpTransport::new(&config, headers, None).unwrap()
    }

    #[tokio::test]
    async fn test_non_2xx_is_unexpected_status() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#).await;
        let transport = direct_transport(&base);

        let err = transport
            .send(ApiRequest::get("farmings", "hash-abc"))
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            PitchtalkError::UnexpectedStatus {
                endpoint,
                status,
                reason,
            } => {
                assert_eq!(endpoint, "farmings");
                assert_eq!(status, 500);
                assert!(reason.contains("boom"));
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_content_is_null() {
        let (base, server) = serve_once("204 No Content", "").await;
        let transport = direct_transport(&base);

        let response = transport
            .send(ApiRequest::post("users/claim-farming", serde_json::json!({}), "hash-abc"))
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(response.status, 204);
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn test_empty_ok_body_is_null() {
        let (base, server) = serve_once("200 OK", "").await;
        let transport = direct_transport(&base);

        let response = transport
            .send(ApiRequest::post("tasks/t1/start", serde_json::json!({}), "hash-abc"))
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let (base, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let transport = direct_transport(&base);

        let err = transport
            .send(ApiRequest::get("tasks", "hash-abc"))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err,
            PitchtalkError::UnexpectedStatus { status: 200, .. }
        ));
    }

    #[tokio::test]
    async fn test_call_headers_reach_the_wire() {
        let (base, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let transport = direct_transport(&base);

        let response = transport
            .send(
                ApiRequest::post("users/create-farming", serde_json::json!({}), "query_id%3Dabc")
                    .bearer("tok-123"),
            )
            .await
            .unwrap();
        let request = server.await.unwrap();
        let lowered = request.to_ascii_lowercase();

        assert_eq!(response.body, serde_json::json!({"ok": true}));
        assert!(request.starts_with("POST /users/create-farming HTTP/1.1"));
        assert!(lowered.contains("x-telegram-hash: query_id%3dabc"));
        assert!(lowered.contains("authorization: bearer tok-123"));
        assert!(lowered.contains("origin: https://webapp.pitchtalk.app"));
        assert!(request.ends_with("{}"));
    }

    #[tokio::test]
    async fn test_get_without_token_sends_no_authorization() {
        let (base, server) = serve_once("200 OK", "[]").await;
        let transport = direct_transport(&base);

        transport
            .send(ApiRequest::get("tasks", "hash-abc"))
            .await
            .unwrap();
        let request = server.await.unwrap().to_ascii_lowercase();

        assert!(request.starts_with("get /tasks http/1.1"));
        assert!(request.contains("x-telegram-hash: hash-abc"));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_resolve_ip_reads_json() {
        let (base, server) = serve_once("200 OK", r#"{"ip":"203.0.113.9"}"#).await;
        let transport = direct_transport(&base);

        let ip = transport.resolve_ip().await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(ip, "203.0.113.9");
        assert!(request.starts_with("GET /ip HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_socks5_proxy_speaks_socks() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy_addr = listener.local_addr().unwrap();
        let greeting = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut first = [0u8; 1];
            socket.read_exact(&mut first).await.unwrap();
            first[0]
        });

        let config = PitchtalkConfig {
            request_timeout_secs: 2,
            ..Default::default()
        };
        let headers = HeaderProfile::from_config(&config).unwrap();
        let proxy = ProxyConfig::new(format!("socks5://{proxy_addr}"));
        let transport = HttpTransport::new(&config, headers, Some(proxy)).unwrap();

        // The stub never answers the handshake, so the call itself fails.
        let call = tokio::spawn(async move { transport.resolve_ip().await });
        assert_eq!(greeting.await.unwrap(), 0x05);
        assert!(call.await.unwrap().is_err());
    }

    #[test]
    fn test_parse_ip_formats() {
        assert_eq!(parse_ip(r#"{"ip":"203.0.113.7"}"#).as_deref(), Some("203.0.113.7"));
        assert_eq!(parse_ip("198.51.100.1\n").as_deref(), Some("198.51.100.1"));
        assert_eq!(parse_ip("<html>blocked</html>"), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn test_proxy_binding_survives_construction() {
        let config = PitchtalkConfig::default();
        let headers = HeaderProfile::from_config(&config).unwrap();
        let proxy = ProxyConfig::new("http://127.0.0.1:3128").with_auth("u", "p");

        let proxied = HttpTransport::new(&config, headers.clone(), Some(proxy)).unwrap();
        assert!(proxied.is_proxied());
        assert_eq!(proxied.proxy_label(), "127.0.0.1:3128");

        let direct = HttpTransport::new(&config, headers, None).unwrap();
        assert!(!direct.is_proxied());
        assert_eq!(direct.url("/farmings"), "https://api.pitchtalk.app/v1/api/farmings");
    }
}
