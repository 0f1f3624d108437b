//! Browser-like header set shared by every call.

use crate::config::PitchtalkConfig;
use crate::error::PitchtalkError;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

pub const TELEGRAM_HASH: HeaderName = HeaderName::from_static("x-telegram-hash");

/// Base headers, built once from configuration and never mutated. Each
/// call gets its own copy with the per-call headers layered on top.
#[derive(Debug, Clone)]
pub struct HeaderProfile {
    base: HeaderMap,
}

impl HeaderProfile {
    pub fn from_config(config: &PitchtalkConfig) -> Result<Self, PitchtalkError> {
        let value = |v: &str| {
            HeaderValue::from_str(v)
                .map_err(|e| PitchtalkError::transport("headers", format!("invalid header value: {e}")))
        };
        let referer = format!("{}/", config.web_origin.trim_end_matches('/'));

        let mut base = HeaderMap::new();
        base.insert(header::ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        base.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        base.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        base.insert(header::ORIGIN, value(config.web_origin.trim_end_matches('/'))?);
        base.insert(header::REFERER, value(&referer)?);
        base.insert(
            HeaderName::from_static("sec-ch-ua"),
            HeaderValue::from_static(
                "\"Microsoft Edge\";v=\"129\", \"Not=A?Brand\";v=\"8\", \"Chromium\";v=\"129\", \"Microsoft Edge WebView2\";v=\"129\"",
            ),
        );
        base.insert(HeaderName::from_static("sec-ch-ua-mobile"), HeaderValue::from_static("?0"));
        base.insert(HeaderName::from_static("sec-ch-ua-platform"), HeaderValue::from_static("\"Windows\""));
        base.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
        base.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
        base.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-site"));
        base.insert(header::USER_AGENT, value(&config.user_agent)?);

        Ok(Self { base })
    }

    /// Base headers plus `X-Telegram-Hash`, and `Authorization` when a
    /// bearer token is given.
    pub fn for_call(
        &self,
        telegram_hash: &str,
        token: Option<&str>,
    ) -> Result<HeaderMap, PitchtalkError> {
        let mut headers = self.base.clone();
        let hash = HeaderValue::from_str(telegram_hash).map_err(|_| {
            PitchtalkError::transport("headers", "credential is not a valid header value")
        })?;
        headers.insert(TELEGRAM_HASH, hash);

        if let Some(token) = token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                PitchtalkError::transport("headers", "access token is not a valid header value")
            })?;
            bearer.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, bearer);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> HeaderProfile {
        HeaderProfile::from_config(&PitchtalkConfig::default()).unwrap()
    }

    #[test]
    fn test_origin_and_referer() {
        let headers = profile().for_call("h", None).unwrap();
        assert_eq!(headers[header::ORIGIN], "https://webapp.pitchtalk.app");
        assert_eq!(headers[header::REFERER], "https://webapp.pitchtalk.app/");
        assert!(headers[header::USER_AGENT].to_str().unwrap().contains("Edg/129"));
    }

    #[test]
    fn test_bearer_only_with_token() {
        let anon = profile().for_call("query_id%3D1", None).unwrap();
        assert_eq!(anon[TELEGRAM_HASH], "query_id%3D1");
        assert!(anon.get(header::AUTHORIZATION).is_none());

        let authed = profile().for_call("query_id%3D1", Some("tok")).unwrap();
        assert_eq!(authed[header::AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn test_profile_is_not_mutated_by_calls() {
        let profile = profile();
        let _ = profile.for_call("a", Some("tok")).unwrap();
        let again = profile.for_call("b", None).unwrap();
        assert!(again.get(header::AUTHORIZATION).is_none());
        assert_eq!(again[TELEGRAM_HASH], "b");
    }

    #[test]
    fn test_newline_in_hash_rejected() {
        assert!(profile().for_call("bad\nhash", None).is_err());
    }
}
