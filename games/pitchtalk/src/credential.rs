//! Telegram init-data credentials ("hashes").
//!
//! The raw string is URL-encoded init data. Only two fields are pulled out,
//! straight from the encoded text; nothing is decoded or re-serialized.

use crate::error::PitchtalkError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use zeroize::Zeroizing;

static TELEGRAM_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id%22%3A(\d+)").expect("valid telegram id pattern"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"username%22%3A%22([^%]+)").expect("valid username pattern"));

#[derive(Clone)]
pub struct Credential {
    raw: Zeroizing<String>,
    telegram_id: String,
    username: String,
}

impl Credential {
    pub fn parse(raw: &str) -> Result<Self, PitchtalkError> {
        let telegram_id = TELEGRAM_ID_RE
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(PitchtalkError::MalformedCredential { field: "id" })?;

        let username = USERNAME_RE
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(PitchtalkError::MalformedCredential { field: "username" })?;

        Ok(Self {
            raw: Zeroizing::new(raw.to_string()),
            telegram_id,
            username,
        })
    }

    /// The untouched credential, sent as `X-Telegram-Hash` and in the auth payload.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn telegram_id(&self) -> &str {
        &self.telegram_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("telegram_id", &self.telegram_id)
            .field("username", &self.username)
            .field("raw", &"***REDACTED***")
            .finish()
    }
}
