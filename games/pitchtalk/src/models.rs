//! Typed request and response bodies, one per endpoint.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    pub telegram_id: &'a str,
    pub username: &'a str,
    pub hash: &'a str,
    pub referral_code: &'a str,
    pub photo_url: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub tickets: i64,
    #[serde(default)]
    pub login_streak: i64,
    #[serde(default)]
    pub farming_id: Option<String>,
}

/// Authenticated state for one account, rebuilt every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub username: String,
    pub coins: i64,
    pub tickets: i64,
    pub login_streak: i64,
    pub farming_id: Option<String>,
}

impl Session {
    pub fn from_auth(response: AuthResponse, username: &str) -> Self {
        Self {
            access_token: response.access_token,
            username: username.to_string(),
            coins: response.user.coins,
            tickets: response.user.tickets,
            login_streak: response.user.login_streak,
            farming_id: response.user.farming_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmingRecord {
    #[serde(default)]
    pub id: String,
    pub end_time: DateTime<Utc>,
}

impl FarmingRecord {
    /// Local, human-readable completion time.
    pub fn end_time_display(&self) -> String {
        self.end_time
            .with_timezone(&Local)
            .format("%B %-d, %Y at %-I:%M %p (UTC%:z)")
            .to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmingResponse {
    pub farming_id: String,
    pub farming: FarmingRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Initial,
    CompletedClaimed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reward_coins: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub template: TaskTemplate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IpResponse {
    pub ip: String,
}
