#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pitchtalk::{ApiRequest, ApiResponse, Clock, Method, PitchtalkError, Transport};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const ALICE: &str = "query_id=AAH&user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Alice%22%2C%22username%22%3A%22alice%22%7D&auth_date=1700000000&hash=deadbeef";
pub const BOB: &str = "query_id=AAB&user=%7B%22id%22%3A7%2C%22username%22%3A%22bob%22%7D&hash=cafe";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
    pub telegram_hash: String,
}

/// In-memory transport. Responses are queued per `"GET path"` key; the
/// last queued response repeats once the queue is down to one.
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, PitchtalkError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    ip: Option<Result<String, PitchtalkError>>,
}

fn key(method: Method, path: &str) -> String {
    match method {
        Method::Get => format!("GET {path}"),
        Method::Post => format!("POST {path}"),
    }
}

impl ScriptedTransport {
    pub fn direct() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            ip: None,
        }
    }

    pub fn proxied(ip: Result<String, PitchtalkError>) -> Self {
        Self {
            ip: Some(ip),
            ..Self::direct()
        }
    }

    pub fn on(self, method: Method, path: &str, response: Result<Value, PitchtalkError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(key(method, path))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| key(c.method, &c.path))
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        let wanted = key(method, path);
        self.paths().iter().filter(|p| **p == wanted).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest<'_>) -> Result<ApiResponse, PitchtalkError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            token: request.token.map(str::to_string),
            telegram_hash: request.telegram_hash.to_string(),
        });

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(&key(request.method, &request.path))
            .ok_or_else(|| PitchtalkError::transport(&request.path, "no scripted response"))?;
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        let body = next.ok_or_else(|| PitchtalkError::transport(&request.path, "script exhausted"))??;
        Ok(ApiResponse { status: 200, body })
    }

    async fn resolve_ip(&self) -> Result<String, PitchtalkError> {
        self.ip.clone().unwrap_or_else(|| Ok("direct".to_string()))
    }

    fn is_proxied(&self) -> bool {
        self.ip.is_some()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn now() -> DateTime<Utc> {
    "2024-10-01T12:00:00Z".parse().unwrap()
}

pub fn auth_ok(farming_id: Option<&str>) -> Result<Value, PitchtalkError> {
    Ok(json!({
        "accessToken": "token-1",
        "user": { "coins": 1200, "tickets": 4, "loginStreak": 3, "farmingId": farming_id }
    }))
}

pub fn farming(id: &str, end: DateTime<Utc>) -> Result<Value, PitchtalkError> {
    Ok(json!({ "id": id, "endTime": end.to_rfc3339() }))
}

pub fn created(id: &str, end: DateTime<Utc>) -> Result<Value, PitchtalkError> {
    Ok(json!({ "farmingId": id, "farming": { "id": id, "endTime": end.to_rfc3339() } }))
}

pub fn in_hours(hours: i64) -> DateTime<Utc> {
    now() + Duration::hours(hours)
}

pub fn task(id: &str, status: &str, title: &str, reward: i64) -> Value {
    json!({ "id": id, "status": status, "template": { "title": title, "rewardCoins": reward } })
}

pub fn http_500(path: &str) -> PitchtalkError {
    PitchtalkError::unexpected(path, 500, "Internal Server Error")
}
