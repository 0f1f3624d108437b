//! Typed PitchTalk API operations for one account.

use crate::credential::Credential;
use crate::error::PitchtalkError;
use crate::models::{
    AuthRequest, AuthResponse, CreateFarmingResponse, FarmingRecord, Session, Task,
};
use crate::transport::{ApiRequest, Transport};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub const AUTH_PATH: &str = "auth";
pub const CREATE_FARMING_PATH: &str = "users/create-farming";
pub const FARMINGS_PATH: &str = "farmings";
pub const CLAIM_FARMING_PATH: &str = "users/claim-farming";
pub const TASKS_PATH: &str = "tasks";
pub const VERIFY_TASKS_PATH: &str = "tasks/verify";

pub fn start_task_path(task_id: &str) -> String {
    format!("tasks/{task_id}/start")
}

/// Binds a transport to one account's credential.
pub struct PitchtalkApi<'a, T: Transport + ?Sized> {
    transport: &'a T,
    credential: &'a Credential,
}

impl<'a, T: Transport + ?Sized> PitchtalkApi<'a, T> {
    pub fn new(transport: &'a T, credential: &'a Credential) -> Self {
        Self {
            transport,
            credential,
        }
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest<'_>) -> Result<R, PitchtalkError> {
        let endpoint = request.path.clone();
        let response = self.transport.send(request).await?;
        serde_json::from_value(response.body).map_err(|e| {
            PitchtalkError::unexpected(endpoint, response.status, format!("unexpected body: {e}"))
        })
    }

    pub async fn authenticate(&self, referral_code: &str) -> Result<Session, PitchtalkError> {
        let cred = self.credential;
        let payload = AuthRequest {
            telegram_id: cred.telegram_id(),
            username: cred.username(),
            hash: cred.raw(),
            referral_code,
            photo_url: "",
        };
        let body = serde_json::to_value(&payload)
            .map_err(|e| PitchtalkError::transport(AUTH_PATH, e))?;

        let response: AuthResponse = self.call(ApiRequest::post(AUTH_PATH, body, cred.raw())).await?;
        Ok(Session::from_auth(response, cred.username()))
    }

    pub async fn create_farming(&self, session: &Session) -> Result<FarmingRecord, PitchtalkError> {
        let response: CreateFarmingResponse = self
            .call(ApiRequest::post(CREATE_FARMING_PATH, json!({}), self.credential.raw())
                .bearer(&session.access_token))
            .await?;
        let mut farming = response.farming;
        if farming.id.is_empty() {
            farming.id = response.farming_id;
        }
        Ok(farming)
    }

    pub async fn get_farming(&self, session: &Session) -> Result<FarmingRecord, PitchtalkError> {
        self.call(ApiRequest::get(FARMINGS_PATH, self.credential.raw()).bearer(&session.access_token))
            .await
    }

    /// The reward payload is passed through as-is.
    pub async fn claim_farming(&self, session: &Session) -> Result<Value, PitchtalkError> {
        self.call(ApiRequest::post(CLAIM_FARMING_PATH, json!({}), self.credential.raw())
            .bearer(&session.access_token))
            .await
    }

    pub async fn list_tasks(&self, session: &Session) -> Result<Vec<Task>, PitchtalkError> {
        self.call(ApiRequest::get(TASKS_PATH, self.credential.raw()).bearer(&session.access_token))
            .await
    }

    pub async fn start_task(&self, session: &Session, task_id: &str) -> Result<Value, PitchtalkError> {
        self.call(ApiRequest::post(start_task_path(task_id), json!({}), self.credential.raw())
            .bearer(&session.access_token))
            .await
    }

    pub async fn verify_tasks(&self, session: &Session) -> Result<Vec<Task>, PitchtalkError> {
        self.call(ApiRequest::get(VERIFY_TASKS_PATH, self.credential.raw()).bearer(&session.access_token))
            .await
    }
}
