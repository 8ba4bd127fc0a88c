//! HTTP implementation of the people lookup

use super::traits::{BackendError, PeopleDirectory, PersonRecord};
use crate::config::BackendSettings;
use crate::greeting::PersonName;
use crate::network::HttpClient;
use crate::person::{rejection_message, PersonUpdate};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// People records over `GET <backend>/get_info?first_name=..&last_name=..`
/// and `POST <backend>/set_info`
pub struct HttpPeopleDirectory {
    client: HttpClient,
    url: String,
    update_url: String,
}

impl HttpPeopleDirectory {
    pub fn new(client: HttpClient, url: impl Into<String>, update_url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            update_url: update_url.into(),
        }
    }

    /// Build from backend settings
    pub fn from_settings(client: HttpClient, settings: &BackendSettings) -> anyhow::Result<Self> {
        Ok(Self::new(
            client,
            settings.info_url()?.to_string(),
            settings.update_url()?.to_string(),
        ))
    }
}

#[async_trait]
impl PeopleDirectory for HttpPeopleDirectory {
    async fn lookup(&self, name: &PersonName) -> Result<PersonRecord, BackendError> {
        let params = [
            ("first_name", name.first.as_str()),
            ("last_name", name.last.as_str()),
        ];

        let response = self
            .client
            .get_with_params(&self.url, &params)
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(BackendError::Status(response.status));
        }

        if response.is_json() {
            let value = response
                .json()
                .map_err(|e| BackendError::Malformed(e.to_string()))?;
            Ok(PersonRecord::Json(value))
        } else {
            Ok(PersonRecord::Text(response.text))
        }
    }

    async fn update(&self, update: &PersonUpdate) -> Result<Value, BackendError> {
        let response = self
            .client
            .post_json(&self.update_url, update)
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Person update answered {}", response.status);

        // Rejections carry `error` / `hint` in a JSON body when they carry anything.
        let body = response.json::<Value>().ok();
        if !response.is_success() {
            return Err(BackendError::Rejected {
                status: response.status,
                message: rejection_message(body.as_ref(), response.status),
            });
        }

        Ok(body.unwrap_or(Value::Null))
    }
}
