use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ErrorKind, RemoteError};
use crate::models::{Group, Message, Page};

const API_KEY_HEADER: &str = "X-User-API-Key";

/// The two remote operations everything else is built on. Implemented by
/// [`TwoChatClient`] for production and by scripted fakes in tests.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// List all WhatsApp groups visible to a phone number. The caller is
    /// expected to have validated the number already.
    async fn list_groups(&self, phone_number: &str) -> Result<Vec<Group>, RemoteError>;

    /// Fetch one page of a group's message history.
    async fn fetch_message_page(
        &self,
        group_uuid: &str,
        page_number: u32,
    ) -> Result<Page, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct GroupsEnvelope {
    success: bool,
    #[serde(default)]
    data: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct MessagesEnvelope {
    success: bool,
    #[serde(default)]
    page_number: u32,
    #[serde(default)]
    messages: Vec<Message>,
}

/// HTTP client for the 2Chat open API.
pub struct TwoChatClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl TwoChatClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            client,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, RemoteError> {
        self.client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(RemoteError::transport)
    }
}

#[async_trait]
impl ChatApi for TwoChatClient {
    async fn list_groups(&self, phone_number: &str) -> Result<Vec<Group>, RemoteError> {
        let url = format!("{}/whatsapp/groups/{}", self.base_url, phone_number);
        debug!(phone_number, "listing groups");

        let response = self.get(&url).await?;
        let status = response.status().as_u16();
        debug!(phone_number, status, "group listing response");

        if !response.status().is_success() {
            return Err(RemoteError::new(
                ErrorKind::from_status(status),
                Some(status),
                group_listing_error(status, phone_number),
            ));
        }

        let envelope: GroupsEnvelope = response.json().await.map_err(RemoteError::transport)?;
        if !envelope.success {
            return Err(RemoteError::protocol(format!(
                "group listing for {phone_number} returned success: false"
            )));
        }

        Ok(envelope.data)
    }

    async fn fetch_message_page(
        &self,
        group_uuid: &str,
        page_number: u32,
    ) -> Result<Page, RemoteError> {
        let url = format!(
            "{}/whatsapp/groups/messages/{}?page_number={}",
            self.base_url, group_uuid, page_number
        );
        debug!(group_uuid, page_number, "fetching message page");

        let response = self.get(&url).await?;
        let status = response.status().as_u16();
        debug!(group_uuid, page_number, status, "message page response");

        if !response.status().is_success() {
            // 422 here means the UUID is invalid or the caller cannot read
            // this group's messages: terminal for the group, not transient.
            let kind = if status == 422 {
                ErrorKind::AccessDenied
            } else {
                ErrorKind::from_status(status)
            };
            let message = message_page_error(status, group_uuid);
            warn!(group_uuid, page_number, status, %message, "message page fetch failed");
            return Err(RemoteError::new(kind, Some(status), message));
        }

        let envelope: MessagesEnvelope = response.json().await.map_err(RemoteError::transport)?;
        if !envelope.success {
            return Err(RemoteError::protocol(format!(
                "message page {page_number} for group {group_uuid} returned success: false"
            )));
        }

        debug!(
            group_uuid,
            page_number = envelope.page_number,
            count = envelope.messages.len(),
            "fetched message page"
        );
        Ok(Page {
            page_number: envelope.page_number,
            messages: envelope.messages,
        })
    }
}

fn group_listing_error(status: u16, phone_number: &str) -> String {
    match status {
        401 => "Authentication failed (401): check your API key".to_string(),
        403 => format!("Access denied (403): no permission to list groups for {phone_number}"),
        404 => format!("Not found (404): no groups known for {phone_number}"),
        422 => format!("Invalid request (422): the phone number '{phone_number}' was rejected"),
        _ => format!("Group listing for {phone_number} failed with status {status}"),
    }
}

fn message_page_error(status: u16, group_uuid: &str) -> String {
    match status {
        401 => "Authentication failed (401): check your API key".to_string(),
        403 => "Access denied (403): no permission to access this group's messages".to_string(),
        404 => format!("Group not found (404): the group UUID '{group_uuid}' does not exist"),
        422 => format!(
            "Invalid request (422): the group UUID '{group_uuid}' may be invalid or you may not \
             have access to this group's messages"
        ),
        _ => format!("Message fetch for group {group_uuid} failed with status {status}"),
    }
}
