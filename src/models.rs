//! Wire types for the 2Chat API plus the shapes this service answers with.
//!
//! Wire structs keep the remote's field names via `#[serde(rename)]` so that
//! payloads round-trip unchanged; our own response shapes use camelCase keys.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// A WhatsApp group as the remote reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub uuid: String,
    #[serde(rename = "wa_group_name", default)]
    pub name: Option<String>,
    #[serde(rename = "wa_subject", default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub size: u32,
    #[serde(rename = "wa_created_at", default)]
    pub created_at: Option<String>,
}

/// One message in a group's history. Timestamps are passed through as the
/// remote sends them (no timezone guarantee, so no datetime parsing here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub message: MessageBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<Participant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub pushname: Option<String>,
}

/// One page of a group's history. Consumed immediately by the aggregator.
#[derive(Debug, Clone)]
pub struct Page {
    pub page_number: u32,
    pub messages: Vec<Message>,
}

/// Group metadata as we project it into results.
#[derive(Debug, Clone, Serialize)]
pub struct GroupInfo {
    pub uuid: String,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub size: u32,
    pub created_at: Option<String>,
}

impl From<&Group> for GroupInfo {
    fn from(group: &Group) -> Self {
        Self {
            uuid: group.uuid.clone(),
            name: group.name.clone(),
            subject: group.subject.clone(),
            size: group.size,
            created_at: group.created_at.clone(),
        }
    }
}

/// Outcome of aggregating one group's history: either the messages or a
/// classified error, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupFetch {
    Success(GroupHistory),
    Failure(GroupFailure),
}

impl GroupFetch {
    pub fn group(&self) -> &GroupInfo {
        match self {
            Self::Success(h) => &h.group,
            Self::Failure(f) => &f.group,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub group: GroupInfo,
    pub messages_count: usize,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub group: GroupInfo,
    pub error: String,
    pub error_type: ErrorKind,
}

/// Result of a single-number title search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub phone_number: String,
    pub search_term: String,
    pub matching_groups_count: usize,
    pub results: Vec<GroupFetch>,
}

/// A phone number whose group listing failed outright during a batch search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberError {
    pub phone_number: String,
    pub error: String,
    pub error_type: ErrorKind,
}

/// Combined result of searching every configured number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub search_type: String,
    pub numbers_searched: usize,
    pub numbers_with_errors: usize,
    pub group_title: String,
    pub matching_groups_count: usize,
    pub results: Vec<GroupFetch>,
    pub errors: Vec<NumberError>,
}

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("phone pattern is valid"));

/// International-format check (`+` then 2-15 digits, first digit nonzero),
/// enforced at every entry point before any remote call.
pub fn is_valid_phone_number(input: &str) -> bool {
    PHONE_RE.is_match(input)
}
