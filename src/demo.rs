//! Canned search result used by the demo endpoint, so the UI and consumers
//! can be exercised without credentials or remote calls.

use crate::models::{
    GroupFetch, GroupHistory, GroupInfo, Message, MessageBody, Participant, SearchOutcome,
};

fn demo_message(id: &str, text: &str, created_at: &str, phone: &str, pushname: &str) -> Message {
    Message {
        id: id.to_string(),
        message: MessageBody {
            text: Some(text.to_string()),
            media: None,
        },
        created_at: Some(created_at.to_string()),
        sent_by: Some("user".to_string()),
        participant: Some(Participant {
            phone_number: Some(phone.to_string()),
            pushname: Some(pushname.to_string()),
        }),
    }
}

/// Two demo groups with a handful of messages, shaped exactly like a real
/// search response.
pub fn demo_search_outcome() -> SearchOutcome {
    let family_messages = vec![
        demo_message(
            "MSG-1",
            "Hello everyone! How's everyone doing today?",
            "2025-01-03T14:19:28",
            "+17131112222",
            "John Doe",
        ),
        demo_message(
            "MSG-2",
            "I'm doing great! Thanks for asking.",
            "2025-01-03T14:20:15",
            "+17131113333",
            "Jane Smith",
        ),
        demo_message(
            "MSG-3",
            "Don't forget about the family dinner this weekend!",
            "2025-01-03T14:21:00",
            "+17131114444",
            "Mom",
        ),
    ];

    let work_messages = vec![
        demo_message(
            "MSG-4",
            "Good morning team! Let's start the weekly standup.",
            "2025-01-03T09:00:00",
            "+17131115555",
            "Team Lead",
        ),
        demo_message(
            "MSG-5",
            "I'll be presenting the Q4 results today.",
            "2025-01-03T09:01:30",
            "+17131116666",
            "Analyst",
        ),
    ];

    let results = vec![
        GroupFetch::Success(GroupHistory {
            phone_number: None,
            group: GroupInfo {
                uuid: "WAG-demo-group-1".to_string(),
                name: Some("Demo Family Group".to_string()),
                subject: Some("Family chat and updates".to_string()),
                size: 8,
                created_at: Some("2024-01-15T10:30:00Z".to_string()),
            },
            messages_count: family_messages.len(),
            messages: family_messages,
        }),
        GroupFetch::Success(GroupHistory {
            phone_number: None,
            group: GroupInfo {
                uuid: "WAG-demo-group-2".to_string(),
                name: Some("Work Team Demo".to_string()),
                subject: Some("Project updates and collaboration".to_string()),
                size: 12,
                created_at: Some("2024-02-20T09:15:00Z".to_string()),
            },
            messages_count: work_messages.len(),
            messages: work_messages,
        }),
    ];

    SearchOutcome {
        phone_number: "+1234567890".to_string(),
        search_term: "demo".to_string(),
        matching_groups_count: results.len(),
        results,
    }
}
