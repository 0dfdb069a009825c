//! Paginated history aggregation: walk a group's pages until the remote runs
//! out of messages or a page cap is hit, tolerating late-page failures.

use tracing::{debug, warn};

use crate::client::ChatApi;
use crate::error::RemoteError;
use crate::models::Message;

/// Fetch up to `max_pages` pages of a group's history, concatenated in fetch
/// order (page 0 first).
///
/// An empty page means the history is exhausted and stops the walk cleanly.
/// A failure on page 0 means the group is inaccessible and is returned as
/// this call's error; a failure on any later page keeps whatever was already
/// accumulated as a partial success, since the remote is assumed exhausted or
/// transiently unavailable past the first page.
pub async fn fetch_all_messages(
    api: &dyn ChatApi,
    group_uuid: &str,
    max_pages: u32,
) -> Result<Vec<Message>, RemoteError> {
    let mut all_messages = Vec::new();
    let mut page_number = 0;

    debug!(group_uuid, max_pages, "starting history fetch");

    while page_number < max_pages {
        match api.fetch_message_page(group_uuid, page_number).await {
            Ok(page) => {
                if page.messages.is_empty() {
                    debug!(group_uuid, page_number, "no more messages");
                    break;
                }
                all_messages.extend(page.messages);
                page_number += 1;
            }
            Err(err) if page_number == 0 => {
                warn!(group_uuid, error = %err, "first page failed, group inaccessible");
                return Err(err);
            }
            Err(err) => {
                warn!(
                    group_uuid,
                    page_number,
                    error = %err,
                    "page fetch failed, keeping partial history"
                );
                break;
            }
        }
    }

    debug!(
        group_uuid,
        pages_fetched = page_number,
        total = all_messages.len(),
        "history fetch complete"
    );
    Ok(all_messages)
}
