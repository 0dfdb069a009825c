//! Title-filtered search across groups and phone numbers.
//!
//! Both orchestrations run strictly sequentially and isolate failures: a
//! group whose history cannot be fetched becomes a failure record in the
//! results, and a number whose listing fails becomes an entry in the error
//! list, never an abort of the whole run.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::client::ChatApi;
use crate::error::RemoteError;
use crate::history::fetch_all_messages;
use crate::models::{
    Group, GroupFailure, GroupFetch, GroupHistory, GroupInfo, NumberError, SearchOutcome,
    SearchReport,
};

/// Case-insensitive substring match on a group's display name. Groups with
/// no name never match.
pub fn title_matches(name: Option<&str>, term: &str) -> bool {
    match name {
        Some(name) => name.to_lowercase().contains(&term.to_lowercase()),
        None => false,
    }
}

/// Aggregate one group's history into a result record, downgrading failure
/// to a classified entry instead of an error.
async fn fetch_group_history(
    api: &dyn ChatApi,
    phone_number: Option<&str>,
    group: &Group,
    max_pages: u32,
) -> GroupFetch {
    info!(group_uuid = %group.uuid, group_name = ?group.name, "fetching group history");
    match fetch_all_messages(api, &group.uuid, max_pages).await {
        Ok(messages) => GroupFetch::Success(GroupHistory {
            phone_number: phone_number.map(str::to_string),
            group: GroupInfo::from(group),
            messages_count: messages.len(),
            messages,
        }),
        Err(err) => {
            warn!(group_uuid = %group.uuid, error = %err, "group history failed");
            GroupFetch::Failure(GroupFailure {
                phone_number: phone_number.map(str::to_string),
                group: GroupInfo::from(group),
                error: err.to_string(),
                error_type: err.kind,
            })
        }
    }
}

/// Search one number's groups by title and fetch history for every match.
///
/// A listing failure is this call's failure; per-group fetch failures are
/// isolated into the result list.
pub async fn search_number(
    api: &dyn ChatApi,
    phone_number: &str,
    group_title: &str,
    max_pages: u32,
) -> Result<SearchOutcome, RemoteError> {
    let groups = api.list_groups(phone_number).await?;
    let matching: Vec<Group> = groups
        .into_iter()
        .filter(|g| title_matches(g.name.as_deref(), group_title))
        .collect();

    debug!(phone_number, matches = matching.len(), "title filter applied");

    let mut results = Vec::with_capacity(matching.len());
    for group in &matching {
        results.push(fetch_group_history(api, None, group, max_pages).await);
    }

    Ok(SearchOutcome {
        phone_number: phone_number.to_string(),
        search_term: group_title.to_string(),
        matching_groups_count: matching.len(),
        results,
    })
}

/// Search a list of phone numbers, optionally filtered by group title.
///
/// Duplicate numbers are processed once, in first-occurrence order. Numbers
/// with no matching groups are skipped silently; numbers whose listing fails
/// are recorded in the report's error list. The run always completes.
pub async fn search_numbers(
    api: &dyn ChatApi,
    phone_numbers: &[String],
    group_title: Option<&str>,
    max_pages: u32,
) -> SearchReport {
    let unique = dedupe_preserving_order(phone_numbers);
    info!(numbers = unique.len(), title = ?group_title, "starting batch search");

    let mut results: Vec<GroupFetch> = Vec::new();
    let mut errors: Vec<NumberError> = Vec::new();

    for phone_number in &unique {
        let groups = match api.list_groups(phone_number).await {
            Ok(groups) => groups,
            Err(err) => {
                warn!(phone_number, error = %err, "group listing failed");
                errors.push(NumberError {
                    phone_number: phone_number.clone(),
                    error: err.to_string(),
                    error_type: err.kind,
                });
                continue;
            }
        };

        let matching: Vec<&Group> = groups
            .iter()
            .filter(|g| match group_title {
                Some(term) => title_matches(g.name.as_deref(), term),
                None => true,
            })
            .collect();

        if matching.is_empty() {
            debug!(phone_number, "no matching groups");
            continue;
        }

        for group in matching {
            results.push(fetch_group_history(api, Some(phone_number), group, max_pages).await);
        }
    }

    info!(
        groups = results.len(),
        failed_numbers = errors.len(),
        "batch search complete"
    );

    SearchReport {
        search_type: "all_numbers".to_string(),
        numbers_searched: unique.len(),
        numbers_with_errors: errors.len(),
        group_title: group_title.unwrap_or("all groups").to_string(),
        matching_groups_count: results.len(),
        results,
        errors,
    }
}

fn dedupe_preserving_order(numbers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    numbers
        .iter()
        .filter(|n| seen.insert(n.as_str()))
        .cloned()
        .collect()
}
