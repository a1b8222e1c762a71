//! Service layer. Every operation takes the store and the acting user
//! explicitly and knows nothing about HTTP.

pub mod attendance;
pub mod employees;
pub mod finance;
pub mod reports;
pub mod requests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::notify::MailtoLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    Approved,
    Rejected,
}

/// Outcome of a submission: the assigned id and whether it was queued for a
/// decision or committed directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[schema(example = "EMP1001")]
    pub id: String,
    pub queued: bool,
    #[schema(example = "pending")]
    pub status: String,
}

/// A decided record plus the email the client may open for the requester.
#[derive(Debug, Clone, Serialize)]
pub struct Decided<T> {
    pub record: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<MailtoLink>,
}

/// Sorts by `key` descending; records without a timestamp go last.
pub(crate) fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> Option<DateTime<Utc>>) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

pub(crate) fn clean_comments(comments: Option<String>) -> Option<String> {
    crate::model::non_blank(comments)
}
