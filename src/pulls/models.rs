//! Raw API payload types for pull requests.
//!
//! These mirror the as-received remote representation before mapping into
//! [`PullRequestRecord`](super::PullRequestRecord). Optional fields stay
//! optional; the record derives its view from whatever is present.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// As-received pull request payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// HTML URL identifying the pull request.
    pub html_url: String,
    /// State string as reported by the API (`open` or `closed`).
    pub state: Option<String>,
    /// Whether the pull request has been merged.
    #[serde(default)]
    pub merged: bool,
    /// Body text.
    pub body: Option<String>,
    /// Author account.
    pub user: Option<RawAccount>,
    /// Assignee account.
    pub assignee: Option<RawAccount>,
    /// Label objects attached to the pull request.
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Head ref sub-object.
    pub head: Option<RawRef>,
    /// Base ref sub-object.
    pub base: Option<RawRef>,
}

/// As-received account sub-object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawAccount {
    /// Login name.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Profile URL.
    pub html_url: Option<String>,
}

/// As-received label sub-object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLabel {
    /// Label name.
    pub name: String,
}

/// As-received ref sub-object for head/base.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRef {
    /// Qualified label, e.g. `octo:feature-branch`.
    pub label: Option<String>,
    /// Branch name.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit id the ref points at.
    pub sha: String,
}
