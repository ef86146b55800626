//! Mutable local projection of one remote pull request.

use chrono::{DateTime, Utc};
use url::Url;

use super::models::{RawPullRequest, RawRef};
use crate::config::HubcredConfig;

/// Lifecycle state of a pull request.
///
/// Merged takes precedence over closed: a closed pull request whose raw
/// `merged` flag is set maps to [`Merged`](Self::Merged).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    /// The pull request is open.
    Open,
    /// The pull request was closed without merging.
    Closed,
    /// The pull request was merged.
    Merged,
}

/// A git ref derived from the raw head/base sub-objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRef {
    /// Qualified label, e.g. `octo:feature-branch`.
    pub label: Option<String>,
    /// Branch name.
    pub ref_name: String,
    /// Commit id the ref points at.
    pub sha: String,
}

impl From<&RawRef> for GitRef {
    fn from(raw: &RawRef) -> Self {
        Self {
            label: raw.label.clone(),
            ref_name: raw.ref_name.clone(),
            sha: raw.sha.clone(),
        }
    }
}

/// A focused, mutable view over one remote pull request's current known
/// state, safe to reconstruct from repeated fetches.
///
/// Identity is `(number, url)`; content mutations never affect equality.
#[derive(Debug, Clone)]
pub struct PullRequestRecord {
    /// Pull request number.
    pub number: u64,
    /// Title, when known.
    pub title: Option<String>,
    /// HTML URL identifying the pull request.
    pub url: String,
    /// Derived lifecycle state.
    pub state: PullRequestState,
    /// Author login.
    pub author: Option<String>,
    /// Assignee login.
    pub assignee: Option<String>,
    /// Flat list of label names.
    pub labels: Vec<String>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Head ref.
    pub head: Option<GitRef>,
    /// Base ref.
    pub base: Option<GitRef>,
    raw: Option<RawPullRequest>,
}

impl PullRequestRecord {
    /// Creates a record from an initial raw payload.
    #[must_use]
    pub fn from_raw(raw: RawPullRequest) -> Self {
        let mut record = Self::detached(raw.number, raw.html_url.clone());
        record.update(raw);
        record
    }

    /// Creates a record with no raw payload attached yet.
    ///
    /// Payload-derived accessors return `None` until [`update`](Self::update)
    /// runs.
    #[must_use]
    pub const fn detached(number: u64, url: String) -> Self {
        Self {
            number,
            title: None,
            url,
            state: PullRequestState::Open,
            author: None,
            assignee: None,
            labels: Vec::new(),
            created_at: None,
            updated_at: None,
            head: None,
            base: None,
            raw: None,
        }
    }

    /// Re-derives every field from fresher raw data.
    ///
    /// Total over well-formed input: all mirrored fields are remapped,
    /// including the merged-over-closed state precedence and the flattening
    /// of label objects into names.
    pub fn update(&mut self, raw: RawPullRequest) {
        self.number = raw.number;
        self.title = raw.title.clone();
        self.url = raw.html_url.clone();
        self.state = derive_state(raw.state.as_deref(), raw.merged);
        self.author = raw.user.as_ref().map(|user| user.login.clone());
        self.assignee = raw.assignee.as_ref().map(|user| user.login.clone());
        self.labels = raw.labels.iter().map(|label| label.name.clone()).collect();
        self.created_at = raw.created_at;
        self.updated_at = raw.updated_at;
        self.head = raw.head.as_ref().map(GitRef::from);
        self.base = raw.base.as_ref().map(GitRef::from);
        self.raw = Some(raw);
    }

    /// Returns true while the pull request is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, PullRequestState::Open)
    }

    /// Returns true once the pull request has been merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self.state, PullRequestState::Merged)
    }

    /// Body text from the raw payload, absent until a payload is attached.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.raw.as_ref().and_then(|raw| raw.body.as_deref())
    }

    /// Author avatar URL from the raw payload.
    #[must_use]
    pub fn user_avatar(&self) -> Option<&str> {
        self.raw
            .as_ref()
            .and_then(|raw| raw.user.as_ref())
            .and_then(|user| user.avatar_url.as_deref())
    }

    /// Author avatar URL with a size query parameter appended.
    ///
    /// The size parameter is spliced into the string form rather than added
    /// through the query API: gravatar-style avatar URLs embed an already
    /// encoded query, and re-encoding would corrupt it.
    #[must_use]
    pub fn user_avatar_uri(&self, size: u32) -> Option<Url> {
        let avatar = self.user_avatar()?;
        let separator = if avatar.contains('?') { '&' } else { '?' };
        Url::parse(&format!("{avatar}{separator}s={size}")).ok()
    }

    /// Author avatar URL sized from the configured avatar size.
    #[must_use]
    pub fn configured_avatar_uri(&self, config: &HubcredConfig) -> Option<Url> {
        self.user_avatar_uri(config.avatar_size)
    }
}

impl PartialEq for PullRequestRecord {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.url == other.url
    }
}

impl Eq for PullRequestRecord {}

fn derive_state(state: Option<&str>, merged: bool) -> PullRequestState {
    match state {
        Some(value) if value.eq_ignore_ascii_case("open") => PullRequestState::Open,
        _ if merged => PullRequestState::Merged,
        _ => PullRequestState::Closed,
    }
}
