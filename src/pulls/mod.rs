//! Pull request data model.
//!
//! A [`PullRequestRecord`] is a mutable projection of a remote pull
//! request's fields into local memory. It is constructed and refreshed by an
//! external fetch layer whenever new raw API data arrives; it makes no
//! network calls itself and holds no locks.

pub mod models;
pub mod record;

pub use models::{RawAccount, RawLabel, RawPullRequest, RawRef};
pub use record::{GitRef, PullRequestRecord, PullRequestState};
