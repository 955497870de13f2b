//! Comment model: threaded feedback records and their derived views.
//!
//! A comment is either a root (no parent) or a reply to a root; nesting is
//! exactly one level deep. Roots may carry a spatial pin (`pos_x`/`pos_y`,
//! percentages of the rendered surface) and/or a video timestamp. Replies
//! never carry their own pin.
//!
//! Pin numbers are not stored. [`CommentSet::pin_number`] recomputes them on
//! every call from the pinned roots ordered by `created_at`, so deleting an
//! earlier pin renumbers every later one.

#[cfg(test)]
#[path = "comment_test.rs"]
mod comment_test;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::composer;
use crate::surface::PinPosition;

pub type CommentId = Uuid;
pub type VersionId = Uuid;
pub type UserId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Open,
    Resolved,
}

/// Who may see a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Team members only.
    Internal,
    /// Also shown to external reviewers (clients).
    External,
}

/// Whether the person looking at the proof belongs to the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRole {
    Internal,
    External,
}

/// The authenticated person acting on a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub display_name: String,
    pub role: ViewerRole,
}

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub version_id: VersionId,
    pub author_id: UserId,
    pub author_name: String,
    /// Sanitized HTML.
    pub content: String,
    /// Milliseconds since the Unix epoch, assigned by the store.
    pub created_at: i64,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
    pub video_timestamp: Option<f64>,
    pub status: CommentStatus,
    pub parent_id: Option<CommentId>,
    pub visibility: Visibility,
}

impl Comment {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The spatial anchor, present only on a root with both coordinates.
    #[must_use]
    pub fn pin_position(&self) -> Option<PinPosition> {
        if !self.is_root() {
            return None;
        }
        match (self.pos_x, self.pos_y) {
            (Some(x), Some(y)) => Some(PinPosition { x, y }),
            _ => None,
        }
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        composer::plain_text(&self.content)
    }
}

/// A comment as submitted to the store, before it has an id or timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub version_id: VersionId,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
    pub video_timestamp: Option<f64>,
    pub parent_id: Option<CommentId>,
    pub visibility: Visibility,
}

/// Status restriction for [`CommentSet::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Resolved,
}

impl StatusFilter {
    fn admits(self, status: CommentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Open => status == CommentStatus::Open,
            Self::Resolved => status == CommentStatus::Resolved,
        }
    }
}

/// Ordering of root comments in [`CommentSet::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest first.
    #[default]
    Date,
    /// Open before resolved, newest first within each.
    Status,
    /// Author name (case-insensitive), oldest first within an author.
    Author,
}

/// A root comment with its replies, as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread<'a> {
    pub root: &'a Comment,
    /// Oldest first.
    pub replies: Vec<&'a Comment>,
    /// Derived pin number, when the root is pinned.
    pub pin: Option<usize>,
}

/// Open/resolved totals over root comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub open: usize,
    pub resolved: usize,
}

/// The comments of one version, as last fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentSet {
    comments: Vec<Comment>,
}

impl CommentSet {
    #[must_use]
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.is_root())
    }

    /// Replies to `root_id`, oldest first.
    #[must_use]
    pub fn replies_to(&self, root_id: &CommentId) -> Vec<&Comment> {
        let mut replies: Vec<&Comment> = self.comments.iter().filter(|c| c.parent_id == Some(*root_id)).collect();
        replies.sort_by(|a, b| by_created(a, b));
        replies
    }

    /// Pinned roots in pin order.
    #[must_use]
    pub fn pins(&self) -> Vec<&Comment> {
        let mut pinned: Vec<&Comment> = self.roots().filter(|c| c.pin_position().is_some()).collect();
        pinned.sort_by(|a, b| by_created(a, b));
        pinned
    }

    /// 1-based pin number of `id`, or `None` if it is not a pinned root.
    #[must_use]
    pub fn pin_number(&self, id: &CommentId) -> Option<usize> {
        self.pins().iter().position(|c| c.id == *id).map(|i| i + 1)
    }

    #[must_use]
    pub fn counts(&self) -> Counts {
        self.roots().fold(Counts::default(), |mut acc, c| {
            match c.status {
                CommentStatus::Open => acc.open += 1,
                CommentStatus::Resolved => acc.resolved += 1,
            }
            acc
        })
    }

    /// The subset `role` may see. External viewers get external roots, and
    /// replies that are external under an external root.
    #[must_use]
    pub fn visible_to(&self, role: ViewerRole) -> CommentSet {
        if role == ViewerRole::Internal {
            return self.clone();
        }
        let external_root = |id: &CommentId| {
            self.get(id)
                .is_some_and(|root| root.is_root() && root.visibility == Visibility::External)
        };
        let comments = self
            .comments
            .iter()
            .filter(|c| {
                c.visibility == Visibility::External && c.parent_id.as_ref().is_none_or(external_root)
            })
            .cloned()
            .collect();
        CommentSet { comments }
    }

    /// Threads whose root matches `status` and `query`, sorted by `sort`.
    ///
    /// `query` is a case-insensitive substring tested against the root's
    /// plain-text content and author name; blank matches everything. Pin
    /// numbers are taken from the whole set, so filtering never renumbers.
    #[must_use]
    pub fn filter(&self, status: StatusFilter, query: Option<&str>, sort: SortBy) -> Vec<Thread<'_>> {
        let needle = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);
        let pins = self.pins();

        let mut roots: Vec<&Comment> = self
            .roots()
            .filter(|c| status.admits(c.status))
            .filter(|c| {
                needle.as_ref().is_none_or(|n| {
                    c.plain_text().to_lowercase().contains(n.as_str()) || c.author_name.to_lowercase().contains(n.as_str())
                })
            })
            .collect();

        roots.sort_by(|a, b| match sort {
            SortBy::Date => by_created(b, a),
            SortBy::Status => status_rank(a.status).cmp(&status_rank(b.status)).then_with(|| by_created(b, a)),
            SortBy::Author => a
                .author_name
                .to_lowercase()
                .cmp(&b.author_name.to_lowercase())
                .then_with(|| by_created(a, b)),
        });

        roots
            .into_iter()
            .map(|root| Thread {
                root,
                replies: self.replies_to(&root.id),
                pin: pins.iter().position(|p| p.id == root.id).map(|i| i + 1),
            })
            .collect()
    }
}

fn by_created(a: &Comment, b: &Comment) -> Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
}

fn status_rank(status: CommentStatus) -> u8 {
    match status {
        CommentStatus::Open => 0,
        CommentStatus::Resolved => 1,
    }
}

/// Render a playback position as `m:ss`, or `h:mm:ss` from one hour on.
#[must_use]
pub fn format_timestamp(secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = if secs.is_finite() && secs > 0.0 { secs.floor() as u64 } else { 0 };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 { format!("{h}:{m:02}:{s:02}") } else { format!("{m}:{s:02}") }
}
