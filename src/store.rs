//! Persistence collaborator contract and an in-memory implementation.
//!
//! The review session never assumes partial success: each call either
//! succeeds or returns an opaque [`StoreFailure`] reason.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::comment::{Comment, CommentId, CommentStatus, NewComment, VersionId};
use crate::error::StoreFailure;

// =============================================================================
// CONTRACT
// =============================================================================

#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment and return it with its id and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the comment could not be saved.
    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreFailure>;

    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the comment is unknown or the write fails.
    async fn resolve_comment(&self, id: CommentId) -> Result<(), StoreFailure>;

    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the comment is unknown or the write fails.
    async fn reopen_comment(&self, id: CommentId) -> Result<(), StoreFailure>;

    /// Delete every comment in `ids` as one unit.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the delete fails; nothing is removed.
    async fn delete_comments(&self, ids: &[CommentId]) -> Result<(), StoreFailure>;

    /// All comments on a version, in creation order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreFailure`] if the read fails.
    async fn fetch_comments(&self, version_id: VersionId) -> Result<Vec<Comment>, StoreFailure>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Process-local store. `created_at` is wall-clock milliseconds, bumped so
/// it is strictly increasing across every comment this store creates.
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    comments: Vec<Comment>,
    last_created_at: i64,
}

impl InMemoryCommentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records, e.g. loaded from elsewhere.
    #[must_use]
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let last_created_at = comments.iter().map(|c| c.created_at).max().unwrap_or(0);
        Self { state: Mutex::new(MemoryState { comments, last_created_at }) }
    }

    async fn set_status(&self, id: CommentId, status: CommentStatus) -> Result<(), StoreFailure> {
        let mut state = self.state.lock().await;
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreFailure(format!("comment {id} not found")))?;
        comment.status = status;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreFailure> {
        let mut state = self.state.lock().await;
        let created_at = now_ms().max(state.last_created_at + 1);
        state.last_created_at = created_at;

        let comment = Comment {
            id: Uuid::new_v4(),
            version_id: new.version_id,
            author_id: new.author_id,
            author_name: new.author_name,
            content: new.content,
            created_at,
            pos_x: new.pos_x,
            pos_y: new.pos_y,
            video_timestamp: new.video_timestamp,
            status: CommentStatus::Open,
            parent_id: new.parent_id,
            visibility: new.visibility,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn resolve_comment(&self, id: CommentId) -> Result<(), StoreFailure> {
        self.set_status(id, CommentStatus::Resolved).await
    }

    async fn reopen_comment(&self, id: CommentId) -> Result<(), StoreFailure> {
        self.set_status(id, CommentStatus::Open).await
    }

    async fn delete_comments(&self, ids: &[CommentId]) -> Result<(), StoreFailure> {
        let mut state = self.state.lock().await;
        state.comments.retain(|c| !ids.contains(&c.id));
        Ok(())
    }

    async fn fetch_comments(&self, version_id: VersionId) -> Result<Vec<Comment>, StoreFailure> {
        let state = self.state.lock().await;
        let mut comments: Vec<Comment> = state.comments.iter().filter(|c| c.version_id == version_id).cloned().collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
