//! Review session: comment mutations for one version.
//!
//! Every mutation runs the same gauntlet before touching the store:
//! authenticated viewer, then version unlocked, then input validation. Any
//! failure short-circuits with nothing applied. On success the session
//! re-fetches the version's comments and replaces its local set wholesale;
//! there is no optimistic merge, so the last re-fetch wins.
//!
//! While a store call is in flight [`ReviewSession::pending`] is non-zero,
//! letting a host show the action as pending rather than done.

#[cfg(test)]
#[path = "review_test.rs"]
mod review_test;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::comment::{
    Comment, CommentId, CommentSet, Counts, NewComment, VersionId, Viewer, ViewerRole, Visibility,
};
use crate::composer::Composer;
use crate::error::{ReviewError, StoreFailure};
use crate::store::CommentStore;

pub struct ReviewSession<S> {
    version_id: VersionId,
    viewer: Option<Viewer>,
    locked: AtomicBool,
    store: S,
    comments: RwLock<CommentSet>,
    pending: AtomicUsize,
}

/// Counts an in-flight store call for as long as it lives.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S: CommentStore> ReviewSession<S> {
    /// A session with no comments loaded; call [`Self::refresh`] to load.
    /// `viewer` is `None` for an unauthenticated visitor.
    pub fn new(store: S, version_id: VersionId, viewer: Option<Viewer>) -> Self {
        Self {
            version_id,
            viewer,
            locked: AtomicBool::new(false),
            store,
            comments: RwLock::new(CommentSet::default()),
            pending: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn version_id(&self) -> VersionId {
        self.version_id
    }

    #[must_use]
    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mirror the version's lock flag from the proof lifecycle.
    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Number of store calls currently in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    // --- Views ---

    fn role(&self) -> ViewerRole {
        self.viewer.as_ref().map_or(ViewerRole::External, |v| v.role)
    }

    /// The comments this viewer may see. Unauthenticated visitors get the
    /// external view.
    pub async fn visible(&self) -> CommentSet {
        self.comments.read().await.visible_to(self.role())
    }

    pub async fn pin_number(&self, id: &CommentId) -> Option<usize> {
        self.visible().await.pin_number(id)
    }

    pub async fn counts(&self) -> Counts {
        self.visible().await.counts()
    }

    // --- Loading ---

    /// Fetch the version's comments and replace the local set.
    ///
    /// # Errors
    ///
    /// [`ReviewError::Persistence`] if the fetch fails; the local set is
    /// left as it was.
    pub async fn refresh(&self) -> Result<(), ReviewError> {
        let fetched = {
            let _pending = PendingGuard::enter(&self.pending);
            self.store.fetch_comments(self.version_id).await
        };
        match fetched {
            Ok(comments) => {
                let count = comments.len();
                *self.comments.write().await = CommentSet::new(comments);
                info!(version_id = %self.version_id, count, "review: comments fetched");
                Ok(())
            }
            Err(e) => {
                warn!(version_id = %self.version_id, error = %e, "review: fetch failed");
                Err(e.into())
            }
        }
    }

    /// Re-fetch after a successful mutation. The mutation already landed, so
    /// a failed re-fetch is logged and the stale set kept.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            warn!(version_id = %self.version_id, error = %e, "review: refetch after mutation failed");
        }
    }

    // --- Guards ---

    fn authorize(&self, action: &'static str) -> Result<&Viewer, ReviewError> {
        let Some(viewer) = self.viewer.as_ref() else {
            warn!(version_id = %self.version_id, action, "review: refused, not authenticated");
            return Err(ReviewError::NotAuthenticated);
        };
        if self.is_locked() {
            warn!(version_id = %self.version_id, action, viewer = %viewer.id, "review: refused, version locked");
            return Err(ReviewError::Locked(self.version_id));
        }
        Ok(viewer)
    }

    fn visibility_for(viewer: &Viewer, requested: Visibility) -> Visibility {
        match viewer.role {
            ViewerRole::Internal => requested,
            ViewerRole::External => Visibility::External,
        }
    }

    // --- Mutations ---

    /// Post the composer's draft as a root comment, anchored at its pending
    /// pin and video timestamp. The composer is reset only on success, so a
    /// failed submit keeps the draft and pin for a retry.
    ///
    /// # Errors
    ///
    /// [`ReviewError::NotAuthenticated`], [`ReviewError::Locked`],
    /// [`ReviewError::EmptyContent`] or [`ReviewError::Persistence`].
    pub async fn add_root_comment(
        &self,
        composer: &mut Composer,
        visibility: Visibility,
    ) -> Result<Comment, ReviewError> {
        let viewer = self.authorize("add_root_comment")?;
        if composer.is_blank() {
            return Err(ReviewError::EmptyContent);
        }

        let pin = composer.pin();
        let new = NewComment {
            version_id: self.version_id,
            author_id: viewer.id,
            author_name: viewer.display_name.clone(),
            content: composer.to_html(),
            pos_x: pin.map(|p| p.x),
            pos_y: pin.map(|p| p.y),
            video_timestamp: composer.video_timestamp(),
            parent_id: None,
            visibility: Self::visibility_for(viewer, visibility),
        };
        let created = self.create(new).await?;
        composer.reset();
        info!(
            version_id = %self.version_id,
            comment_id = %created.id,
            pinned = created.pin_position().is_some(),
            "review: comment created"
        );
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Reply to the root `parent_id` with the composer's draft. Any pin or
    /// timestamp on the composer is ignored: replies carry no anchor.
    ///
    /// # Errors
    ///
    /// [`ReviewError::NotAuthenticated`], [`ReviewError::Locked`],
    /// [`ReviewError::EmptyContent`], [`ReviewError::InvalidParent`] when the
    /// parent is unknown to this viewer, [`ReviewError::ParentNotRoot`] when
    /// it is itself a reply, or [`ReviewError::Persistence`].
    pub async fn add_reply(
        &self,
        parent_id: CommentId,
        composer: &mut Composer,
        visibility: Visibility,
    ) -> Result<Comment, ReviewError> {
        let viewer = self.authorize("add_reply")?;
        if composer.is_blank() {
            return Err(ReviewError::EmptyContent);
        }
        match self.visible().await.get(&parent_id) {
            None => return Err(ReviewError::InvalidParent(parent_id)),
            Some(parent) if !parent.is_root() => return Err(ReviewError::ParentNotRoot(parent_id)),
            Some(_) => {}
        }

        let new = NewComment {
            version_id: self.version_id,
            author_id: viewer.id,
            author_name: viewer.display_name.clone(),
            content: composer.to_html(),
            pos_x: None,
            pos_y: None,
            video_timestamp: None,
            parent_id: Some(parent_id),
            visibility: Self::visibility_for(viewer, visibility),
        };
        let created = self.create(new).await?;
        composer.reset();
        info!(version_id = %self.version_id, comment_id = %created.id, %parent_id, "review: reply created");
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Mark `id` resolved. Its `created_at`, and so its pin number, is
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`ReviewError::NotAuthenticated`], [`ReviewError::Locked`],
    /// [`ReviewError::NotFound`] or [`ReviewError::Persistence`].
    pub async fn resolve(&self, id: CommentId) -> Result<(), ReviewError> {
        self.authorize("resolve")?;
        self.require_visible(&id).await?;
        let result = {
            let _pending = PendingGuard::enter(&self.pending);
            self.store.resolve_comment(id).await
        };
        self.finish(result, id, "review: comment resolved").await
    }

    /// Mark `id` open again.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub async fn reopen(&self, id: CommentId) -> Result<(), ReviewError> {
        self.authorize("reopen")?;
        self.require_visible(&id).await?;
        let result = {
            let _pending = PendingGuard::enter(&self.pending);
            self.store.reopen_comment(id).await
        };
        self.finish(result, id, "review: comment reopened").await
    }

    /// Delete `id`. Deleting a root deletes its replies with it, in one store
    /// call.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub async fn delete(&self, id: CommentId) -> Result<(), ReviewError> {
        self.authorize("delete")?;
        let ids: Vec<CommentId> = {
            let comments = self.comments.read().await;
            let target = comments
                .visible_to(self.role())
                .get(&id)
                .cloned()
                .ok_or(ReviewError::NotFound(id))?;
            let mut ids = vec![id];
            if target.is_root() {
                ids.extend(comments.replies_to(&id).iter().map(|c| c.id));
            }
            ids
        };
        let result = {
            let _pending = PendingGuard::enter(&self.pending);
            self.store.delete_comments(&ids).await
        };
        self.finish(result, id, "review: comment deleted").await
    }

    async fn require_visible(&self, id: &CommentId) -> Result<(), ReviewError> {
        if self.visible().await.get(id).is_some() {
            Ok(())
        } else {
            Err(ReviewError::NotFound(*id))
        }
    }

    async fn create(&self, new: NewComment) -> Result<Comment, ReviewError> {
        let result = {
            let _pending = PendingGuard::enter(&self.pending);
            self.store.create_comment(new).await
        };
        result.map_err(|e| {
            warn!(version_id = %self.version_id, error = %e, "review: create failed");
            ReviewError::from(e)
        })
    }

    async fn finish(
        &self,
        result: Result<(), StoreFailure>,
        id: CommentId,
        what: &'static str,
    ) -> Result<(), ReviewError> {
        match result {
            Ok(()) => {
                info!(version_id = %self.version_id, comment_id = %id, "{what}");
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                warn!(version_id = %self.version_id, comment_id = %id, error = %e, "review: store call failed");
                Err(e.into())
            }
        }
    }
}
