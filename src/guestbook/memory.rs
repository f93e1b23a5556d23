use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::GuestbookError;
use super::client::{CommentsApi, error_for_status};
use super::model::{Comment, NewComment};

#[derive(Debug, Default)]
struct MemoryState {
    comments: Vec<Comment>,
    next_id: u64,
    owner_secret: Option<String>,
    list_failure: Option<u16>,
    delete_failure: Option<u16>,
    unlisted: BTreeSet<String>,
}

/// In-process comment store. Backs `--offline` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryCommentsApi {
    state: Mutex<MemoryState>,
}

impl MemoryCommentsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept owner posts and deletes carrying `secret`.
    pub fn with_owner_secret(self, secret: impl Into<String>) -> Self {
        self.state().owner_secret = Some(secret.into());
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        self.state().comments = comments;
        self
    }

    /// Make every list call fail with `status` until cleared.
    pub fn fail_lists_with(&self, status: Option<u16>) {
        self.state().list_failure = status;
    }

    /// Make every delete call fail with `status` until cleared.
    pub fn fail_deletes_with(&self, status: Option<u16>) {
        self.state().delete_failure = status;
    }

    /// Keep a stored comment out of list responses, as a lagging replica
    /// would.
    pub fn unlist(&self, id: &str) {
        self.state().unlisted.insert(id.to_string());
    }

    pub fn relist(&self, id: &str) {
        self.state().unlisted.remove(id);
    }

    pub fn stored(&self) -> Vec<Comment> {
        self.state().comments.clone()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CommentsApi for MemoryCommentsApi {
    fn list(&self) -> Result<Vec<Comment>, GuestbookError> {
        let state = self.state();
        if let Some(status) = state.list_failure {
            return Err(GuestbookError::Status(status));
        }
        Ok(state
            .comments
            .iter()
            .filter(|comment| !state.unlisted.contains(&comment.id))
            .cloned()
            .collect())
    }

    fn create(&self, comment: &NewComment, secret: Option<&str>) -> Result<Comment, GuestbookError> {
        let mut state = self.state();
        let is_owner = match secret {
            Some(secret) if state.owner_secret.as_deref() == Some(secret) => true,
            Some(_) => return Err(GuestbookError::Rejected(403)),
            None => false,
        };
        state.next_id += 1;
        let created = Comment {
            id: state.next_id.to_string(),
            name: comment.name.clone(),
            text: comment.message.clone(),
            is_owner,
            created_at: Utc::now().to_rfc3339(),
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    fn delete(&self, id: &str, secret: &str) -> Result<(), GuestbookError> {
        let mut state = self.state();
        if let Some(status) = state.delete_failure {
            return Err(error_for_status(status));
        }
        if state.owner_secret.as_deref() != Some(secret) {
            return Err(GuestbookError::Rejected(401));
        }
        let before = state.comments.len();
        state.comments.retain(|comment| comment.id != id);
        if state.comments.len() == before {
            return Err(GuestbookError::NotFound);
        }
        Ok(())
    }
}
