//! Optimistic guestbook state reconciled against the remote list.
//!
//! Network calls run on worker threads and report back over a channel that
//! the UI thread drains with [`GuestbookSync::poll`]. Every mount gets a
//! fresh channel and "mounted" flag, so responses that arrive after an
//! unmount are dropped on both ends.

use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use chrono::Utc;

use super::GuestbookError;
use super::client::CommentsApi;
use super::model::{Comment, MAX_COMMENTS, NewComment};

/// Runs blocking collaborator calls off the UI thread.
pub trait Spawner: Send + Sync {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> io::Result<()>;
}

/// One short-lived named thread per request.
#[derive(Debug, Default)]
pub struct ThreadSpawner;

impl Spawner for ThreadSpawner {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> io::Result<()> {
        thread::Builder::new()
            .name("guestbook-io".into())
            .spawn(job)
            .map(|_| ())
    }
}

/// Runs the job on the calling thread. Its response still waits in the
/// channel until the next `poll`.
#[derive(Debug, Default)]
pub struct InlineSpawner;

impl Spawner for InlineSpawner {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) -> io::Result<()> {
        job();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// Inline message shown under the comment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// What a `poll` applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpdate {
    Loaded(usize),
    LoadFailed,
    Posted(Comment),
    PostFailed,
    Deleted(String),
    DeleteRejected(String),
    Tombstoned(String),
}

enum SyncEvent {
    Fetched(Result<Vec<Comment>, GuestbookError>),
    Posted {
        token: u64,
        result: Result<Comment, GuestbookError>,
    },
    Deleted {
        id: String,
        result: Result<(), GuestbookError>,
    },
}

struct Mount {
    flag: Arc<AtomicBool>,
    tx: Sender<SyncEvent>,
    rx: Receiver<SyncEvent>,
}

struct PendingPost {
    token: u64,
    comment: Comment,
}

pub struct GuestbookSync {
    api: Arc<dyn CommentsApi>,
    spawner: Arc<dyn Spawner>,
    welcome: Comment,
    remote: Vec<Comment>,
    /// Created this session but not yet seen in a fetched list.
    session_created: Vec<Comment>,
    pending: Vec<PendingPost>,
    /// Ids hidden locally after a delete the server may not have applied.
    tombstones: BTreeSet<String>,
    /// Ids the server accepted as owner posts this session.
    owner_posts: BTreeSet<String>,
    deleting: BTreeSet<String>,
    loading: bool,
    submitting: bool,
    status: Option<StatusMessage>,
    mount: Option<Mount>,
    next_token: u64,
}

impl GuestbookSync {
    pub fn new(api: Arc<dyn CommentsApi>, spawner: Arc<dyn Spawner>) -> Self {
        Self {
            api,
            spawner,
            welcome: Comment::welcome(),
            remote: Vec::new(),
            session_created: Vec::new(),
            pending: Vec::new(),
            tombstones: BTreeSet::new(),
            owner_posts: BTreeSet::new(),
            deleting: BTreeSet::new(),
            loading: false,
            submitting: false,
            status: None,
            mount: None,
            next_token: 0,
        }
    }

    /// Opens a fresh response channel and starts the initial fetch.
    pub fn mount(&mut self) {
        if self.mount.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.mount = Some(Mount {
            flag: Arc::new(AtomicBool::new(true)),
            tx,
            rx,
        });
        self.refresh();
    }

    /// Cancels outstanding work and resets the view state. Tombstones and
    /// owner posts live for the whole session.
    pub fn unmount(&mut self) {
        let Some(mount) = self.mount.take() else {
            return;
        };
        mount.flag.store(false, Ordering::Release);
        self.remote.clear();
        self.session_created.clear();
        self.pending.clear();
        self.deleting.clear();
        self.loading = false;
        self.submitting = false;
        self.status = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn refresh(&mut self) {
        if self.mount.is_none() || self.loading {
            return;
        }
        self.loading = true;
        self.status = None;
        let dispatched = self.dispatch(|api| SyncEvent::Fetched(api.list()));
        if !dispatched {
            self.loading = false;
            self.status = Some(StatusMessage::new(
                StatusKind::Error,
                "Couldn't start loading comments.",
            ));
        }
    }

    /// Posts a comment, showing it immediately as pending. Returns `false`
    /// when nothing was sent: blank message, a post already in flight, or
    /// not mounted.
    pub fn submit(&mut self, name: &str, message: &str, secret: Option<String>) -> bool {
        if self.mount.is_none() || self.submitting {
            return false;
        }
        let Some(body) = NewComment::new(name, message) else {
            return false;
        };
        self.next_token += 1;
        let token = self.next_token;
        self.pending.push(PendingPost {
            token,
            comment: Comment {
                id: format!("pending-{token}"),
                name: body.name.clone(),
                text: body.message.clone(),
                is_owner: secret.is_some(),
                created_at: Utc::now().to_rfc3339(),
            },
        });
        self.submitting = true;
        self.status = None;
        let dispatched = self.dispatch(move |api| SyncEvent::Posted {
            token,
            result: api.create(&body, secret.as_deref()),
        });
        if !dispatched {
            self.pending.retain(|pending| pending.token != token);
            self.submitting = false;
            self.status = Some(StatusMessage::new(
                StatusKind::Error,
                "Couldn't post your comment. Please try again shortly.",
            ));
        }
        dispatched
    }

    /// Asks the server to delete `id` with the owner secret. The welcome
    /// comment and pending entries cannot be deleted.
    pub fn delete(&mut self, id: &str, secret: String) -> bool {
        let deletable = self.visible_remote().any(|comment| comment.id == id);
        if self.mount.is_none() || !deletable || self.deleting.contains(id) {
            return false;
        }
        self.deleting.insert(id.to_string());
        let target = id.to_string();
        let dispatched = self.dispatch(move |api| SyncEvent::Deleted {
            result: api.delete(&target, &secret),
            id: target,
        });
        if !dispatched {
            self.deleting.remove(id);
            self.status = Some(StatusMessage::new(
                StatusKind::Error,
                "Couldn't start the delete request.",
            ));
        }
        dispatched
    }

    /// Applies every response that has arrived since the last call.
    pub fn poll(&mut self) -> Vec<SyncUpdate> {
        let Some(mount) = &self.mount else {
            return Vec::new();
        };
        let events: Vec<SyncEvent> = mount.rx.try_iter().collect();
        events.into_iter().map(|event| self.apply(event)).collect()
    }

    fn dispatch<F>(&self, job: F) -> bool
    where
        F: FnOnce(&dyn CommentsApi) -> SyncEvent + Send + 'static,
    {
        let Some(mount) = &self.mount else {
            return false;
        };
        let api = Arc::clone(&self.api);
        let flag = Arc::clone(&mount.flag);
        let tx = mount.tx.clone();
        let spawned = self.spawner.spawn(Box::new(move || {
            let event = job(api.as_ref());
            if flag.load(Ordering::Acquire) {
                let _ = tx.send(event);
            } else {
                tracing::debug!("discarding guestbook response after unmount");
            }
        }));
        match spawned {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to spawn guestbook worker");
                false
            }
        }
    }

    fn apply(&mut self, event: SyncEvent) -> SyncUpdate {
        match event {
            SyncEvent::Fetched(Ok(comments)) => {
                self.loading = false;
                let owner_posts = &self.owner_posts;
                self.remote = comments
                    .into_iter()
                    .filter(|comment| !self.tombstones.contains(&comment.id))
                    .map(|mut comment| {
                        comment.is_owner |= owner_posts.contains(&comment.id);
                        comment
                    })
                    .collect();
                let remote = &self.remote;
                self.session_created
                    .retain(|created| !remote.iter().any(|comment| comment.id == created.id));
                tracing::info!(count = self.remote.len(), "comments loaded");
                SyncUpdate::Loaded(self.remote.len())
            }
            SyncEvent::Fetched(Err(err)) => {
                tracing::warn!(error = %err, "failed to load comments");
                self.loading = false;
                self.remote.clear();
                self.session_created.clear();
                self.status = Some(StatusMessage::new(
                    StatusKind::Error,
                    "Couldn't load comments. Please try again shortly.",
                ));
                SyncUpdate::LoadFailed
            }
            SyncEvent::Posted { token, result } => {
                self.submitting = false;
                let was_owner = self
                    .pending
                    .iter()
                    .any(|pending| pending.token == token && pending.comment.is_owner);
                self.pending.retain(|pending| pending.token != token);
                match result {
                    Ok(mut comment) => {
                        // Servers that omit the owner flag still accepted the secret.
                        if was_owner {
                            comment.is_owner = true;
                            self.owner_posts.insert(comment.id.clone());
                        }
                        let known = self
                            .remote
                            .iter()
                            .chain(self.session_created.iter())
                            .any(|existing| existing.id == comment.id);
                        if !known {
                            self.session_created.push(comment.clone());
                        }
                        tracing::info!(comment_id = %comment.id, "comment posted");
                        SyncUpdate::Posted(comment)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to post comment");
                        let text = match err {
                            GuestbookError::Rejected(_) => "Owner secret was rejected.",
                            _ => "Couldn't post your comment. Please try again shortly.",
                        };
                        self.status = Some(StatusMessage::new(StatusKind::Error, text));
                        SyncUpdate::PostFailed
                    }
                }
            }
            SyncEvent::Deleted { id, result } => {
                self.deleting.remove(&id);
                match result {
                    Ok(()) | Err(GuestbookError::NotFound) => {
                        self.forget(&id);
                        tracing::info!(comment_id = %id, "comment deleted");
                        self.status = Some(StatusMessage::new(StatusKind::Info, "Comment deleted."));
                        SyncUpdate::Deleted(id)
                    }
                    // A rejected secret means the server refused outright, so
                    // the comment is kept visible rather than tombstoned.
                    Err(GuestbookError::Rejected(status)) => {
                        tracing::warn!(comment_id = %id, status, "delete rejected");
                        self.status = Some(StatusMessage::new(
                            StatusKind::Error,
                            "Owner secret was rejected; the comment was kept.",
                        ));
                        SyncUpdate::DeleteRejected(id)
                    }
                    Err(err) => {
                        tracing::warn!(comment_id = %id, error = %err, "delete failed; hiding locally");
                        self.forget(&id);
                        self.tombstones.insert(id.clone());
                        self.status = Some(StatusMessage::new(
                            StatusKind::Warning,
                            "Hidden here, but the server may not have deleted it.",
                        ));
                        SyncUpdate::Tombstoned(id)
                    }
                }
            }
        }
    }

    fn forget(&mut self, id: &str) {
        self.remote.retain(|comment| comment.id != id);
        self.session_created.retain(|comment| comment.id != id);
    }

    fn visible_remote(&self) -> impl Iterator<Item = &Comment> {
        let tombstones = &self.tombstones;
        let visible = self
            .remote
            .iter()
            .chain(self.session_created.iter())
            .filter(|comment| !tombstones.contains(&comment.id))
            .count();
        self.remote
            .iter()
            .chain(self.session_created.iter())
            .filter(move |comment| !tombstones.contains(&comment.id))
            .skip(visible.saturating_sub(MAX_COMMENTS))
    }

    /// The rendered list: welcome first, then the most recent remote and
    /// session comments, then pending posts.
    pub fn comments(&self) -> Vec<Comment> {
        std::iter::once(&self.welcome)
            .chain(self.visible_remote())
            .chain(self.pending.iter().map(|pending| &pending.comment))
            .cloned()
            .collect()
    }

    pub fn visitor_count(&self) -> usize {
        self.comments()
            .iter()
            .filter(|comment| !comment.is_owner)
            .count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.iter().any(|pending| pending.comment.id == id)
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_tombstoned(&self, id: &str) -> bool {
        self.tombstones.contains(id)
    }
}
