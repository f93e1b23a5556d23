use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;
use term_desk::guestbook::model::normalize_comment;
use term_desk::guestbook::{
    Comment, CommentsApi, GuestbookError, GuestbookSync, InlineSpawner, MemoryCommentsApi,
    NewComment, Spawner, StatusKind, SyncUpdate,
};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Holds jobs until the test releases them, to model slow responses.
#[derive(Default)]
struct ManualSpawner {
    jobs: Mutex<Vec<Job>>,
}

impl ManualSpawner {
    fn run_all(&self) -> usize {
        let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }
}

impl Spawner for ManualSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

fn mounted(api: Arc<MemoryCommentsApi>) -> GuestbookSync {
    let mut sync = GuestbookSync::new(api, Arc::new(InlineSpawner));
    sync.mount();
    sync.poll();
    sync
}

fn texts(sync: &GuestbookSync) -> Vec<String> {
    sync.comments()
        .into_iter()
        .filter(|comment| !comment.is_welcome())
        .map(|comment| format!("{}: {}", comment.name, comment.text))
        .collect()
}

fn seed(api: &MemoryCommentsApi, name: &str, message: &str) -> String {
    api.create(&NewComment::new(name, message).unwrap(), None)
        .unwrap()
        .id
}

#[test]
fn posted_comment_appears_once_and_survives_refetch() {
    let api = Arc::new(MemoryCommentsApi::new());
    let mut sync = mounted(api.clone());
    assert!(sync.submit("A", "hi", None));
    sync.poll();
    assert_eq!(texts(&sync), vec!["A: hi"]);

    sync.refresh();
    assert_eq!(sync.poll(), vec![SyncUpdate::Loaded(1)]);
    assert_eq!(texts(&sync), vec!["A: hi"]);
}

#[test]
fn session_comment_is_kept_while_server_lags() {
    let api = Arc::new(MemoryCommentsApi::new());
    let mut sync = mounted(api.clone());
    sync.submit("A", "hi", None);
    sync.poll();
    let id = api.stored()[0].id.clone();

    api.unlist(&id);
    sync.refresh();
    sync.poll();
    assert_eq!(texts(&sync), vec!["A: hi"]);

    api.relist(&id);
    seed(&api, "B", "later");
    sync.refresh();
    sync.poll();
    assert_eq!(texts(&sync), vec!["A: hi", "B: later"]);
}

#[test]
fn delete_that_finds_nothing_still_removes_locally() {
    let api = Arc::new(MemoryCommentsApi::new().with_owner_secret("k"));
    let id = seed(&api, "B", "bye");
    let mut sync = mounted(api.clone());
    api.fail_deletes_with(Some(404));
    assert!(sync.delete(&id, "k".into()));
    assert_eq!(sync.poll(), vec![SyncUpdate::Deleted(id.clone())]);
    assert!(texts(&sync).is_empty());
}

#[test]
fn server_error_on_delete_tombstones_and_warns() {
    let api = Arc::new(MemoryCommentsApi::new().with_owner_secret("k"));
    let id = seed(&api, "B", "bye");
    let mut sync = mounted(api.clone());
    api.fail_deletes_with(Some(500));
    sync.delete(&id, "k".into());
    assert_eq!(sync.poll(), vec![SyncUpdate::Tombstoned(id.clone())]);
    assert!(sync.is_tombstoned(&id));
    assert_eq!(sync.status().map(|status| status.kind), Some(StatusKind::Warning));
    assert!(texts(&sync).is_empty());

    // The comment is still on the server, but stays hidden.
    sync.refresh();
    sync.poll();
    assert_eq!(api.stored().len(), 1);
    assert!(texts(&sync).is_empty());
}

#[test]
fn rejected_secret_keeps_the_comment() {
    let api = Arc::new(MemoryCommentsApi::new().with_owner_secret("k"));
    let id = seed(&api, "B", "bye");
    let mut sync = mounted(api.clone());
    sync.delete(&id, "wrong".into());
    assert_eq!(sync.poll(), vec![SyncUpdate::DeleteRejected(id)]);
    assert_eq!(texts(&sync), vec!["B: bye"]);
    assert_eq!(sync.status().map(|status| status.kind), Some(StatusKind::Error));
}

#[test]
fn response_after_unmount_is_discarded() {
    let api = Arc::new(MemoryCommentsApi::new());
    seed(&api, "B", "early");
    let spawner = Arc::new(ManualSpawner::default());
    let mut sync = GuestbookSync::new(api.clone(), spawner.clone());

    sync.mount();
    assert!(sync.is_loading());
    sync.unmount();
    assert_eq!(spawner.run_all(), 1);
    assert!(sync.poll().is_empty());
    assert!(texts(&sync).is_empty());

    sync.mount();
    assert_eq!(spawner.run_all(), 1);
    assert_eq!(sync.poll(), vec![SyncUpdate::Loaded(1)]);
    assert_eq!(texts(&sync), vec!["B: early"]);
}

#[test]
fn late_post_after_remount_is_not_applied() {
    let api = Arc::new(MemoryCommentsApi::new());
    let spawner = Arc::new(ManualSpawner::default());
    let mut sync = GuestbookSync::new(api.clone(), spawner.clone());
    sync.mount();
    spawner.run_all();
    sync.poll();

    sync.submit("A", "slow", None);
    sync.unmount();
    sync.mount();
    // The stale post and the fresh fetch both run now; only the fetch lands.
    assert_eq!(spawner.run_all(), 2);
    let updates = sync.poll();
    assert_eq!(updates.len(), 1);
    assert!(matches!(updates[0], SyncUpdate::Loaded(_)));
    assert!(!sync.is_submitting());
}

/// Server that stores comments in the plain wire shape, with no owner flag.
#[derive(Default)]
struct EchoApi {
    stored: Mutex<Vec<serde_json::Value>>,
}

impl CommentsApi for EchoApi {
    fn list(&self) -> Result<Vec<Comment>, GuestbookError> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .filter_map(normalize_comment)
            .collect())
    }

    fn create(&self, comment: &NewComment, _secret: Option<&str>) -> Result<Comment, GuestbookError> {
        let mut stored = self.stored.lock().unwrap();
        let payload = json!({
            "id": stored.len() + 1,
            "name": comment.name,
            "message": comment.message,
            "created_at": "2024-01-09T09:41:00Z",
        });
        stored.push(payload.clone());
        normalize_comment(&payload)
            .ok_or_else(|| GuestbookError::InvalidPayload("echo payload".into()))
    }

    fn delete(&self, _id: &str, _secret: &str) -> Result<(), GuestbookError> {
        Ok(())
    }
}

#[test]
fn owner_post_stays_owner_when_server_omits_the_flag() {
    let mut sync = GuestbookSync::new(Arc::new(EchoApi::default()), Arc::new(InlineSpawner));
    sync.mount();
    sync.poll();
    assert!(sync.submit("Owner", "welcome aboard", Some("k".into())));
    assert!(sync.comments().iter().any(|c| c.id == "pending-1" && c.is_owner));

    sync.poll();
    let posted: Vec<Comment> = sync.comments().into_iter().filter(|c| !c.is_welcome()).collect();
    assert_eq!(posted.len(), 1);
    assert!(posted[0].is_owner);
    assert_eq!(sync.visitor_count(), 0);

    sync.refresh();
    sync.poll();
    assert!(sync.comments().iter().all(|c| c.is_owner));
    assert_eq!(sync.visitor_count(), 0);

    sync.submit("Guest", "hello", None);
    sync.poll();
    assert_eq!(sync.visitor_count(), 1);
}
