//! Guestbook collaborator: the remote comments API, payload normalization,
//! and the optimistic sync state the Messages app renders.

pub mod client;
pub mod memory;
pub mod model;
pub mod sync;

pub use client::{CommentsApi, HttpCommentsApi, OWNER_SECRET_HEADER};
pub use memory::MemoryCommentsApi;
pub use model::{Comment, NewComment};
pub use sync::{
    GuestbookSync, InlineSpawner, Spawner, StatusKind, StatusMessage, SyncUpdate, ThreadSpawner,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuestbookError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("owner secret was rejected (status {0})")]
    Rejected(u16),
    #[error("comment not found")]
    NotFound,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
