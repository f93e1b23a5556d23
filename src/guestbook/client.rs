use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde_json::Value;

use super::GuestbookError;
use super::model::{Comment, NewComment, normalize_comment, normalize_comments};

/// Header carrying the owner's shared secret.
pub const OWNER_SECRET_HEADER: &str = "X-Owner-Secret";

/// The remote comment store. Implementations block; callers run them off
/// the UI thread.
pub trait CommentsApi: Send + Sync {
    fn list(&self) -> Result<Vec<Comment>, GuestbookError>;
    fn create(&self, comment: &NewComment, secret: Option<&str>) -> Result<Comment, GuestbookError>;
    fn delete(&self, id: &str, secret: &str) -> Result<(), GuestbookError>;
}

/// `CommentsApi` over HTTP: `{base}/api/comments`.
#[derive(Debug, Clone)]
pub struct HttpCommentsApi {
    client: Client,
    endpoint: String,
}

impl HttpCommentsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GuestbookError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: comments_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn comments_endpoint(base_url: &str) -> String {
    format!("{}/api/comments", base_url.trim_end_matches('/'))
}

/// `{endpoint}/{id}` with `id` escaped as a single path segment.
fn comment_url(endpoint: &str, id: &str) -> Result<Url, GuestbookError> {
    let mut url = Url::parse(endpoint).map_err(|err| GuestbookError::InvalidUrl(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| GuestbookError::InvalidUrl(endpoint.to_string()))?
        .pop_if_empty()
        .push(id);
    Ok(url)
}

pub(crate) fn error_for_status(code: u16) -> GuestbookError {
    match code {
        code @ (401 | 403) => GuestbookError::Rejected(code),
        404 => GuestbookError::NotFound,
        code => GuestbookError::Status(code),
    }
}

fn ensure_success(response: Response) -> Result<Response, GuestbookError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(error_for_status(status.as_u16()))
    }
}

impl CommentsApi for HttpCommentsApi {
    fn list(&self) -> Result<Vec<Comment>, GuestbookError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching comments");
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GuestbookError::Status(status.as_u16()));
        }
        let payload: Value = response.json()?;
        normalize_comments(&payload)
    }

    fn create(&self, comment: &NewComment, secret: Option<&str>) -> Result<Comment, GuestbookError> {
        let mut request = self.client.post(&self.endpoint).json(comment);
        if let Some(secret) = secret {
            request = request.header(OWNER_SECRET_HEADER, secret);
        }
        let response = ensure_success(request.send()?)?;
        let payload: Value = response.json()?;
        normalize_comment(&payload)
            .ok_or_else(|| GuestbookError::InvalidPayload("created comment is malformed".into()))
    }

    fn delete(&self, id: &str, secret: &str) -> Result<(), GuestbookError> {
        let url = comment_url(&self.endpoint, id)?;
        let response = self
            .client
            .delete(url)
            .header(OWNER_SECRET_HEADER, secret)
            .send()?;
        ensure_success(response).map(|_| ())
    }
}
