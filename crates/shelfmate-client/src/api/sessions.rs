//! `/reading-sessions` endpoints.

use async_trait::async_trait;
use shelfmate_types::models::{NewReadingSession, ReadingSessionUpdate};
use shelfmate_types::{Failure, Page, ReadingSession};
use std::sync::Arc;
use uuid::Uuid;

use super::page_query;
use crate::endpoints;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::session::{PendingOperation, SessionSink};

#[derive(Clone)]
pub struct SessionsApi {
    client: Arc<ApiClient>,
}

impl SessionsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, session: &NewReadingSession) -> Result<ReadingSession, Failure> {
        Ok(self.client.post(endpoints::READING_SESSIONS, session).await?)
    }

    pub async fn update(
        &self,
        id: &Uuid,
        update: &ReadingSessionUpdate,
    ) -> Result<ReadingSession, Failure> {
        self.client
            .patch(&endpoints::reading_session(id), update)
            .await
            .map_err(|e| e.into_failure_for("reading session", &id.to_string()))
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), Failure> {
        self.client
            .delete(&endpoints::reading_session(id))
            .await
            .map_err(|e| e.into_failure_for("reading session", &id.to_string()))
    }

    /// History, newest first, optionally for one book.
    pub async fn list(&self, book_id: Option<&str>, page: u32) -> Result<Page<ReadingSession>, Failure> {
        let mut params = page_query(page);
        if let Some(book_id) = book_id {
            params.push(("book_id", book_id.to_string()));
        }
        Ok(self.client.get(endpoints::READING_SESSIONS, &params).await?)
    }
}

/// Replays queued operations. Any 2xx counts as delivered; the reply body is
/// not read, since the local copy is already authoritative.
#[async_trait]
impl SessionSink for SessionsApi {
    async fn apply(&self, op: &PendingOperation) -> Result<(), Failure> {
        match op {
            PendingOperation::Create { session } => {
                match self.client.post_empty(endpoints::READING_SESSIONS, &session.to_new()).await {
                    // Replayed create: the server already has this id.
                    Ok(()) | Err(ClientError::Conflict { .. }) => Ok(()),
                    Err(e) => Err(e.into()),
                }
            },
            PendingOperation::Update { session } => self
                .client
                .patch_empty(&endpoints::reading_session(&session.id), &session.to_update())
                .await
                .map_err(|e| e.into_failure_for("reading session", &session.id.to_string())),
            PendingOperation::Delete { id } => {
                match self.client.delete(&endpoints::reading_session(id)).await {
                    Ok(()) | Err(ClientError::NotFound { .. }) => Ok(()),
                    Err(e) => Err(e.into_failure_for("reading session", &id.to_string())),
                }
            },
        }
    }
}
