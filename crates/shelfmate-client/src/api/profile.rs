//! `/me` endpoints.

use shelfmate_types::models::{LibraryEntryUpdate, ProfileUpdate, UserStats};
use shelfmate_types::{Failure, LibraryEntry, ReadingStatus, User};
use std::sync::Arc;
use validator::Validate;

use crate::endpoints;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct ProfileApi {
    client: Arc<ApiClient>,
}

impl ProfileApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<User, Failure> {
        Ok(self.client.get(endpoints::ME, &[]).await?)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, Failure> {
        update.validate()?;
        Ok(self.client.patch(endpoints::ME, update).await?)
    }

    pub async fn stats(&self) -> Result<UserStats, Failure> {
        Ok(self.client.get(endpoints::ME_STATS, &[]).await?)
    }

    /// Shelf contents, optionally filtered by status.
    pub async fn library(&self, status: Option<ReadingStatus>) -> Result<Vec<LibraryEntry>, Failure> {
        let query: Vec<(&str, String)> =
            status.map(|s| vec![("status", s.to_string())]).unwrap_or_default();
        Ok(self.client.get(endpoints::ME_LIBRARY, &query).await?)
    }

    pub async fn update_library_entry(
        &self,
        book_id: &str,
        update: &LibraryEntryUpdate,
    ) -> Result<LibraryEntry, Failure> {
        if update.rating.is_some_and(|r| !(1..=5).contains(&r)) {
            return Err(shelfmate_types::ValidationFailure::field("rating", "must be between 1 and 5")
                .into());
        }
        self.client
            .patch(&endpoints::library_entry(book_id), update)
            .await
            .map_err(|e| e.into_failure_for("book", book_id))
    }
}
