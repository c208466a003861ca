//! Quotes, reviews and the activity feed.

use shelfmate_types::models::{NewQuote, NewReview};
use shelfmate_types::{Failure, FeedItem, Page, Quote, Review, ValidationFailure};
use std::sync::Arc;
use validator::Validate;

use super::page_query;
use crate::endpoints;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct QuotesApi {
    client: Arc<ApiClient>,
}

impl QuotesApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, book_id: Option<&str>, page: u32) -> Result<Page<Quote>, Failure> {
        let mut params = page_query(page);
        if let Some(book_id) = book_id {
            params.push(("book_id", book_id.to_string()));
        }
        Ok(self.client.get(endpoints::QUOTES, &params).await?)
    }

    pub async fn create(&self, quote: &NewQuote) -> Result<Quote, Failure> {
        quote.validate()?;
        Ok(self.client.post(endpoints::QUOTES, quote).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), Failure> {
        self.client.delete(&endpoints::quote(id)).await.map_err(|e| e.into_failure_for("quote", id))
    }
}

#[derive(Clone)]
pub struct ReviewsApi {
    client: Arc<ApiClient>,
}

impl ReviewsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_for_book(&self, book_id: &str, page: u32) -> Result<Page<Review>, Failure> {
        if book_id.is_empty() {
            return Err(ValidationFailure::field("book_id", "must not be empty").into());
        }
        let mut params = page_query(page);
        params.push(("book_id", book_id.to_string()));
        Ok(self.client.get(endpoints::REVIEWS, &params).await?)
    }

    /// A second review of the same book is reported by the server as a
    /// conflict.
    pub async fn create(&self, review: &NewReview) -> Result<Review, Failure> {
        review.validate()?;
        Ok(self.client.post(endpoints::REVIEWS, review).await?)
    }
}

#[derive(Clone)]
pub struct FeedApi {
    client: Arc<ApiClient>,
}

impl FeedApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn page(&self, page: u32) -> Result<Page<FeedItem>, Failure> {
        Ok(self.client.get(endpoints::FEED, &page_query(page)).await?)
    }
}
