//! Book catalogue and bookstore lookups. Both are cached in the key-value
//! store for `ClientConfig::cache_ttl_secs`.

use shelfmate_types::models::Bookstore;
use shelfmate_types::{Book, Failure, Page, ValidationFailure};
use std::sync::Arc;

use super::{cached, page_query};
use crate::endpoints;
use crate::http::ApiClient;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct BooksApi {
    client: Arc<ApiClient>,
    cache: Arc<KeyValueStore>,
}

impl BooksApi {
    pub fn new(client: Arc<ApiClient>, cache: Arc<KeyValueStore>) -> Self {
        Self { client, cache }
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<Page<Book>, Failure> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationFailure::field("query", "must not be empty").into());
        }
        let mut params = page_query(page);
        params.push(("q", query.to_string()));
        Ok(self.client.get(endpoints::BOOKS, &params).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Book, Failure> {
        let client = &self.client;
        let ttl = client.config().cache_ttl_secs;
        cached(&self.cache, &format!("book:{id}"), ttl, || async move {
            client
                .get(&endpoints::book(id), &[])
                .await
                .map_err(|e| e.into_failure_for("book", id))
        })
        .await
    }
}

/// A bookstore with its distance from the search origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyBookstore {
    pub store: Bookstore,
    pub distance_km: f64,
}

#[derive(Clone)]
pub struct BookstoresApi {
    client: Arc<ApiClient>,
    cache: Arc<KeyValueStore>,
}

impl BookstoresApi {
    pub fn new(client: Arc<ApiClient>, cache: Arc<KeyValueStore>) -> Self {
        Self { client, cache }
    }

    /// Stores within `radius_km` of the given point, nearest first.
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<NearbyBookstore>, Failure> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationFailure::field("latitude", "must be between -90 and 90").into());
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationFailure::field("longitude", "must be between -180 and 180").into());
        }
        if radius_km <= 0.0 || !radius_km.is_finite() {
            return Err(ValidationFailure::field("radius_km", "must be positive").into());
        }

        // Two decimals is roughly 1 km, close enough to share cached results.
        let key = format!("bookstores:{latitude:.2}:{longitude:.2}:{radius_km:.0}");
        let client = &self.client;
        let ttl = client.config().cache_ttl_secs;
        let stores: Vec<Bookstore> = cached(&self.cache, &key, ttl, || async move {
            let params = [
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("radius_km", radius_km.to_string()),
            ];
            Ok(client.get(endpoints::BOOKSTORES, &params).await?)
        })
        .await?;

        Ok(rank_by_distance(stores, latitude, longitude, radius_km))
    }
}

fn rank_by_distance(
    stores: Vec<Bookstore>,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Vec<NearbyBookstore> {
    let mut nearby: Vec<NearbyBookstore> = stores
        .into_iter()
        .map(|store| {
            let distance_km = store.distance_km(latitude, longitude);
            NearbyBookstore { store, distance_km }
        })
        .filter(|n| n.distance_km <= radius_km)
        .collect();
    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: &str, latitude: f64, longitude: f64) -> Bookstore {
        Bookstore {
            id: id.to_string(),
            name: id.to_string(),
            address: String::new(),
            city: None,
            latitude,
            longitude,
            website: None,
            phone: None,
            opening_hours: None,
        }
    }

    #[test]
    fn test_rank_by_distance() {
        let stores = vec![
            store("far", 52.52, 13.405),
            store("near", 48.86, 2.35),
            store("mid", 48.90, 2.40),
        ];
        let ranked = rank_by_distance(stores, 48.8566, 2.3522, 50.0);
        let ids: Vec<&str> = ranked.iter().map(|n| n.store.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
        assert!(ranked[0].distance_km <= ranked[1].distance_km);
    }
}
