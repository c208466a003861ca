//! Physical bookstores.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A bookstore from `/bookstores`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookstore {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}

impl Bookstore {
    /// Great-circle distance to the given point (haversine).
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    fn store(latitude: f64, longitude: f64) -> Bookstore {
        Bookstore {
            id: "s1".to_string(),
            name: "Shakespeare and Company".to_string(),
            address: "37 Rue de la Bûcherie".to_string(),
            city: Some("Paris".to_string()),
            latitude,
            longitude,
            website: None,
            phone: None,
            opening_hours: None,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let s = store(48.8526, 2.3471);
        assert!(s.distance_km(48.8526, 2.3471) < 1e-9);
    }

    #[test]
    fn test_distance_paris_london() {
        let paris = store(48.8566, 2.3522);
        let d = paris.distance_km(51.5074, -0.1278);
        assert!((d - 343.5).abs() < 2.0, "got {d}");
    }

    #[test]
    fn test_round_trip() {
        let full = Bookstore {
            website: Some("https://shakespeareandcompany.com".to_string()),
            phone: Some("+33 1 43 25 40 93".to_string()),
            opening_hours: Some("Mon-Sun 10:00-20:00".to_string()),
            ..store(48.8125, 2.34375)
        };
        assert_eq!(round_trip(&full), full);
        let minimal = Bookstore { city: None, ..store(-33.875, 151.1875) };
        assert_eq!(round_trip(&minimal), minimal);
    }
}
