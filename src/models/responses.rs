//! Response DTOs for the bucket API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::bucket::{Listing, Object};
use crate::cache::CacheStats;

/// Response body for GET /bucket
#[derive(Debug, Clone, Serialize)]
pub struct BucketResponse {
    pub name: String,
}

/// Response body for GET /objects
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub objects: Vec<Object>,
    /// Collapsed runs when a delimiter was given
    pub prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl From<Listing> for ListResponse {
    fn from(listing: Listing) -> Self {
        Self {
            objects: listing.objects.iter().map(|o| Object::clone(o)).collect(),
            prefixes: listing.collapsed_runs,
            next_page_token: listing.continuation_token,
        }
    }
}

/// Response body for DELETE /objects/*name
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            message: format!("Object '{}' deleted", name.as_ref()),
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub total_entries: usize,
    /// hits / (hits + misses), 0.0 before any lookup
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, ttl_secs: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            ttl_secs,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[test]
    fn test_list_response_from_listing() {
        let listing = Listing {
            objects: vec![Arc::new(Object {
                name: "a".into(),
                generation: 1,
                metageneration: 1,
                size: 3,
                content_type: None,
                content_encoding: None,
                cache_control: None,
                metadata: BTreeMap::new(),
                md5: String::new(),
                updated: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            })],
            collapsed_runs: vec!["dir/".into()],
            continuation_token: None,
        };

        let json = serde_json::to_value(ListResponse::from(listing)).unwrap();
        assert_eq!(json["objects"][0]["name"], "a");
        assert_eq!(json["prefixes"][0], "dir/");
        assert!(json.get("next_page_token").is_none());
    }

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_string(&DeleteResponse::new("gone")).unwrap();
        assert!(json.contains("gone"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        let resp = StatsResponse::new(&stats, 60);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.ttl_secs, 60);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
