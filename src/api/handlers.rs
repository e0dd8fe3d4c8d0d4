//! API Handlers
//!
//! HTTP request handlers for each bucket endpoint. Every object operation
//! goes through the caching bucket.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use tokio::io::AsyncReadExt;

use crate::bucket::{
    Bucket, CreateObjectRequest, InMemoryBucket, ListObjectsRequest, Object, ReadObjectRequest,
    StatObjectRequest,
};
use crate::cache::LruStatCache;
use crate::caching::CachingBucket;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{BucketError, Result};
use crate::models::{
    BucketResponse, DeleteResponse, HealthResponse, ListQuery, ListResponse, ReadQuery,
    StatsResponse, UpdateObjectBody,
};

/// Header carrying a generation precondition for PUT
pub const IF_GENERATION_MATCH: &str = "x-if-generation-match";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Caching bucket in front of the backing store
    pub bucket: Arc<CachingBucket>,
}

impl AppState {
    pub fn new(bucket: CachingBucket) -> Self {
        Self {
            bucket: Arc::new(bucket),
        }
    }

    /// Builds an in-memory bucket behind a stat cache sized by `config`.
    pub fn from_config(config: &Config) -> Self {
        let bucket = CachingBucket::new(
            config.ttl(),
            Box::new(LruStatCache::new(config.stat_cache_capacity)),
            Arc::new(SystemClock),
            Arc::new(InMemoryBucket::new(config.bucket_name.clone())),
        );
        Self::new(bucket)
    }
}

/// Strips the leading slash some routers leave on wildcard captures.
fn object_name(raw: String) -> Result<String> {
    let name = raw.trim_start_matches('/');
    if name.is_empty() {
        return Err(BucketError::InvalidRequest(
            "object name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn header_string(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Handler for GET /bucket
pub async fn bucket_handler(State(state): State<AppState>) -> Json<BucketResponse> {
    Json(BucketResponse {
        name: state.bucket.name().to_string(),
    })
}

/// Handler for GET /stat/*name
///
/// Returns object metadata, from the stat cache when possible.
pub async fn stat_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Object>> {
    let req = StatObjectRequest::new(object_name(name)?);
    let object = state.bucket.stat_object(&req).await?;

    Ok(Json(Object::clone(&object)))
}

/// Handler for GET /objects/*name
///
/// Returns object contents. Never cached.
pub async fn read_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<impl IntoResponse> {
    let req = ReadObjectRequest {
        name: object_name(name)?,
        generation: query.generation,
    };

    let mut reader = state.bucket.new_reader(&req).await?;
    let mut contents = Vec::new();
    reader
        .read_to_end(&mut contents)
        .await
        .map_err(|e| BucketError::Transport(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        contents,
    ))
}

/// Handler for PUT /objects/*name
///
/// Stores the request body as the object's contents.
pub async fn create_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Object>> {
    let generation_precondition = match headers.get(IF_GENERATION_MATCH) {
        Some(v) => Some(
            v.to_str()
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    BucketError::InvalidRequest(format!("{IF_GENERATION_MATCH} must be an integer"))
                })?,
        ),
        None => None,
    };

    let req = CreateObjectRequest {
        name: object_name(name)?,
        contents: body,
        content_type: header_string(&headers, header::CONTENT_TYPE),
        content_encoding: header_string(&headers, header::CONTENT_ENCODING),
        cache_control: header_string(&headers, header::CACHE_CONTROL),
        metadata: Default::default(),
        generation_precondition,
    };

    let object = state.bucket.create_object(&req).await?;
    Ok(Json(Object::clone(&object)))
}

/// Handler for PATCH /objects/*name
pub async fn update_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<UpdateObjectBody>,
) -> Result<Json<Object>> {
    if let Some(error_msg) = body.validate() {
        return Err(BucketError::InvalidRequest(error_msg));
    }

    let req = body.into_request(object_name(name)?);
    let object = state.bucket.update_object(&req).await?;

    Ok(Json(Object::clone(&object)))
}

/// Handler for DELETE /objects/*name
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let name = object_name(name)?;
    state.bucket.delete_object(&name).await?;

    Ok(Json(DeleteResponse::new(name)))
}

/// Handler for GET /objects
///
/// Listings always go to the backing store.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let req = ListObjectsRequest::from(query);
    let listing = state.bucket.list_objects(&req).await?;
    Ok(Json(ListResponse::from(listing)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.bucket.cache_stats();
    Json(StatsResponse::new(&stats, state.bucket.ttl().as_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
