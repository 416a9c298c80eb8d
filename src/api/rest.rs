use crate::api::error::{ApiError, ApiResult};
use crate::api::types::*;
use crate::config::ServerConfig;
use crate::metrics::{record_store_get, record_store_put, set_store_usage, StorePutOutcome};
use crate::relay::{error_chain, RelayForwarder, RelayResponse, RelayResult};
use crate::store::BlobStore;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use http_body_util::LengthLimitError;
use std::sync::Arc;

/// Path prefix in front of every relay target
const PROXY_PREFIX: &str = "/proxy/";

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<RelayForwarder>,
    pub store: Arc<BlobStore>,
}

impl AppState {
    pub fn new(forwarder: RelayForwarder, store: BlobStore) -> Self {
        Self {
            forwarder: Arc::new(forwarder),
            store: Arc::new(store),
        }
    }

    /// Build a fresh forwarder and an empty store from config
    pub fn from_config(config: &ServerConfig) -> RelayResult<Self> {
        let forwarder = RelayForwarder::new(config.relay.clone())?;
        let store = BlobStore::new(config.store.clone());
        Ok(Self::new(forwarder, store))
    }
}

pub struct RestApi {
    state: AppState,
}

impl RestApi {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(greeting))
            .route("/health", get(health_check))
            .route("/proxy/*target", get(proxy))
            .route("/plist", get(get_plist_by_query).post(put_plist))
            .route("/plist/:key", get(get_plist_by_path))
            .with_state(self.state.clone())
    }
}

/// Everything after `/proxy/` in the raw path and query
pub fn proxy_target(uri: &Uri) -> &str {
    let raw = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    raw.strip_prefix(PROXY_PREFIX).unwrap_or("")
}

async fn greeting() -> &'static str {
    GREETING
}

async fn health_check() -> &'static str {
    "OK"
}

async fn proxy(State(state): State<AppState>, uri: Uri) -> ApiResult<RelayResponse> {
    let target = proxy_target(&uri);
    let response = state.forwarder.forward(target).await?;
    Ok(response)
}

async fn put_plist(State(state): State<AppState>, body: Body) -> ApiResult<Json<StoreResponse>> {
    let limit = state.store.max_payload_bytes();

    // Read one byte past the limit so the store sees the overflow itself.
    let payload = match axum::body::to_bytes(body, limit.saturating_add(1)).await {
        Ok(payload) => payload,
        Err(e) => {
            record_store_put(StorePutOutcome::Rejected);
            let cause = e.into_inner();
            if cause.is::<LengthLimitError>() {
                return Err(ApiError::BodyTooLarge { limit });
            }
            return Err(ApiError::BodyRead(error_chain(&*cause)));
        }
    };

    match state.store.put(payload) {
        Ok(key) => {
            record_store_put(StorePutOutcome::Stored);
            set_store_usage(state.store.stats());
            Ok(Json(StoreResponse { key }))
        }
        Err(e) => {
            record_store_put(StorePutOutcome::Rejected);
            Err(e.into())
        }
    }
}

async fn get_plist_by_query(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> ApiResult<impl IntoResponse> {
    let key = query.key.unwrap_or_default();
    lookup(&state, &key)
}

async fn get_plist_by_path(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    lookup(&state, &key)
}

fn lookup(state: &AppState, key: &str) -> ApiResult<impl IntoResponse> {
    let result = state.store.get(key);
    record_store_get(result.is_ok());

    let payload = result?;
    Ok(([(header::CONTENT_TYPE, PLIST_CONTENT_TYPE)], payload))
}
