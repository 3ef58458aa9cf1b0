use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    routing::post,
    Json, Router,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use shared::asset_id::DeviceCode;
use shared::filter::{self, Criteria};
use shared::options::{DropdownOptions, OPTIONS};
use shared::protocol::API_PREFIX;
use shared::summary::AssetSummary;
use shared::types::Asset;
use crate::api::error::{ApiError, ApiResult};
use crate::store::error::StoreError;
use crate::store_manager::StoreHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub hash_rx: watch::Receiver<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Deserialize)]
pub struct NextIdQuery {
    #[serde(default)]
    pub asset_type: String,
}

#[derive(Serialize)]
pub struct NextIdResponse {
    pub asset_id: String,
    pub device_code: DeviceCode,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub assets: Vec<Asset>,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub assets: Vec<Asset>,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/assets", get(list_assets).post(create_asset))
        .route("/assets/hash", get(get_hash))
        .route("/assets/next-id", get(next_id))
        .route("/assets/import", post(import_assets))
        .route(
            "/assets/:asset_id",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
        .route("/summary", get(get_summary))
        .route("/options", get(get_options));

    Router::new().nest(API_PREFIX, api).with_state(state)
}

/// CORS policy admitting the configured browser origins
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Query string parameters are filter criteria, e.g. `?status=Active&search=doe`
async fn list_assets(
    State(state): State<AppState>,
    Query(criteria): Query<Criteria>,
) -> ApiResult<Json<Vec<Asset>>> {
    let assets = state.store.list().await?;
    if criteria.is_empty() {
        return Ok(Json(assets));
    }
    let matching: Vec<Asset> = filter::apply(&assets, &criteria).into_iter().cloned().collect();
    Ok(Json(matching))
}

async fn create_asset(
    State(state): State<AppState>,
    Json(draft): Json<Asset>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let asset = state.store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

async fn get_hash(State(state): State<AppState>) -> String {
    state.hash_rx.borrow().clone()
}

async fn next_id(
    State(state): State<AppState>,
    Query(params): Query<NextIdQuery>,
) -> ApiResult<Json<NextIdResponse>> {
    let device_code = DeviceCode::from_asset_type(&params.asset_type);
    let asset_id = state.store.next_id(params.asset_type).await?;
    Ok(Json(NextIdResponse { asset_id, device_code }))
}

async fn import_assets(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> ApiResult<(StatusCode, Json<ImportResponse>)> {
    if request.assets.is_empty() {
        return Err(ApiError::BadRequest("No assets to import".to_string()));
    }
    let assets = state.store.import(request.assets).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse { imported: assets.len(), assets }),
    ))
}

async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<Asset>> {
    state
        .store
        .get(asset_id.clone())
        .await?
        .map(Json)
        .ok_or_else(|| StoreError::NotFound(asset_id).into())
}

async fn update_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Json(changes): Json<Asset>,
) -> ApiResult<Json<Asset>> {
    let asset = state.store.update(asset_id, changes).await?;
    Ok(Json(asset))
}

async fn delete_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.store.delete(asset_id.clone()).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StoreError::NotFound(asset_id).into())
    }
}

async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<AssetSummary>> {
    let assets = state.store.list().await?;
    Ok(Json(AssetSummary::from_assets(&assets)))
}

async fn get_options() -> Json<DropdownOptions> {
    Json(OPTIONS)
}
