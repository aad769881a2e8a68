use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use common::types::DataEnvelope;
use store::Record;

use crate::errors::ApiError;
use crate::routes::AppState;

/// Name of the resource a nested route family serves.
#[derive(Clone, Debug)]
pub struct Resource(pub Arc<str>);

/// GET /{resource}
pub async fn list_records(
    State(state): State<AppState>,
    Extension(Resource(resource)): Extension<Resource>,
) -> Result<Json<DataEnvelope<Vec<Record>>>, ApiError> {
    let records = state.store.list_all(&resource).await?;
    Ok(Json(DataEnvelope::new(records)))
}

/// GET /{resource}/{id}; a miss is `{"data": null}`, not an error
pub async fn get_record(
    State(state): State<AppState>,
    Extension(Resource(resource)): Extension<Resource>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<Option<Record>>>, ApiError> {
    let record = state.store.get_by_id(&resource, &id).await?;
    Ok(Json(DataEnvelope::new(record)))
}

/// POST /{resource}
pub async fn create_record(
    State(state): State<AppState>,
    Extension(Resource(resource)): Extension<Resource>,
    Json(body): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    let stored = state.store.insert(&resource, body).await?;
    Ok(Json(stored))
}

/// POST /{resource}/{id}
pub async fn update_record(
    State(state): State<AppState>,
    Extension(Resource(resource)): Extension<Resource>,
    Path(id): Path<String>,
    Json(body): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    let merged = state.store.update(&resource, &id, body).await?;
    Ok(Json(merged))
}

/// DELETE /{resource}/{id}
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(Resource(resource)): Extension<Resource>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<String>>, ApiError> {
    let removed = state.store.remove(&resource, &id).await?;
    Ok(Json(DataEnvelope::new(removed)))
}
