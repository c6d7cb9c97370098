use crate::domain::entry::{
    Entry, EntryFilter, EntryKind, EntryRequest, EntryStatus, StatusUpdate,
};
use crate::domain::error::DomainError;
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub user: Uuid,
    pub description: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub kind: Option<EntryKind>,
    pub status: Option<EntryStatus>,
}

async fn ensure_user_exists(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    match state.user_service.find_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::BusinessRule(
            "no user found for the given id".to_string(),
        )),
    }
}

async fn existing_entry(state: &AppState, id: Uuid) -> Result<Entry, ApiError> {
    let entry = state
        .entry_service
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("entry {}", id)))?;
    Ok(entry)
}

#[instrument(skip(state, req), fields(user_id = %req.user_id))]
pub async fn create_entry(
    state: web::Data<AppState>,
    req: web::Json<EntryRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    ensure_user_exists(&state, req.user_id).await?;
    let entry = state.entry_service.save(req.into()).await?;
    info!(entry_id = ?entry.id, "Entry created successfully");
    Ok(HttpResponse::Created().json(entry))
}

#[instrument(skip(state, req), fields(entry_id = %*path))]
pub async fn update_entry(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<EntryRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let existing = existing_entry(&state, id).await?;
    let req = req.into_inner();
    ensure_user_exists(&state, req.user_id).await?;

    let mut entry: Entry = req.into();
    entry.id = Some(id);
    entry.status = entry.status.or(existing.status);
    entry.registered_on = existing.registered_on;

    let entry = state.entry_service.update(entry).await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[instrument(skip(state, req), fields(entry_id = %*path, status = ?req.status))]
pub async fn update_entry_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let existing = existing_entry(&state, path.into_inner()).await?;
    let entry = state
        .entry_service
        .update_status(existing, req.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}

#[instrument(skip(state), fields(entry_id = %*path))]
pub async fn delete_entry(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let existing = existing_entry(&state, path.into_inner()).await?;
    state.entry_service.delete(&existing).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state))]
pub async fn search_entries(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    ensure_user_exists(&state, query.user).await?;

    let filter = EntryFilter {
        user_id: Some(query.user),
        description: query.description,
        month: query.month,
        year: query.year,
        kind: query.kind,
        status: query.status,
    };
    let entries = state.entry_service.search(&filter).await?;
    Ok(HttpResponse::Ok().json(entries))
}
