use axum::extract::State;
use axum::Json;
use portfolio_core::{Project, Record, RecordId, Repository, Skill};
use std::sync::Arc;

use super::blocking;
use crate::error::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::state::AppState;

/// A record type exposed over HTTP, bound to its repository in `AppState`.
pub trait Served: Record {
    fn repository(app: &AppState) -> Arc<Repository<Self>>;
}

impl Served for Project {
    fn repository(app: &AppState) -> Arc<Repository<Self>> {
        Arc::clone(&app.projects)
    }
}

impl Served for Skill {
    fn repository(app: &AppState) -> Arc<Repository<Self>> {
        Arc::clone(&app.skills)
    }
}

/// GET /{collection}. Every record, in insertion order.
pub async fn list<R: Served>(State(app): State<AppState>) -> Result<Json<Vec<R>>, AppError> {
    let repo = R::repository(&app);
    let records = blocking(move || repo.list()).await?;
    Ok(Json(records))
}

/// GET /{collection}/{id}
pub async fn get<R: Served>(
    State(app): State<AppState>,
    ValidPath(id): ValidPath<RecordId>,
) -> Result<Json<R>, AppError> {
    let repo = R::repository(&app);
    let record = blocking(move || repo.get(id)).await?;
    Ok(Json(record))
}

/// POST /{collection}. The id is assigned by the repository.
pub async fn create<R: Served>(
    State(app): State<AppState>,
    ValidJson(fields): ValidJson<R::Fields>,
) -> Result<Json<R>, AppError> {
    let repo = R::repository(&app);
    let record = blocking(move || repo.create(fields)).await?;
    tracing::info!(kind = R::KIND, id = record.id(), "record created");
    Ok(Json(record))
}

/// PUT /{collection}/{id}. Replaces every field but the id.
pub async fn update<R: Served>(
    State(app): State<AppState>,
    ValidPath(id): ValidPath<RecordId>,
    ValidJson(fields): ValidJson<R::Fields>,
) -> Result<Json<R>, AppError> {
    let repo = R::repository(&app);
    let record = blocking(move || repo.update(id, fields)).await?;
    tracing::info!(kind = R::KIND, id, "record updated");
    Ok(Json(record))
}

/// DELETE /{collection}/{id}
pub async fn delete<R: Served>(
    State(app): State<AppState>,
    ValidPath(id): ValidPath<RecordId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let repo = R::repository(&app);
    blocking(move || repo.delete(id)).await?;
    tracing::info!(kind = R::KIND, id, "record deleted");
    Ok(Json(serde_json::json!({
        "detail": format!("{} deleted", R::KIND),
    })))
}
