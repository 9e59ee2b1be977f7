//! Generic handlers shared by every resource.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;

use super::extract::{PathId, Payload};
use super::resource::Resource;
use crate::db::{Entity, Repository, RepositoryError};
use crate::error::AppError;
use crate::state::AppState;

/// List, fetch, create, replace and delete routes for `E`.
pub fn router<E: Resource>() -> Router<AppState> {
    Router::new()
        .route(&E::collection_path(), get(list::<E>).post(create::<E>))
        .route(
            &E::member_path(),
            get(show::<E>).put(replace::<E>).delete(remove::<E>),
        )
}

/// `GET /ecosave/{resource}`
pub async fn list<E: Resource>(State(state): State<AppState>) -> Result<Json<Vec<E>>, AppError> {
    let rows = Repository::<E>::new(state.db()).list().await?;
    Ok(Json(rows))
}

/// `GET /ecosave/{resource}/{id}`
pub async fn show<E: Resource>(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<E>, AppError> {
    Repository::<E>::new(state.db())
        .get(E::Id::from(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(E::NOT_FOUND.to_string()))
}

/// `POST /ecosave/{resource}`
///
/// Any id in the body is ignored; the store assigns one.
pub async fn create<E: Resource>(
    State(state): State<AppState>,
    Payload(entity): Payload<E>,
) -> Result<impl IntoResponse, AppError> {
    entity.validate()?;

    let created = Repository::<E>::new(state.db()).add(entity).await?;
    tracing::info!(resource = E::PATH, id = %created.id(), "created");

    let location = E::location(created.id());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// `PUT /ecosave/{resource}/{id}`
pub async fn replace<E: Resource>(
    State(state): State<AppState>,
    PathId(id): PathId,
    Payload(entity): Payload<E>,
) -> Result<StatusCode, AppError> {
    let body_id: i32 = entity.id().into();
    if body_id != id {
        return Err(AppError::BadRequest(E::ID_MISMATCH.to_string()));
    }
    entity.validate()?;

    match Repository::<E>::new(state.db()).update(entity).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(E::NOT_FOUND.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// `DELETE /ecosave/{resource}/{id}`
pub async fn remove<E: Resource>(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    if Repository::<E>::new(state.db()).delete(E::Id::from(id)).await? {
        tracing::info!(resource = E::PATH, %id, "deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(E::NOT_FOUND.to_string()))
    }
}
