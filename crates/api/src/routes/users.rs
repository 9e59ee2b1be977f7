//! User routes: aggregate reads and the spend evaluation.
//!
//! Writes go through the generic handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use ecosave_core::UserId;

use super::crud;
use super::extract::PathId;
use super::resource::Resource;
use crate::db::{FetchPlan, UserRepository};
use crate::error::AppError;
use crate::models::{User, UserDetail};
use crate::services::evaluation::{self, SpendEvaluation};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(&User::collection_path(), get(list).post(crud::create::<User>))
        .route(
            &User::member_path(),
            get(show)
                .put(crud::replace::<User>)
                .delete(crud::remove::<User>),
        )
        .route(
            &format!("{}/calcular-media-avaliacao", User::member_path()),
            get(evaluate),
        )
}

/// `GET /ecosave/usuarios` with devices, addresses and points.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserDetail>>, AppError> {
    let users = UserRepository::new(state.db())
        .list(FetchPlan::USER_SUMMARY)
        .await?;
    Ok(Json(users))
}

/// `GET /ecosave/usuarios/{id}` with everything, including consumption.
async fn show(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<UserDetail>, AppError> {
    UserRepository::new(state.db())
        .get(UserId::new(id), FetchPlan::USER_DETAIL)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(User::NOT_FOUND.to_string()))
}

/// `GET /ecosave/usuarios/{id}/calcular-media-avaliacao`
async fn evaluate(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<SpendEvaluation>, AppError> {
    evaluation::evaluate_spend(state.db(), state.tips(), UserId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(User::NOT_FOUND.to_string()))
}
