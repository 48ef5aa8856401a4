use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{post, MethodRouter},
    Json, Router,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    errors::AppError,
    state::AppState,
    users::{
        dto::{
            CreateUserRequest, DeletedUserResponse, ShowUser, UpdateUserRequest,
            UpdatedUserResponse, UserIdQuery,
        },
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", user_methods())
        .route("/user/", user_methods())
}

fn user_methods() -> MethodRouter<AppState> {
    post(create_user)
        .get(get_user)
        .patch(update_user)
        .delete(delete_user)
}

fn user_id(query: Result<Query<UserIdQuery>, QueryRejection>) -> Result<Uuid, AppError> {
    query
        .map(|Query(q)| q.user_id)
        .map_err(|e| AppError::Validation(e.body_text()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(p)| p)
        .map_err(|e| AppError::Validation(e.body_text()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<ShowUser>, AppError> {
    let req = body(payload)?;
    let user = services::create_user(
        state.store.as_ref(),
        &req.name,
        &req.surname,
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, caller, query))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<ShowUser>, AppError> {
    let user_id = user_id(query)?;
    debug!(caller = %caller.user_id, %user_id, "get user");
    match services::fetch_user(state.store.as_ref(), user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => Err(AppError::user_not_found(user_id)),
    }
}

#[instrument(skip(state, caller, query, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    query: Result<Query<UserIdQuery>, QueryRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UpdatedUserResponse>, AppError> {
    let user_id = user_id(query)?;
    let req = body(payload)?;
    debug!(caller = %caller.user_id, %user_id, "update user");
    let updated_user_id = services::update_user(state.store.as_ref(), user_id, req.into()).await?;
    Ok(Json(UpdatedUserResponse { updated_user_id }))
}

#[instrument(skip(state, caller, query))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Json<DeletedUserResponse>, AppError> {
    let user_id = user_id(query)?;
    debug!(caller = %caller.user_id, %user_id, "delete user");
    let deleted_user_id = services::delete_user(state.store.as_ref(), user_id).await?;
    Ok(Json(DeletedUserResponse { deleted_user_id }))
}
