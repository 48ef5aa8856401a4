use axum::{
    extract::{rejection::FormRejection, FromRef, State},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, TokenResponse},
        extractors::CurrentUser,
        jwt::JwtKeys,
        services::authenticate,
    },
    errors::AppError,
    state::AppState,
    users::dto::ShowUser,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(login_for_access_token))
        .route("/test_auth_endpoint", get(test_auth_endpoint))
}

#[instrument(skip(state, form))]
pub async fn login_for_access_token(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(form) = form.map_err(|e| AppError::Validation(e.body_text()))?;

    let Some(user) = authenticate(state.store.as_ref(), &form.username, &form.password).await?
    else {
        warn!("login rejected");
        return Err(AppError::Unauthenticated(
            "Incorrect username or password".into(),
        ));
    };

    let roles: Vec<Value> = user.roles.iter().map(|r| json!(r.as_str())).collect();
    let mut extra = Map::new();
    extra.insert("roles".into(), Value::Array(roles));

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.issue(&user.email, extra, None)?;

    info!(user_id = %user.user_id, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip(caller))]
pub async fn test_auth_endpoint(CurrentUser(caller): CurrentUser) -> Json<Value> {
    Json(json!({
        "Success": true,
        "current_user": ShowUser::from(caller),
    }))
}
