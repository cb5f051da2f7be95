use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Form, Json,
};
use chrono::Duration;
use serde_json::json;

use crate::{
    auth,
    error::ApiError,
    model::CurrentUser,
    schema::{
        ChangePasswordSchema, CreateUserSchema, LoginSchema, TodoRequestSchema, TokenSchema,
        UpdatePhoneNumberSchema,
    },
    AppState,
};

// Handler for the health checker route
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

fn validate_todo_id(id: i64) -> Result<(), ApiError> {
    if id < 1 {
        return Err(ApiError::Validation(
            "todo id must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

// ---- /auth ----

// Handler for registering a new user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let hashed_password =
        auth::hash_password(&body.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let user = state.users.create(&body, &hashed_password).await?;

    tracing::info!(username = %user.username, id = user.id, "user registered");

    let response = json!({
        "id": user.id,
        "email": user.email,
        "username": user.username,
        "hashed_password": user.hashed_password,
    });
    Ok((StatusCode::CREATED, Json(response)))
}

// Handler for exchanging username/password form credentials for a bearer token
pub async fn login_for_access_token(
    State(state): State<Arc<AppState>>,
    Form(body): Form<LoginSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .find_by_username(&body.username)
        .await?
        .ok_or(ApiError::Unauthenticated("Invalid credentials"))?;

    let matches = auth::verify_password(&body.password, &user.hashed_password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !matches {
        return Err(ApiError::Unauthenticated("Invalid credentials"));
    }

    let access_token = auth::create_access_token(
        &state.jwt_secret,
        &user.username,
        user.id,
        Duration::minutes(auth::ACCESS_TOKEN_EXPIRE_MINUTES),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(TokenSchema {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

// ---- /users ----

// Handler for returning the authenticated user's record
pub async fn get_user(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user_model = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user_model))
}

// Handler for changing the authenticated user's password
pub async fn change_password(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChangePasswordSchema>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;

    let user_model = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let matches = auth::verify_password(&body.current_password, &user_model.hashed_password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !matches {
        return Err(ApiError::Unauthenticated("Current password is incorrect"));
    }

    let hashed_password =
        auth::hash_password(&body.new_password).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.users.update_password(user.id, &hashed_password).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

// Handler for updating the authenticated user's phone number
pub async fn update_phone_number(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdatePhoneNumberSchema>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    state
        .users
        .update_phone_number(user.id, &body.phone_number)
        .await?;

    Ok(Json(json!({
        "message": "Phone number updated successfully",
        "phone_number": body.phone_number,
    })))
}

// ---- todos (owner-scoped) ----

// Handler for listing the caller's own todos
pub async fn read_all_todos(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let todos = state.todos.list_mine(&user).await?;
    Ok(Json(todos))
}

// Handler for getting one of the caller's todos by ID
pub async fn get_todo_by_id(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    validate_todo_id(id)?;
    let todo = state.todos.get(&user, id).await?;
    Ok(Json(todo))
}

// Handler for creating a new todo owned by the caller
pub async fn create_todo(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<TodoRequestSchema>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let todo = state.todos.create(&user, &body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

// Handler for replacing one of the caller's todos
pub async fn update_todo(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<TodoRequestSchema>,
) -> Result<impl IntoResponse, ApiError> {
    validate_todo_id(id)?;
    body.validate()?;
    let todo = state.todos.update(&user, id, &body).await?;
    Ok(Json(todo))
}

// Handler for deleting one of the caller's todos
pub async fn delete_todo(
    Extension(user): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    validate_todo_id(id)?;
    state.todos.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- /admin ----

// Handler for listing every todo regardless of owner
pub async fn admin_get_todos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let todos = state.todos.list_all().await?;
    Ok(Json(todos))
}

// Handler for deleting any todo by ID regardless of owner
pub async fn admin_delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    validate_todo_id(id)?;
    state.todos.delete_any(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
