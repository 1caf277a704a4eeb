//! User management endpoints
//!
//! Ids travel in the request body, so every operation shares the `/users`
//! path and differs only by method.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse};
use crate::domain::{DomainError, User};
use crate::infrastructure::observability::record_user_operation;
use crate::infrastructure::user::{CreateUserRequest, ListUsersOutcome, UpdateUserRequest};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const NO_USERS_FOUND: &str = "No users found";

/// Request to create a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserApiRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// Request to update a user
///
/// `active` is taken as raw JSON so a missing or non-boolean value is
/// reported like any other missing field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserApiRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub active: Option<Value>,
}

/// Request to delete a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserApiRequest {
    #[serde(default)]
    pub id: String,
}

/// User as exposed over HTTP. Carries no credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            roles: user.roles().to_vec(),
            active: user.is_active(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

impl TryFrom<UpdateUserApiRequest> for UpdateUserRequest {
    type Error = DomainError;

    fn try_from(request: UpdateUserApiRequest) -> Result<Self, Self::Error> {
        let active = request
            .active
            .as_ref()
            .and_then(Value::as_bool)
            .ok_or_else(|| DomainError::validation(ALL_FIELDS_REQUIRED))?;

        Ok(Self {
            id: request.id,
            username: request.username,
            password: request.password,
            roles: request.roles,
            active,
        })
    }
}

fn outcome_label(result: &Result<User, DomainError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(DomainError::Validation { .. }) => "invalid",
        Err(DomainError::Creation { .. }) => "invalid",
        Err(DomainError::NotFound { .. }) => "not_found",
        Err(DomainError::Conflict { .. }) => "conflict",
        Err(_) => "error",
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("Listing users");

    match state.user_service.list_users().await.map_err(ApiError::from)? {
        ListUsersOutcome::Found(users) => {
            Ok(Json(users.iter().map(UserResponse::from).collect()))
        }
        ListUsersOutcome::NoUsers => Err(ApiError::bad_request(NO_USERS_FOUND)),
    }
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    debug!(username = %request.username, "Creating user");

    let service_request = CreateUserRequest {
        username: request.username,
        password: request.password,
        roles: request.roles,
    };

    let result = state.user_service.create_user(service_request).await;
    record_user_operation("create", outcome_label(&result));
    let user = result.map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "New user {} created",
            user.username()
        ))),
    ))
}

/// PATCH /users
pub async fn update_user(
    State(state): State<AppState>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(user_id = %request.id, "Updating user");

    let result = match UpdateUserRequest::try_from(request) {
        Ok(service_request) => state.user_service.update_user(service_request).await,
        Err(e) => Err(e),
    };
    record_user_operation("update", outcome_label(&result));
    let user = result.map_err(ApiError::from)?;

    Ok(Json(MessageResponse::new(format!(
        "{} updated",
        user.username()
    ))))
}

/// DELETE /users
pub async fn delete_user(
    State(state): State<AppState>,
    Json(request): Json<DeleteUserApiRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(user_id = %request.id, "Deleting user");

    let result = state.user_service.delete_user(&request.id).await;
    record_user_operation("delete", outcome_label(&result));
    let user = result.map_err(ApiError::from)?;

    Ok(Json(MessageResponse::new(format!(
        "Username {} with ID {} deleted",
        user.username(),
        user.id()
    ))))
}
