//! User API handlers
//!
//! Thin wrappers over `UserService`: parse the id, call the service and
//! map the outcome to a status code.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpsertUserRequest, UserDetailsDto, UserDto};
use crate::application::{UpsertOutcome, UserService};
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    api_error, domain_error, ApiError, ErrorResponse, ValidatedJson,
};

pub const USERS_PATH: &str = "/api/users";

const EMPTY_ID_MESSAGE: &str = "User's id cannot be null or empty.";
const INVALID_ID_MESSAGE: &str = "Invalid user's id";

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

fn parse_user_id(raw: &str, action: &str) -> Result<Uuid, ApiError> {
    if raw.is_empty() {
        error!("{} user with null or empty id", action);
        return Err(api_error(StatusCode::BAD_REQUEST, EMPTY_ID_MESSAGE));
    }
    Uuid::parse_str(raw).map_err(|_| {
        error!("{} user with invalid id: {}", action, raw);
        api_error(StatusCode::BAD_REQUEST, INVALID_ID_MESSAGE)
    })
}

fn location(id: Uuid) -> String {
    format!("{}/{}", USERS_PATH, id)
}

/// Log and map a service failure. Validation failures were already logged
/// by the service.
fn service_error(e: DomainError, action: &str) -> ApiError {
    if !e.is_client_error() {
        error!("{} user failed: {}", action, e);
    }
    domain_error(e)
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users in storage order", body = Vec<UserDetailsDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<Vec<UserDetailsDto>>, ApiError> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|e| service_error(e, "Getting"))?;

    Ok(Json(users.into_iter().map(UserDetailsDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "User details, or null when absent", body = Option<UserDetailsDto>),
        (status = 400, description = "Missing or malformed id", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<Option<UserDetailsDto>>, ApiError> {
    let id = parse_user_id(&id, "Getting")?;

    let user = state
        .user_service
        .get_user(id)
        .await
        .map_err(|e| service_error(e, "Getting"))?;

    Ok(Json(user.map(UserDetailsDto::from)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto,
            headers(("location" = String, description = "URL of the new user"))),
        (status = 400, description = "Malformed body or validation error", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<UserDto>), ApiError> {
    let user = state
        .user_service
        .add_user(request.into())
        .await
        .map_err(|e| service_error(e, "Adding"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(user.id))],
        Json(UserDto::from(user)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "Existing user updated"),
        (status = 201, description = "User created under the given id", body = UpsertUserRequest,
            headers(("location" = String, description = "URL of the new user"))),
        (status = 400, description = "Missing/malformed id or validation error", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upsert_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpsertUserRequest>,
) -> Result<Response, ApiError> {
    let id = parse_user_id(&id, "Updating")?;

    let outcome = state
        .user_service
        .upsert_user(id, request.clone().into())
        .await
        .map_err(|e| service_error(e, "Updating"))?;

    Ok(match outcome {
        UpsertOutcome::Created => (
            StatusCode::CREATED,
            [(header::LOCATION, location(id))],
            Json(request),
        )
            .into_response(),
        UpsertOutcome::Updated => StatusCode::OK.into_response(),
    })
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID (UUID)")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Missing or malformed id", body = ErrorResponse),
        (status = 404, description = "Not found"),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id, "Deleting")?;

    let removed = state
        .user_service
        .delete_user(id)
        .await
        .map_err(|e| service_error(e, "Deleting"))?;

    Ok(if removed {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    })
}

/// `/api/users/` with nothing after the slash on an id route
pub async fn missing_user_id() -> ApiError {
    error!("Request for user with null or empty id");
    api_error(StatusCode::BAD_REQUEST, EMPTY_ID_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_rejected() {
        let (status, Json(body)) = parse_user_id("", "Getting").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_message, "User's id cannot be null or empty.");
    }

    #[test]
    fn malformed_id_is_rejected() {
        let (status, Json(body)) = parse_user_id("not-a-uuid", "Getting").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_message, "Invalid user's id");
    }

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&id.to_string(), "Getting").unwrap(), id);
    }

    #[test]
    fn location_points_at_the_user() {
        let id = Uuid::nil();
        assert_eq!(
            location(id),
            "/api/users/00000000-0000-0000-0000-000000000000"
        );
    }
}
