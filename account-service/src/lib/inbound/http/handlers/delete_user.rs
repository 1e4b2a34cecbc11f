use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::MessageData;
use crate::domain::user::models::UserId;
use crate::inbound::access::AccessError;
use crate::inbound::access::AuthenticatedUser;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn delete_user(
    State(state): State<AppState>,
    caller: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let Extension(caller) = caller.ok_or(AccessError::MissingCredentials)?;
    caller.ensure_owns(&user_id).map_err(|e| {
        tracing::warn!(caller = %caller.user_id, target = %user_id, reason = %e, "Delete rejected");
        e
    })?;

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("User deleted successfully")))
}
