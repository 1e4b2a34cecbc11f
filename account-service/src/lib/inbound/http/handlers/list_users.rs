use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::Pagination;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// `?offset=&limit=`; both absent or zero returns every user.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    offset: u64,
    #[serde(default)]
    limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUsersResponseData {
    pub users: Vec<UserData>,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    let pagination = Pagination::new(query.offset, query.limit);

    let users = if pagination.is_unbounded() {
        state.user_service.get_all().await?
    } else {
        state.user_service.list(&pagination).await?
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListUsersResponseData {
            users: users.iter().map(UserData::from).collect(),
        },
    ))
}
