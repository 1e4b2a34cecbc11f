use axum::extract::MatchedPath;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Applies the access policy to every routed request.
///
/// The endpoint identity is `"<METHOD> <route template>"`, e.g.
/// `"PUT /api/v1/users/:id"`. On protected routes the verified caller is
/// stored as an [`AuthenticatedUser`](crate::inbound::access::AuthenticatedUser)
/// request extension.
pub async fn authorize(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let endpoint = endpoint_identity(&req);

    // A header that is not visible ASCII counts as malformed, not absent.
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    if let Some(caller) = state.access_policy.authorize(&endpoint, authorization)? {
        tracing::debug!(user_id = %caller.user_id, endpoint = %endpoint, "Caller authenticated");
        req.extensions_mut().insert(caller);
    }

    Ok(next.run(req).await)
}

fn endpoint_identity(req: &Request) -> String {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    // HEAD is served by the GET handler, so it shares the GET classification
    let method = if req.method() == Method::HEAD {
        Method::GET
    } else {
        req.method().clone()
    };

    format!("{} {}", method, path)
}
