use std::collections::HashSet;
use std::sync::Arc;

use auth::Authenticator;

use crate::domain::user::models::UserId;
use crate::inbound::access::errors::AccessError;

const BEARER_PREFIX: &str = "Bearer ";

const GRPC_PUBLIC_METHODS: [&str; 4] = [
    "/user.UserService/CreateUser",
    "/user.UserService/GetUserById",
    "/user.UserService/ListUsers",
    "/user.UserService/Login",
];

const HTTP_PUBLIC_ROUTES: [&str; 4] = [
    "POST /api/v1/users",
    "GET /api/v1/users",
    "GET /api/v1/users/:id",
    "POST /api/v1/auth/login",
];

/// Identity resolved from a verified token.
///
/// Inserted into request extensions by both transports and read back by the
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

impl AuthenticatedUser {
    /// A caller may only mutate its own record.
    ///
    /// # Errors
    /// * `ForeignTarget` - `target` is a different user
    pub fn ensure_owns(&self, target: &UserId) -> Result<(), AccessError> {
        if self.user_id == *target {
            Ok(())
        } else {
            Err(AccessError::ForeignTarget)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    Public,
    Protected,
}

/// Exact endpoint identities that accept anonymous calls.
#[derive(Debug, Clone, Default)]
pub struct PublicEndpoints(HashSet<String>);

impl PublicEndpoints {
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(endpoints.into_iter().map(Into::into).collect())
    }

    /// Public RPC methods, keyed by full gRPC method path.
    pub fn grpc_defaults() -> Self {
        Self::new(GRPC_PUBLIC_METHODS)
    }

    /// Public HTTP routes, keyed by `"<METHOD> <route template>"`.
    pub fn http_defaults() -> Self {
        Self::new(HTTP_PUBLIC_ROUTES)
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.0.contains(endpoint)
    }
}

/// Per-call access decision shared by the HTTP middleware and the gRPC layer.
///
/// Anything not listed in the public set is protected.
#[derive(Clone)]
pub struct AccessPolicy {
    public_endpoints: Arc<PublicEndpoints>,
    authenticator: Arc<Authenticator>,
}

impl AccessPolicy {
    pub fn new(public_endpoints: PublicEndpoints, authenticator: Arc<Authenticator>) -> Self {
        Self {
            public_endpoints: Arc::new(public_endpoints),
            authenticator,
        }
    }

    pub fn classify(&self, endpoint: &str) -> EndpointClass {
        if self.public_endpoints.contains(endpoint) {
            EndpointClass::Public
        } else {
            EndpointClass::Protected
        }
    }

    /// Decide whether a call may proceed.
    ///
    /// Returns `None` for public endpoints and the verified caller for
    /// protected ones. The header is never inspected on public endpoints.
    ///
    /// # Errors
    /// * `MissingCredentials` / `MalformedCredentials` - Header absent or not a bearer token
    /// * `InvalidToken` - Bad signature, malformed, expired, or foreign subject
    pub fn authorize(
        &self,
        endpoint: &str,
        authorization: Option<&str>,
    ) -> Result<Option<AuthenticatedUser>, AccessError> {
        if self.classify(endpoint) == EndpointClass::Public {
            return Ok(None);
        }

        let result = self.verify(authorization);
        if let Err(ref e) = result {
            tracing::warn!(endpoint = %endpoint, reason = %e, "Call rejected");
        }

        result.map(Some)
    }

    fn verify(&self, authorization: Option<&str>) -> Result<AuthenticatedUser, AccessError> {
        let token = extract_bearer(authorization)?;

        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| AccessError::InvalidToken(e.to_string()))?;

        let user_id = UserId::from_string(claims.subject())
            .map_err(|e| AccessError::InvalidToken(e.to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email().to_string(),
        })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` value.
///
/// The scheme is case-sensitive and separated by exactly one space.
pub fn extract_bearer(authorization: Option<&str>) -> Result<&str, AccessError> {
    let value = authorization.ok_or(AccessError::MissingCredentials)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AccessError::MalformedCredentials)?;

    if token.trim().is_empty() {
        return Err(AccessError::MalformedCredentials);
    }

    Ok(token)
}
