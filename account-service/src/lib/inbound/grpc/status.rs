use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::inbound::access::AccessError;
use crate::user::errors::UserError;

const INTERNAL_ERROR_MESSAGE: &str = "internal error";
const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

impl From<UserError> for Status {
    fn from(err: UserError) -> Self {
        match err {
            _ if err.is_validation() => Status::invalid_argument(err.to_string()),
            UserError::NotFound(_) => Status::not_found(err.to_string()),
            UserError::EmailAlreadyExists(_) => Status::already_exists(err.to_string()),
            _ => {
                tracing::error!(error = %err, "User operation failed");
                Status::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        if err.is_credential_failure() {
            tracing::warn!(reason = %err, "Login rejected");
            Status::unauthenticated(INVALID_CREDENTIALS_MESSAGE)
        } else {
            tracing::error!(error = %err, "Login failed");
            Status::internal(INTERNAL_ERROR_MESSAGE)
        }
    }
}

impl From<AccessError> for Status {
    fn from(err: AccessError) -> Self {
        Status::unauthenticated(err.public_message())
    }
}
