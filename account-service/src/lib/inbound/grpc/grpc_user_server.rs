use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::access::AccessError;
use crate::inbound::access::AuthenticatedUser;
use crate::proto::user_service_server::UserService as UserServiceProto;
use crate::proto::CreateUserRequest;
use crate::proto::CreateUserResponse;
use crate::proto::DeleteUserRequest;
use crate::proto::DeleteUserResponse;
use crate::proto::GetUserRequest;
use crate::proto::ListUsersRequest;
use crate::proto::ListUsersResponse;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::UpdateUserRequest;
use crate::proto::UpdateUserResponse;
use crate::user::errors::UserError;

pub struct UserGrpcService {
    user_service: Arc<dyn UserServicePort>,
    auth_service: Arc<dyn AuthServicePort>,
}

impl UserGrpcService {
    pub fn new(
        user_service: Arc<dyn UserServicePort>,
        auth_service: Arc<dyn AuthServicePort>,
    ) -> Self {
        Self {
            user_service,
            auth_service,
        }
    }
}

impl From<User> for crate::proto::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

fn parse_user_id(id: &str) -> Result<UserId, Status> {
    UserId::from_string(id).map_err(|e| Status::from(UserError::from(e)))
}

/// Resolve the caller attached by the auth layer and check it owns `target`.
fn owning_caller<T>(request: &Request<T>, target: &UserId) -> Result<(), Status> {
    let caller = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(AccessError::MissingCredentials)?;

    caller.ensure_owns(target).map_err(|e| {
        tracing::warn!(
            caller = %caller.user_id,
            target = %target,
            reason = %e,
            "Mutation rejected"
        );
        Status::from(e)
    })
}

#[tonic::async_trait]
impl UserServiceProto for UserGrpcService {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<CreateUserResponse>, Status> {
        let request = request.into_inner();

        let command = RegisterUserCommand::new(
            UserName::new(request.name).map_err(UserError::from)?,
            EmailAddress::new(request.email).map_err(UserError::from)?,
            Password::new(request.password).map_err(UserError::from)?,
        );

        let id = self.user_service.register(command).await?;

        Ok(Response::new(CreateUserResponse { id: id.to_string() }))
    }

    async fn get_user_by_id(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<crate::proto::User>, Status> {
        let user_id = parse_user_id(&request.get_ref().id)?;
        let user = self.user_service.get_user(&user_id).await?;

        Ok(Response::new(user.into()))
    }

    async fn list_users(
        &self,
        request: Request<ListUsersRequest>,
    ) -> Result<Response<ListUsersResponse>, Status> {
        let request = request.into_inner();

        let offset = u64::try_from(request.offset)
            .map_err(|_| Status::invalid_argument("offset must not be negative"))?;
        let limit = u64::try_from(request.limit)
            .map_err(|_| Status::invalid_argument("limit must not be negative"))?;
        let pagination = Pagination::new(offset, limit);

        let users = if pagination.is_unbounded() {
            self.user_service.get_all().await?
        } else {
            self.user_service.list(&pagination).await?
        };

        Ok(Response::new(ListUsersResponse {
            users: users.into_iter().map(Into::into).collect(),
        }))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let request = request.into_inner();

        let email = EmailAddress::new(request.email).map_err(UserError::from)?;
        if request.password.is_empty() {
            return Err(Status::invalid_argument("password is required"));
        }

        let token = self.auth_service.login(&email, &request.password).await?;

        Ok(Response::new(LoginResponse {
            token: token.token,
            expires_at: token.expires_at,
        }))
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UpdateUserResponse>, Status> {
        let user_id = parse_user_id(&request.get_ref().id)?;
        owning_caller(&request, &user_id)?;

        let request = request.into_inner();
        let command = UpdateUserCommand::new(
            request
                .name
                .map(UserName::new)
                .transpose()
                .map_err(UserError::from)?,
            request
                .email
                .map(EmailAddress::new)
                .transpose()
                .map_err(UserError::from)?,
        )?;

        self.user_service.update_user(&user_id, command).await?;

        Ok(Response::new(UpdateUserResponse {
            message: "User updated successfully".to_string(),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteUserResponse>, Status> {
        let user_id = parse_user_id(&request.get_ref().id)?;
        owning_caller(&request, &user_id)?;

        self.user_service.delete_user(&user_id).await?;

        Ok(Response::new(DeleteUserResponse {
            message: "User deleted successfully".to_string(),
        }))
    }
}
