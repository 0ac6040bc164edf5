use std::sync::Arc;

use practical_core::StoreError;
use practical_proto::users::user_service_server::UserService;
use practical_proto::users::{
    CreateUserRequest, GetUserRequest, User as ProtoUser, UserResponse,
};
use tonic::{Request, Response, Status};
use tracing::{debug, instrument, warn};

use crate::application::commands::CreateUserCommand;
use crate::application::handlers::{UserCommandHandler, UserQueryHandler};
use crate::application::queries::GetUserQuery;
use crate::domain::model::User;

#[derive(Clone)]
pub struct UserGrpcHandler {
    command_handler: Arc<UserCommandHandler>,
    query_handler: Arc<UserQueryHandler>,
}

impl UserGrpcHandler {
    pub fn new(
        command_handler: Arc<UserCommandHandler>,
        query_handler: Arc<UserQueryHandler>,
    ) -> Self {
        Self {
            command_handler,
            query_handler,
        }
    }
}

#[tonic::async_trait]
impl UserService for UserGrpcHandler {
    #[instrument(skip(self, request))]
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();
        let command = CreateUserCommand {
            name: req.name,
            email: req.email,
        };

        let user = self
            .command_handler
            .handle_create_user(command)
            .await
            .map_err(|err| store_status("create user failed", err))?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(&user)),
        }))
    }

    #[instrument(skip(self, request))]
    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let query = GetUserQuery {
            id: request.into_inner().id,
        };

        let user = self
            .query_handler
            .handle_get_user(query)
            .await
            .map_err(|err| store_status("get user failed", err))?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(&user)),
        }))
    }
}

pub fn to_proto_user(user: &User) -> ProtoUser {
    ProtoUser {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn store_status(context: &'static str, err: StoreError) -> Status {
    if err.is_not_found() {
        debug!(error = %err, "{}", context);
    } else {
        warn!(error = %err, "{}", context);
    }
    Status::from(err)
}
