use std::sync::Arc;

use practical_core::StoreError;
use tracing::instrument;

use crate::application::commands::CreateUserCommand;
use crate::domain::model::User;
use crate::domain::repository::UserDomainService;

/// 用户命令处理器
pub struct UserCommandHandler {
    domain_service: Arc<UserDomainService>,
}

impl UserCommandHandler {
    pub fn new(domain_service: Arc<UserDomainService>) -> Self {
        Self { domain_service }
    }

    #[instrument(skip(self), fields(email = %command.email))]
    pub async fn handle_create_user(&self, command: CreateUserCommand) -> Result<User, StoreError> {
        self.domain_service.create(command.into()).await
    }
}
