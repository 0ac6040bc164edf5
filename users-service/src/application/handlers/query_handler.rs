use std::sync::Arc;

use practical_core::StoreError;
use tracing::instrument;

use crate::application::queries::GetUserQuery;
use crate::domain::model::User;
use crate::domain::repository::UserDomainService;

/// 用户查询处理器
pub struct UserQueryHandler {
    domain_service: Arc<UserDomainService>,
}

impl UserQueryHandler {
    pub fn new(domain_service: Arc<UserDomainService>) -> Self {
        Self { domain_service }
    }

    #[instrument(skip(self), fields(id = %query.id))]
    pub async fn handle_get_user(&self, query: GetUserQuery) -> Result<User, StoreError> {
        self.domain_service.get(&query.id).await
    }
}
