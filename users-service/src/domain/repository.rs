use practical_core::{EntityRepositoryRef, EntityService};

use super::model::User;

pub type UserRepositoryRef = EntityRepositoryRef<User>;

/// 用户领域服务
pub type UserDomainService = EntityService<User>;
