use practical_core::{Entity, EntityId, Lifecycle};

/// 用户实体
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    /// 全表唯一（包括已软删除的记录）
    pub email: String,
    pub lifecycle: Lifecycle,
}

/// 待创建的用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl Entity for User {
    type Draft = NewUser;

    const TABLE: &'static str = "users";

    fn id(&self) -> EntityId {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn assemble(id: EntityId, draft: NewUser, lifecycle: Lifecycle) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            lifecycle,
        }
    }

    fn unique_key(&self) -> Option<(&'static str, &str)> {
        Some(("email", &self.email))
    }
}
