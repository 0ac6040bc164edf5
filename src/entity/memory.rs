use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Entity, EntityId, EntityRepository, Lifecycle};
use crate::error::StoreError;

/// 内存版实体仓储，实现用于开发和单测阶段
///
/// 与 PostgreSQL 表的行为保持一致：标识符自增且不复用，
/// 唯一约束覆盖包括软删除在内的全部记录，查找排除软删除记录
pub struct InMemoryRepository<E: Entity> {
    state: RwLock<MemoryState<E>>,
    _entity: PhantomData<fn() -> E>,
}

struct MemoryState<E> {
    next_id: i64,
    rows: BTreeMap<EntityId, E>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
            _entity: PhantomData,
        }
    }

    /// 全部记录数（含软删除）
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for InMemoryRepository<E> {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, draft: E::Draft) -> Result<E, StoreError> {
        let mut state = self.state.write().await;
        let candidate = E::assemble(EntityId::new(state.next_id), draft, Lifecycle::created_now());

        if let Some((column, value)) = candidate.unique_key() {
            let taken = state
                .rows
                .values()
                .any(|row| row.unique_key() == Some((column, value)));
            if taken {
                return Err(StoreError::UniqueViolation(format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    E::TABLE,
                    column
                )));
            }
        }

        state.next_id += 1;
        state.rows.insert(candidate.id(), candidate.clone());
        Ok(candidate)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<E, StoreError> {
        let state = self.state.read().await;
        state
            .rows
            .get(&id)
            .filter(|row| !row.lifecycle().is_deleted())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn soft_delete(&self, id: EntityId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.rows.get_mut(&id) {
            Some(row) if !row.lifecycle().is_deleted() => {
                row.lifecycle_mut().mark_deleted(Utc::now());
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}
