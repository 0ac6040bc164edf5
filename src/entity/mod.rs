//! 通用实体契约
//!
//! 每个实体服务只拥有一种实体和一张表：
//! - [`Entity`]：实体类型自身的描述（表名、标识符、生命周期信封）
//! - [`EntityRepository`]：存储适配器契约
//! - [`EntityService`]：Create / Get 请求契约，存储错误原样透传

mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::error::StoreError;

pub use memory::InMemoryRepository;

/// 实体标识符
///
/// 由存储在创建时分配，分配后不可变、不复用；对外一律渲染为十进制字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(i64);

impl EntityId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// 解析调用方传入的标识符，不做范围校验
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<i64>().ok().map(Self)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 生命周期信封：创建时间、更新时间、软删除标记
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    pub fn new(
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// 刚创建的记录
    pub fn created_now() -> Self {
        let now = Utc::now();
        Self::new(now, now, None)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 标记软删除，已删除的记录保持原删除时间
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(at);
            self.updated_at = at;
        }
    }
}

/// 实体类型
pub trait Entity: Clone + Send + Sync + 'static {
    /// 创建时由调用方提供的字段
    type Draft: Clone + Send + Sync + 'static;

    /// 后备表名
    const TABLE: &'static str;

    fn id(&self) -> EntityId;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// 用存储分配的标识符和原始字段组装实体
    fn assemble(id: EntityId, draft: Self::Draft, lifecycle: Lifecycle) -> Self;

    /// 唯一约束 `(列名, 值)`，没有唯一字段的实体返回 None
    fn unique_key(&self) -> Option<(&'static str, &str)> {
        None
    }
}

/// 存储适配器
///
/// 实现必须可被多个并发请求同时调用，连接在启动时建立一次，
/// 运行期连接失败直接返回给调用方，不做重连
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// 幂等地创建后备表
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// 持久化新记录，分配标识符和创建时间
    async fn insert(&self, draft: E::Draft) -> Result<E, StoreError>;

    /// 按主键查找未软删除的记录
    async fn find_by_id(&self, id: EntityId) -> Result<E, StoreError>;

    /// 软删除（不属于对外暴露的 RPC 契约）
    async fn soft_delete(&self, id: EntityId) -> Result<(), StoreError>;
}

pub type EntityRepositoryRef<E> = Arc<dyn EntityRepository<E>>;

/// 实体服务：Create / Get
///
/// 无状态，每个请求独立；不做字段校验，不重试，不翻译存储错误
pub struct EntityService<E: Entity> {
    repository: EntityRepositoryRef<E>,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(repository: EntityRepositoryRef<E>) -> Self {
        Self { repository }
    }

    /// 创建实体，返回分配的标识符以及原样回显的字段
    #[instrument(skip(self, draft), fields(table = E::TABLE))]
    pub async fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        let entity = self.repository.insert(draft).await?;
        debug!(id = %entity.id(), "entity created");
        Ok(entity)
    }

    /// 按调用方提供的标识符查找
    ///
    /// 无法解析为整数的标识符不可能对应任何记录，按未找到处理
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn get(&self, raw_id: &str) -> Result<E, StoreError> {
        let Some(id) = EntityId::parse(raw_id) else {
            return Err(StoreError::NotFound);
        };
        self.repository.find_by_id(id).await
    }
}
