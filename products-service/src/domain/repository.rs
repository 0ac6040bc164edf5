use practical_core::{EntityRepositoryRef, EntityService};

use super::model::Product;

pub type ProductRepositoryRef = EntityRepositoryRef<Product>;

/// 商品领域服务
pub type ProductDomainService = EntityService<Product>;
