use practical_core::{Entity, EntityId, Lifecycle};

/// 商品实体
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    /// 原样保存，不做范围校验
    pub price: f64,
    pub lifecycle: Lifecycle,
}

/// 待创建的商品
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

impl Entity for Product {
    type Draft = NewProduct;

    const TABLE: &'static str = "products";

    fn id(&self) -> EntityId {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn assemble(id: EntityId, draft: NewProduct, lifecycle: Lifecycle) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            lifecycle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_have_no_unique_key() {
        let draft = NewProduct {
            name: "Widget".to_string(),
            price: 9.99,
        };
        let product = Product::assemble(EntityId::new(1), draft, Lifecycle::created_now());

        assert_eq!(product.price, 9.99);
        assert!(product.unique_key().is_none());
    }
}
