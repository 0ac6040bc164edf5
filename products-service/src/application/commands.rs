use crate::domain::model::NewProduct;

/// 创建商品命令
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: String,
    pub price: f64,
}

impl From<CreateProductCommand> for NewProduct {
    fn from(command: CreateProductCommand) -> Self {
        NewProduct {
            name: command.name,
            price: command.price,
        }
    }
}
