/// 按 ID 查询商品
#[derive(Debug, Clone)]
pub struct GetProductQuery {
    /// 调用方传入的原始 ID 字符串
    pub id: String,
}
