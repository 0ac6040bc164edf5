/// 按 ID 查询用户
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    /// 调用方传入的原始 ID 字符串
    pub id: String,
}
