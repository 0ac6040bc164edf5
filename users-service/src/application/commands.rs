use crate::domain::model::NewUser;

/// 创建用户命令
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
}

impl From<CreateUserCommand> for NewUser {
    fn from(command: CreateUserCommand) -> Self {
        NewUser {
            name: command.name,
            email: command.email,
        }
    }
}
