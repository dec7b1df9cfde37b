use facegate_lib::ids;

use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl std::default::Default for Role {
    fn default() -> Self {
        Role::User
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub id: ids::UserId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub picture: String,
    pub role: Role,
}
