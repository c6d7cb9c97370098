use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account holder.
///
/// `id` stays `None` until the store assigns one on first save. The password
/// is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUser> for User {
    fn from(req: CreateUser) -> Self {
        User::new(req.name, req.email, req.password)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
