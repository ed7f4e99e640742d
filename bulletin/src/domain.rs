use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod response {
    #[derive(Clone, Debug)]
    pub struct PutResponse {
        pub created: bool,
        pub message: String,
    }

    impl PutResponse {
        pub fn new(created: bool, message: impl Into<String>) -> Self {
            Self {
                created,
                message: message.into(),
            }
        }
    }

    #[derive(Clone, Debug)]
    pub struct GetResponse<V> {
        pub found: bool,
        pub message: V,
    }

    impl<V> GetResponse<V> {
        pub fn new(found: bool, message: V) -> Self {
            Self { found, message }
        }
    }

    #[derive(Clone, Debug)]
    pub struct DeleteResponse {
        pub deleted: bool,
    }

    impl DeleteResponse {
        pub fn new(deleted: bool) -> Self {
            Self { deleted }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at` only when something changed
    pub fn apply(&mut self, name: Option<String>, email: Option<String>) {
        let mut changed = false;
        if let Some(name) = name {
            changed |= self.name != name;
            self.name = name;
        }
        if let Some(email) = email {
            changed |= self.email != email;
            self.email = email;
        }
        if changed {
            self.updated_at = Utc::now();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(content: String, user_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_content(&mut self, content: String) {
        if self.content != content {
            self.content = content;
            self.updated_at = Utc::now();
        }
    }
}
