#![deny(clippy::all)]

use crate::domain::response::{DeleteResponse, GetResponse, PutResponse};
use crate::domain::{Post, User};
use async_trait::async_trait;
use shared::{Result, TtlMs};

// Ports are the pluggable seams between the application core and its collaborators

/// Port for transient key-value caches
/// A `get` on an absent or expired key returns `Error::NotFound`
#[async_trait]
pub trait CacheStore<K, V>: Send + Sync + 'static {
    async fn put(&self, key: K, val: V, ttl: Option<TtlMs>) -> Result<PutResponse>;
    async fn get(&self, key: &K) -> Result<GetResponse<V>>;
    async fn delete(&self, key: &K) -> Result<DeleteResponse>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> Result<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// List all users
    async fn list_all(&self) -> Result<Vec<User>>;

    /// Update an existing user, `Error::NotFound` if it does not exist
    async fn update(&self, user: User) -> Result<User>;

    /// Delete a user by ID, `Error::NotFound` if it does not exist
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>>;

    async fn list_all(&self) -> Result<Vec<Post>>;

    async fn update(&self, post: Post) -> Result<Post>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Content of every stored post, no filtering or paging
    async fn list_contents(&self) -> Result<Vec<String>>;
}
