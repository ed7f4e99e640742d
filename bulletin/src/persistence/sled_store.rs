use crate::domain::{Post, User};
use crate::ports::{PostRepository, UserRepository};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Error, Result};
use sled::{Db, Tree};
use std::path::Path;

const USERS_TREE: &str = "users";
const POSTS_TREE: &str = "posts";

/// Open (or create) the sled database backing the bulletin board
/// Creates the parent directory if it doesn't exist
pub fn open_db(path: impl AsRef<Path>) -> Result<Db> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;
    }

    sled::open(path).map_err(|e| Error::Storage(format!("Failed to open Sled database: {}", e)))
}

fn open_tree(db: &Db, name: &str) -> Result<Tree> {
    db.open_tree(name)
        .map_err(|e| Error::Storage(format!("Failed to open tree '{}': {}", name, e)))
}

fn read_record<T: DeserializeOwned>(tree: &Tree, id: &str) -> Result<Option<T>> {
    let value = tree
        .get(id.as_bytes())
        .map_err(|e| Error::Storage(format!("Failed to get record: {}", e)))?;

    match value {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn write_record<T: Serialize>(tree: &Tree, id: &str, record: &T) -> Result<()> {
    let value = serde_json::to_vec(record)?;
    tree.insert(id.as_bytes(), value)
        .map_err(|e| Error::Storage(format!("Failed to save record: {}", e)))?;
    Ok(())
}

fn read_all<T: DeserializeOwned>(tree: &Tree) -> Result<Vec<T>> {
    let mut records = Vec::new();

    for item in tree.iter() {
        let (_, value) =
            item.map_err(|e| Error::Storage(format!("Failed to iterate tree: {}", e)))?;
        records.push(serde_json::from_slice(&value)?);
    }

    Ok(records)
}

fn contains(tree: &Tree, id: &str) -> Result<bool> {
    tree.contains_key(id.as_bytes())
        .map_err(|e| Error::Storage(format!("Failed to look up record: {}", e)))
}

fn remove(tree: &Tree, id: &str) -> Result<()> {
    let removed = tree
        .remove(id.as_bytes())
        .map_err(|e| Error::Storage(format!("Failed to delete record: {}", e)))?;

    match removed {
        Some(_) => Ok(()),
        None => Err(Error::NotFound),
    }
}

#[derive(Clone)]
pub struct SledUserRepository {
    tree: Tree,
}

impl SledUserRepository {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            tree: open_tree(db, USERS_TREE)?,
        })
    }
}

#[async_trait]
impl UserRepository for SledUserRepository {
    async fn create(&self, user: User) -> Result<User> {
        write_record(&self.tree, &user.id, &user)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        read_record(&self.tree, id)
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = read_all(&self.tree)?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User> {
        if !contains(&self.tree, &user.id)? {
            return Err(Error::NotFound);
        }
        write_record(&self.tree, &user.id, &user)?;
        Ok(user)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        remove(&self.tree, id)
    }
}

#[derive(Clone)]
pub struct SledPostRepository {
    tree: Tree,
}

impl SledPostRepository {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            tree: open_tree(db, POSTS_TREE)?,
        })
    }
}

#[async_trait]
impl PostRepository for SledPostRepository {
    async fn create(&self, post: Post) -> Result<Post> {
        write_record(&self.tree, &post.id, &post)?;
        Ok(post)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>> {
        read_record(&self.tree, id)
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = read_all(&self.tree)?;
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(posts)
    }

    async fn update(&self, post: Post) -> Result<Post> {
        if !contains(&self.tree, &post.id)? {
            return Err(Error::NotFound);
        }
        write_record(&self.tree, &post.id, &post)?;
        Ok(post)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        remove(&self.tree, id)
    }

    async fn list_contents(&self) -> Result<Vec<String>> {
        let posts: Vec<Post> = read_all(&self.tree)?;
        Ok(posts.into_iter().map(|post| post.content).collect())
    }
}
