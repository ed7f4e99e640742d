pub mod sled_store;

pub use sled_store::{SledPostRepository, SledUserRepository, open_db};
