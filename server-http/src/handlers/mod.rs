pub mod health;
pub mod posts;
pub mod users;
pub mod word_counts;

pub use health::health_check;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use users::{create_user, delete_user, get_user, list_users, update_user};
pub use word_counts::{get_word_counts, request_word_counts};
