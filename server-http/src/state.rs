use bulletin::jobs::{JobRunner, spawn_worker};
use bulletin::persistence::{SledPostRepository, SledUserRepository, open_db};
use bulletin::ports::{PostRepository, UserRepository};
use bulletin::{JobQueue, LogMailer, WordCountAggregator};
use shared::config::Config;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub word_counts: WordCountAggregator,
    pub jobs: JobQueue,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        word_counts: WordCountAggregator,
        jobs: JobQueue,
    ) -> Self {
        Self {
            users,
            posts,
            word_counts,
            jobs,
        }
    }

    /// Open storage, build the cache and start the background job worker
    pub fn init(config: &Config) -> shared::Result<(Self, JoinHandle<()>)> {
        let db_path = Path::new(&config.data_dir).join("bulletin.sled");
        tracing::info!("Opening database at {}", db_path.display());
        let db = open_db(&db_path)?;

        let users: Arc<dyn UserRepository> = Arc::new(SledUserRepository::new(&db)?);
        let posts: Arc<dyn PostRepository> = Arc::new(SledPostRepository::new(&db)?);

        let cache = storage_engine::build_cache(config.cache_backend, config.cache_capacity);
        let word_counts = WordCountAggregator::new(posts.clone(), cache);

        let runner = Arc::new(JobRunner::new(
            word_counts.clone(),
            posts.clone(),
            users.clone(),
            Arc::new(LogMailer),
        ));
        let (jobs, worker) = spawn_worker(runner);

        Ok((Self::new(users, posts, word_counts, jobs), worker))
    }
}
