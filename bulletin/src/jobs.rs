use crate::domain::{Post, User};
use crate::mailer::{Email, Mailer};
use crate::ports::{PostRepository, UserRepository};
use crate::word_count::WordCountAggregator;
use shared::{Error, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info};

/// Background work that request handlers hand off without waiting
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Job {
    CountWords,
    ThankYou { post_id: String },
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::CountWords => "count_words",
            Job::ThankYou { .. } => "thank_you",
        }
    }
}

/// Sending half of the job queue. Enqueueing never blocks and yields no handle.
#[derive(Clone, Debug)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl JobQueue {
    pub fn enqueue(&self, job: Job) -> Result<()> {
        debug!("Enqueueing {} job", job.name());
        self.sender.send(job).map_err(|_| Error::QueueClosed)
    }
}

pub fn job_queue() -> (JobQueue, mpsc::UnboundedReceiver<Job>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (JobQueue { sender }, receiver)
}

/// Executes a single job against the application collaborators
pub struct JobRunner {
    aggregator: WordCountAggregator,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
}

impl JobRunner {
    pub fn new(
        aggregator: WordCountAggregator,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            aggregator,
            posts,
            users,
            mailer,
        }
    }

    pub async fn execute(&self, job: &Job) -> Result<()> {
        match job {
            Job::CountWords => {
                self.aggregator.run().await?;
            }
            Job::ThankYou { post_id } => {
                let (user, post) = self.load_author(post_id).await?;
                self.mailer.deliver(&Email::thank_you(&user, &post)).await?;
            }
        }
        Ok(())
    }

    async fn load_author(&self, post_id: &str) -> Result<(User, Post)> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(Error::NotFound)?;
        let user = self
            .users
            .find_by_id(&post.user_id)
            .await?
            .ok_or(Error::NotFound)?;
        Ok((user, post))
    }
}

/// Receiving half of the queue. Each job runs on its own task, so runs of the
/// same job may overlap; failures are logged and not retried.
pub struct JobWorker {
    receiver: mpsc::UnboundedReceiver<Job>,
    runner: Arc<JobRunner>,
}

impl JobWorker {
    pub fn new(receiver: mpsc::UnboundedReceiver<Job>, runner: Arc<JobRunner>) -> Self {
        Self { receiver, runner }
    }

    /// Process jobs until every `JobQueue` handle has been dropped, then wait
    /// for the jobs still in flight
    pub async fn run(mut self) {
        info!("Job worker started");
        let mut running = JoinSet::new();

        loop {
            tokio::select! {
                job = self.receiver.recv() => match job {
                    Some(job) => {
                        let runner = Arc::clone(&self.runner);
                        running.spawn(async move {
                            match runner.execute(&job).await {
                                Ok(()) => debug!("{} job completed", job.name()),
                                Err(e) => error!("{} job failed: {}", job.name(), e),
                            }
                        });
                    }
                    None => break,
                },
                Some(finished) = running.join_next(), if !running.is_empty() => {
                    log_join(finished);
                }
            }
        }

        if !running.is_empty() {
            info!("Job queue closed, waiting for {} running job(s)", running.len());
        }
        while let Some(finished) = running.join_next().await {
            log_join(finished);
        }

        info!("Job worker stopped");
    }
}

fn log_join(finished: std::result::Result<(), JoinError>) {
    if let Err(e) = finished {
        error!("Job task aborted: {}", e);
    }
}

/// Create a queue and spawn its worker on the current runtime
pub fn spawn_worker(runner: Arc<JobRunner>) -> (JobQueue, JoinHandle<()>) {
    let (queue, receiver) = job_queue();
    let handle = tokio::spawn(JobWorker::new(receiver, runner).run());
    (queue, handle)
}
