pub mod domain;
pub mod jobs;
pub mod mailer;
pub mod persistence;
pub mod ports;
pub mod word_count;

pub use domain::{Post, User};
pub use jobs::{Job, JobQueue, JobRunner, JobWorker};
pub use mailer::{Email, LogMailer, Mailer};
pub use word_count::{WordCountAggregator, WordCounts};
