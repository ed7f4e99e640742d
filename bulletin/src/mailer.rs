use crate::domain::{Post, User};
use async_trait::async_trait;
use shared::Result;
use tracing::info;

pub const THANK_YOU_SUBJECT: &str = "Thank you for your post";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// Message sent to the author of a freshly created post
    pub fn thank_you(user: &User, post: &Post) -> Self {
        Self {
            to: user.email.clone(),
            subject: THANK_YOU_SUBJECT.to_string(),
            body: format!(
                "Hi {},\n\nThanks for posting to the board:\n\n> {}\n",
                user.name,
                post.content.lines().collect::<Vec<_>>().join("\n> ")
            ),
        }
    }
}

/// Port for outgoing mail
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, email: &Email) -> Result<()>;
}

/// Mailer that only writes deliveries to the log
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, email: &Email) -> Result<()> {
        info!(to = %email.to, subject = %email.subject, "Delivering email");
        Ok(())
    }
}
