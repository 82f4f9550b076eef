//! Port for direct messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::PersistenceError;
use crate::domain::{Message, MessageId, NewMessage, UserId};

/// Storage for messages between users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert an unread message.
    async fn insert(&self, message: &NewMessage) -> Result<Message, PersistenceError>;

    /// Fetch a message by id.
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, PersistenceError>;

    /// Messages addressed to `recipient`, newest first.
    async fn inbox(&self, recipient: UserId) -> Result<Vec<Message>, PersistenceError>;

    /// Set the read timestamp unless one is already recorded, returning the
    /// stored message.
    async fn mark_read(
        &self,
        id: MessageId,
        at: DateTime<Utc>,
    ) -> Result<Option<Message>, PersistenceError>;
}
