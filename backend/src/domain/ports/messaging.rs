//! Driving port for direct messages.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Message, MessageId, UserId};

/// Messaging use-cases consumed by inbound adapters.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Send a message to another user.
    async fn send_message(
        &self,
        actor: &Actor,
        recipient: UserId,
        text: String,
    ) -> Result<Message, Error>;

    /// Messages addressed to the actor, newest first.
    async fn inbox(&self, actor: &Actor) -> Result<Vec<Message>, Error>;

    /// Mark one of the actor's messages as read.
    async fn mark_read(&self, actor: &Actor, message: MessageId) -> Result<Message, Error>;
}
