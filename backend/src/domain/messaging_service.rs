//! Messaging service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::permissions::PermissionEngine;
use crate::domain::ports::{MessageRepository, Messaging, UserRepository};
use crate::domain::service_support::{
    AuditTrail, Repositories, bounded_text, found, map_persistence_error,
};
use crate::domain::{
    Actor, AuditAction, AuditTarget, Error, Message, MessageId, NewMessage, TargetKind, UserId,
};

const MESSAGE_TEXT_MAX: usize = 5000;

/// Implements [`Messaging`].
#[derive(Clone)]
pub struct MessagingService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    permissions: PermissionEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
}

impl MessagingService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            messages: Arc::clone(&repos.messages),
            users: Arc::clone(&repos.users),
            permissions: PermissionEngine::new(repos),
            audit: AuditTrail::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }
}

#[async_trait]
impl Messaging for MessagingService {
    async fn send_message(
        &self,
        actor: &Actor,
        recipient: UserId,
        text: String,
    ) -> Result<Message, Error> {
        let sender = self.permissions.account(actor).await?;
        let text = bounded_text("text", &text, MESSAGE_TEXT_MAX)?;
        if recipient == sender.id {
            return Err(Error::invalid_request("cannot send a message to yourself"));
        }
        found(
            self.users
                .find_by_id(recipient)
                .await
                .map_err(map_persistence_error)?,
            "recipient",
        )?;
        let message = self
            .messages
            .insert(&NewMessage {
                sender_id: sender.id,
                recipient_id: recipient,
                text,
                sent_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::SendMessage,
                AuditTarget::new(TargetKind::Message, message.id),
            )
            .await;
        Ok(message)
    }

    async fn inbox(&self, actor: &Actor) -> Result<Vec<Message>, Error> {
        let account = self.permissions.account(actor).await?;
        self.messages
            .inbox(account.id)
            .await
            .map_err(map_persistence_error)
    }

    async fn mark_read(&self, actor: &Actor, message: MessageId) -> Result<Message, Error> {
        let stored = found(
            self.messages
                .find_by_id(message)
                .await
                .map_err(map_persistence_error)?,
            "message",
        )?;
        if stored.recipient_id != actor.user_id() {
            return Err(Error::forbidden("only the recipient may mark a message read"));
        }
        if stored.is_read() {
            return Ok(stored);
        }
        found(
            self.messages
                .mark_read(stored.id, self.clock.utc())
                .await
                .map_err(map_persistence_error)?,
            "message",
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::test_fixtures::{MockPorts, actor, fixed_now, user};
    use crate::domain::{ErrorCode, UserRole};

    fn service(ports: MockPorts) -> MessagingService {
        MessagingService::new(&ports.into_repositories())
    }

    fn message(read: bool) -> Message {
        Message {
            id: MessageId::new(1),
            sender_id: UserId::new(2),
            recipient_id: UserId::new(3),
            text: "Field trip on Friday".to_owned(),
            sent_at: fixed_now(),
            read_at: read.then(fixed_now),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn messages_need_an_existing_recipient() {
        let mut ports = MockPorts::new();
        ports.users.expect_find_by_id().returning(|id| {
            Ok((id == UserId::new(2)).then(|| user(2, UserRole::Teacher)))
        });
        ports.messages.expect_insert().never();

        let err = service(ports)
            .send_message(&actor(2), UserId::new(40), "Hello".to_owned())
            .await
            .expect_err("unknown recipient");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn sent_messages_start_unread() {
        let mut ports = MockPorts::new().allow_audit();
        ports
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id.get(), UserRole::Teacher))));
        ports
            .messages
            .expect_insert()
            .withf(|m| m.recipient_id == UserId::new(3) && m.text == "Hello")
            .times(1)
            .returning(|_| Ok(message(false)));

        let sent = service(ports)
            .send_message(&actor(2), UserId::new(3), " Hello ".to_owned())
            .await
            .expect("sent");
        assert!(!sent.is_read());
    }

    #[rstest]
    #[tokio::test]
    async fn only_recipient_marks_read() {
        let mut ports = MockPorts::new();
        ports
            .messages
            .expect_find_by_id()
            .return_once(|_| Ok(Some(message(false))));
        ports.messages.expect_mark_read().never();

        let err = service(ports)
            .mark_read(&actor(2), MessageId::new(1))
            .await
            .expect_err("sender");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn marking_twice_keeps_first_timestamp() {
        let mut ports = MockPorts::new();
        ports
            .messages
            .expect_find_by_id()
            .return_once(|_| Ok(Some(message(true))));
        ports.messages.expect_mark_read().never();

        let read = service(ports)
            .mark_read(&actor(3), MessageId::new(1))
            .await
            .expect("already read");
        assert_eq!(read.read_at, Some(fixed_now()));
    }
}
