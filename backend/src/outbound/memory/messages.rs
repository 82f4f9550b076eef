//! Direct messages.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{MemoryStore, require_row};
use crate::domain::ports::{MessageRepository, PersistenceError};
use crate::domain::{Message, MessageId, NewMessage, UserId};

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn insert(&self, message: &NewMessage) -> Result<Message, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.users.contains(message.sender_id.get()),
                "messages_sender_id_fkey",
            )?;
            require_row(
                tables.users.contains(message.recipient_id.get()),
                "messages_recipient_id_fkey",
            )?;
            Ok(tables.messages.insert_with(|id| Message {
                id: MessageId::new(id),
                sender_id: message.sender_id,
                recipient_id: message.recipient_id,
                text: message.text.clone(),
                sent_at: message.sent_at,
                read_at: None,
            }))
        })
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.messages.get(id.get()).cloned()))
    }

    async fn inbox(&self, recipient: UserId) -> Result<Vec<Message>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Message> = tables
                .messages
                .values()
                .filter(|row| row.recipient_id == recipient)
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.sent_at, row.id)));
            Ok(rows)
        })
    }

    async fn mark_read(
        &self,
        id: MessageId,
        at: DateTime<Utc>,
    ) -> Result<Option<Message>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables.messages.get_mut(id.get()).map(|row| {
                row.read_at.get_or_insert(at);
                row.clone()
            }))
        })
    }
}
