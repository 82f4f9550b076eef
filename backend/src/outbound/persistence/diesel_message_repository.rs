//! PostgreSQL-backed [`MessageRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessageRepository, PersistenceError};
use crate::domain::{Message, MessageId, NewMessage, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::DbPool;
use super::schema::messages;

/// Diesel adapter for direct messages.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMessageRow {
            sender_id: message.sender_id.get(),
            recipient_id: message.recipient_id.get(),
            text: message.text.as_str(),
            sent_at: message.sent_at,
        };
        let stored: MessageRow = diesel::insert_into(messages::table)
            .values(&row)
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MessageRow> = messages::table
            .find(id.get())
            .select(MessageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn inbox(&self, recipient: UserId) -> Result<Vec<Message>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::recipient_id.eq(recipient.get()))
            .order((messages::sent_at.desc(), messages::id.desc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn mark_read(
        &self,
        id: MessageId,
        at: DateTime<Utc>,
    ) -> Result<Option<Message>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Only the first read is recorded; later calls leave the row alone.
        diesel::update(
            messages::table
                .find(id.get())
                .filter(messages::read_at.is_null()),
        )
        .set(messages::read_at.eq(Some(at)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        let row: Option<MessageRow> = messages::table
            .find(id.get())
            .select(MessageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }
}
