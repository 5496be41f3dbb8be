//! Message Store Access
//!
//! The store is the single source of truth for messages. Every view reads
//! through this trait and re-reads after every mutation it performs.

use async_trait::async_trait;

use crate::shared::messaging::{MarkRead, Message, MessageId, MessageRecord, NewMessage, UserId};
use crate::shared::MessagingError;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, MessagingError>;

/// Remote message store
///
/// Feeds are returned unsorted and may contain records with missing endpoint
/// ids; consumers are expected to tolerate them.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Every message where `current_user` is sender or receiver
    async fn fetch_inbox(&self, current_user: UserId) -> StoreResult<Vec<MessageRecord>>;

    /// Every message exchanged between `a` and `b`
    async fn fetch_conversation(&self, a: UserId, b: UserId) -> StoreResult<Vec<MessageRecord>>;

    /// Create a message; the store assigns `id` and `sent_at`
    async fn send_message(&self, message: NewMessage) -> StoreResult<Message>;

    /// Mark everything `other_user_id` sent to `user_id` as read. Idempotent.
    async fn mark_conversation_read(&self, request: MarkRead) -> StoreResult<()>;

    /// Mark one message as read. Idempotent.
    async fn mark_message_read(&self, id: MessageId) -> StoreResult<()>;

    /// Administrative: the global feed
    async fn fetch_all_messages(&self) -> StoreResult<Vec<MessageRecord>>;

    /// Administrative: delete one message
    async fn delete_message(&self, id: MessageId) -> StoreResult<()>;
}
