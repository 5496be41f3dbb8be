//! In-memory message store
//!
//! A [`MessageStore`] backed by a map, used by tests and by embedders that
//! want to exercise the views without a server. Ids increase from 1 and
//! `sent_at` advances one second per send from a fixed epoch, so results are
//! reproducible. Failures can be injected per operation or per message id.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::store::{MessageStore, StoreResult};
use crate::shared::messaging::{MarkRead, Message, MessageId, MessageRecord, NewMessage, UserId};
use crate::shared::MessagingError;

/// Store operations, for failure injection and call accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchInbox,
    FetchConversation,
    SendMessage,
    MarkConversationRead,
    MarkMessageRead,
    FetchAllMessages,
    DeleteMessage,
}

#[derive(Debug)]
struct StoreState {
    messages: BTreeMap<MessageId, MessageRecord>,
    usernames: HashMap<UserId, String>,
    next_id: MessageId,
    clock: DateTime<Utc>,
    fail_next: HashMap<Operation, MessagingError>,
    failing_deletes: HashSet<MessageId>,
    cancel_on: HashMap<Operation, CancellationToken>,
    calls: HashMap<Operation, usize>,
}

impl StoreState {
    fn enter(&mut self, op: Operation) -> StoreResult<()> {
        *self.calls.entry(op).or_insert(0) += 1;
        if let Some(token) = self.cancel_on.remove(&op) {
            token.cancel();
        }
        match self.fail_next.remove(&op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::seconds(1);
        self.clock
    }
}

/// Map-backed [`MessageStore`]
#[derive(Debug)]
pub struct InMemoryMessageStore {
    state: RwLock<StoreState>,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        let epoch = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            state: RwLock::new(StoreState {
                messages: BTreeMap::new(),
                usernames: HashMap::new(),
                next_id: 1,
                clock: epoch,
                fail_next: HashMap::new(),
                failing_deletes: HashSet::new(),
                cancel_on: HashMap::new(),
                calls: HashMap::new(),
            }),
        }
    }

    /// Register a display name attached to messages on send
    pub async fn register_user(&self, id: UserId, username: impl Into<String>) {
        self.state.write().await.usernames.insert(id, username.into());
    }

    /// Seed a raw record, bypassing validation. Later sends get larger ids.
    pub async fn insert(&self, record: MessageRecord) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(record.id + 1);
        if record.sent_at > state.clock {
            state.clock = record.sent_at;
        }
        state.messages.insert(record.id, record);
    }

    /// Make the next call of `op` fail with `error`
    pub async fn fail_next(&self, op: Operation, error: MessagingError) {
        self.state.write().await.fail_next.insert(op, error);
    }

    /// Make every delete of `id` fail
    pub async fn fail_delete_of(&self, id: MessageId) {
        self.state.write().await.failing_deletes.insert(id);
    }

    /// Cancel `token` when `op` is next called, as if the caller's view was
    /// closed while the request was in flight
    pub async fn cancel_during(&self, op: Operation, token: CancellationToken) {
        self.state.write().await.cancel_on.insert(op, token);
    }

    /// Number of calls `op` has received
    pub async fn call_count(&self, op: Operation) -> usize {
        self.state.read().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Every stored record, by id
    pub async fn snapshot(&self) -> Vec<MessageRecord> {
        self.state.read().await.messages.values().cloned().collect()
    }

    /// Look up one stored record
    pub async fn get(&self, id: MessageId) -> Option<MessageRecord> {
        self.state.read().await.messages.get(&id).cloned()
    }
}

fn not_found(id: MessageId) -> MessagingError {
    MessagingError::server(404, format!("Message {} not found", id))
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn fetch_inbox(&self, current_user: UserId) -> StoreResult<Vec<MessageRecord>> {
        let mut state = self.state.write().await;
        state.enter(Operation::FetchInbox)?;
        Ok(state
            .messages
            .values()
            .filter(|m| m.sender_id == Some(current_user) || m.receiver_id == Some(current_user))
            .cloned()
            .collect())
    }

    async fn fetch_conversation(&self, a: UserId, b: UserId) -> StoreResult<Vec<MessageRecord>> {
        let mut state = self.state.write().await;
        state.enter(Operation::FetchConversation)?;
        Ok(state
            .messages
            .values()
            .filter(|m| {
                (m.sender_id == Some(a) && m.receiver_id == Some(b))
                    || (m.sender_id == Some(b) && m.receiver_id == Some(a))
            })
            .cloned()
            .collect())
    }

    async fn send_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        state.enter(Operation::SendMessage)?;

        if message.content.trim().is_empty() {
            return Err(MessagingError::validation("content", "Message content is required"));
        }
        if message.sender_id == message.receiver_id {
            return Err(MessagingError::validation("receiverId", "Cannot message yourself"));
        }

        let id = state.next_id;
        state.next_id += 1;
        let sent = Message {
            id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            sent_at: state.tick(),
            seen: false,
            sender_username: state.usernames.get(&message.sender_id).cloned(),
            receiver_username: state.usernames.get(&message.receiver_id).cloned(),
        };
        state.messages.insert(id, MessageRecord::from(sent.clone()));
        Ok(sent)
    }

    async fn mark_conversation_read(&self, request: MarkRead) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.enter(Operation::MarkConversationRead)?;
        for record in state.messages.values_mut() {
            if record.receiver_id == Some(request.user_id)
                && record.sender_id == Some(request.other_user_id)
            {
                record.seen = true;
            }
        }
        Ok(())
    }

    async fn mark_message_read(&self, id: MessageId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.enter(Operation::MarkMessageRead)?;
        let record = state.messages.get_mut(&id).ok_or_else(|| not_found(id))?;
        record.seen = true;
        Ok(())
    }

    async fn fetch_all_messages(&self) -> StoreResult<Vec<MessageRecord>> {
        let mut state = self.state.write().await;
        state.enter(Operation::FetchAllMessages)?;
        Ok(state.messages.values().cloned().collect())
    }

    async fn delete_message(&self, id: MessageId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.enter(Operation::DeleteMessage)?;
        if state.failing_deletes.contains(&id) {
            return Err(MessagingError::server(500, format!("Failed to delete message {}", id)));
        }
        state.messages.remove(&id).ok_or_else(|| not_found(id))?;
        Ok(())
    }
}
