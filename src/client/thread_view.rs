//! Conversation Thread View
//!
//! The ordered message list between the current user and one counterpart.
//! Opening the view marks the conversation read; every send is followed by a
//! full reload through [`ThreadView::reload`].

use tokio_util::sync::CancellationToken;

use super::store::MessageStore;
use crate::shared::messaging::{
    build_thread, conversation_key, ConversationKey, MarkRead, ThreadMessage, UserId,
};

/// Shown when the conversation fetch fails
pub const THREAD_LOAD_ERROR: &str = "Failed to load conversation.";

/// State for one open conversation
#[derive(Debug)]
pub struct ThreadView {
    current_user: UserId,
    other_user: UserId,
    messages: Vec<ThreadMessage>,
    load_error: Option<String>,
    loading: bool,
    cancel: CancellationToken,
}

impl ThreadView {
    pub fn new(current_user: UserId, other_user: UserId) -> Self {
        Self {
            current_user,
            other_user,
            messages: Vec::new(),
            load_error: None,
            loading: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Build from a `/messages/{a}/{b}` route pair. The counterpart is
    /// whichever side is not the current user.
    pub fn for_route(current_user: UserId, a: UserId, b: UserId) -> Self {
        let other = if a == current_user { b } else { a };
        Self::new(current_user, other)
    }

    pub fn current_user(&self) -> UserId {
        self.current_user
    }

    pub fn other_user(&self) -> UserId {
        self.other_user
    }

    pub fn key(&self) -> ConversationKey {
        conversation_key(self.current_user, self.other_user)
    }

    /// Messages, oldest first
    pub fn messages(&self) -> &[ThreadMessage] {
        &self.messages
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Load the thread, then mark it read. A mark-read failure is logged and
    /// otherwise ignored.
    pub async fn open<S>(&mut self, store: &S)
    where
        S: MessageStore + ?Sized,
    {
        self.reload(store).await;
        if self.is_closed() {
            return;
        }

        let request = MarkRead {
            user_id: self.current_user,
            other_user_id: self.other_user,
        };
        if let Err(e) = store.mark_conversation_read(request).await {
            tracing::warn!(
                "Failed to mark messages from {} to {} as read: {}",
                self.other_user,
                self.current_user,
                e
            );
        }
    }

    /// Reconciliation fetch. The result replaces the displayed messages
    /// wholesale; on failure the previous messages are kept.
    pub async fn reload<S>(&mut self, store: &S)
    where
        S: MessageStore + ?Sized,
    {
        if self.is_closed() {
            return;
        }
        self.loading = true;

        let result = store
            .fetch_conversation(self.current_user, self.other_user)
            .await;
        if self.is_closed() {
            self.loading = false;
            tracing::debug!("Thread {} closed, discarding fetch", self.key());
            return;
        }
        self.loading = false;

        match result {
            Ok(records) => {
                self.messages = build_thread(records, self.current_user);
                self.load_error = None;
            }
            Err(e) => {
                tracing::error!("Conversation fetch failed for {}: {}", self.key(), e);
                self.load_error = Some(THREAD_LOAD_ERROR.to_string());
            }
        }
    }
}
