//! Inbox View
//!
//! One user's conversation list, re-derived from the store on every refresh.

use tokio_util::sync::CancellationToken;

use super::store::MessageStore;
use crate::shared::messaging::{aggregate_inbox, total_unread, InboxEntry, UserId};

/// Shown when the inbox fetch fails
pub const INBOX_LOAD_ERROR: &str = "Failed to load your messages.";

/// State for the inbox screen
#[derive(Debug)]
pub struct InboxView {
    current_user: UserId,
    entries: Vec<InboxEntry>,
    error: Option<String>,
    loading: bool,
    cancel: CancellationToken,
}

impl InboxView {
    pub fn new(current_user: UserId) -> Self {
        Self {
            current_user,
            entries: Vec::new(),
            error: None,
            loading: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn current_user(&self) -> UserId {
        self.current_user
    }

    /// Entries, most recent conversation first
    pub fn entries(&self) -> &[InboxEntry] {
        &self.entries
    }

    /// Entry for one counterpart, if a conversation exists
    pub fn entry_for(&self, counterpart: UserId) -> Option<&InboxEntry> {
        self.entries.iter().find(|e| e.counterpart_id == counterpart)
    }

    pub fn total_unread(&self) -> u32 {
        total_unread(&self.entries)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Token cancelled by [`InboxView::close`]; clone it to close from another task
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop applying results. Fetches already in flight are discarded.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Re-read the inbox. On failure the previous entries stay visible.
    pub async fn refresh<S>(&mut self, store: &S)
    where
        S: MessageStore + ?Sized,
    {
        if self.is_closed() {
            return;
        }
        self.loading = true;

        let result = store.fetch_inbox(self.current_user).await;
        if self.is_closed() {
            self.loading = false;
            tracing::debug!("Inbox for user {} closed, discarding fetch", self.current_user);
            return;
        }
        self.loading = false;

        match result {
            Ok(records) => {
                self.entries = aggregate_inbox(records, self.current_user);
                self.error = None;
                tracing::debug!(
                    "Inbox for user {} has {} conversations",
                    self.current_user,
                    self.entries.len()
                );
            }
            Err(e) => {
                tracing::error!("Inbox fetch failed for user {}: {}", self.current_user, e);
                self.error = Some(INBOX_LOAD_ERROR.to_string());
            }
        }
    }
}
