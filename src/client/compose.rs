//! Send Pipeline
//!
//! The composer validates the draft, sends it, and reconciles the thread
//! from the store. Nothing is appended locally; the only optimistic step is
//! clearing the draft once the store confirms the send.

use std::time::Duration;

use super::config::Config;
use super::store::MessageStore;
use super::thread_view::ThreadView;
use crate::shared::config::DEFAULT_RECONCILE_DELAY;
use crate::shared::messaging::{Message, NewMessage};
use crate::shared::MessagingError;

/// Shown when the store rejects or never answers a send
pub const SEND_ERROR: &str = "Failed to send message. Please try again.";

/// Reject blank drafts. Returns the trimmed content.
pub fn validate_content(content: &str) -> Result<&str, MessagingError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(MessagingError::validation("content", "Message cannot be empty"));
    }
    Ok(trimmed)
}

/// Draft and send state for one thread
#[derive(Debug, Clone)]
pub struct Composer {
    draft: String,
    error: Option<String>,
    reconcile_delay: Duration,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            draft: String::new(),
            error: None,
            reconcile_delay: DEFAULT_RECONCILE_DELAY,
        }
    }
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the reconcile delay from `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new().with_reconcile_delay(config.reconcile_delay())
    }

    pub fn with_reconcile_delay(mut self, delay: Duration) -> Self {
        self.reconcile_delay = delay;
        self
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_send(&self) -> bool {
        validate_content(&self.draft).is_ok()
    }

    /// Send the draft from the thread's current user to its counterpart.
    ///
    /// A blank draft fails with `Validation` without touching the store. On a
    /// confirmed send the draft is cleared and, after the reconcile delay, the
    /// thread is reloaded. On a store failure the draft is kept and the
    /// retryable send error is set. If the thread is closed while the send is
    /// in flight, the outcome is returned and neither draft nor thread change.
    pub async fn send<S>(
        &mut self,
        store: &S,
        thread: &mut ThreadView,
    ) -> Result<Message, MessagingError>
    where
        S: MessageStore + ?Sized,
    {
        let content = validate_content(&self.draft)?.to_string();
        let request = NewMessage {
            sender_id: thread.current_user(),
            receiver_id: thread.other_user(),
            content,
        };

        let result = store.send_message(request).await;
        if thread.is_closed() {
            tracing::debug!("Thread {} closed during send, discarding", thread.key());
            return result;
        }

        match result {
            Ok(sent) => {
                self.draft.clear();
                self.error = None;

                if !self.reconcile_delay.is_zero() {
                    tokio::time::sleep(self.reconcile_delay).await;
                }
                thread.reload(store).await;
                Ok(sent)
            }
            Err(e) => {
                tracing::error!(
                    "Send from {} to {} failed: {}",
                    thread.current_user(),
                    thread.other_user(),
                    e
                );
                self.error = Some(SEND_ERROR.to_string());
                Err(e)
            }
        }
    }
}
