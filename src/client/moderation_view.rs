//! Moderation View
//!
//! Administrative view over the global feed. Deletes go through an explicit
//! confirmation step:
//!
//! ```text
//! Idle -> Confirming -> Deleting -> Refreshing(report) -> Idle
//! ```
//!
//! Bulk deletes fan out one request per message and wait for all of them,
//! whatever their individual outcome. Every delete ends with a full refresh.

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;

use super::store::MessageStore;
use crate::shared::messaging::{
    export_transcript, filter_groups, group_for_moderation, BatchOutcome, ConversationGroup,
    ConversationKey, MessageId, Transcript,
};
use crate::shared::MessagingError;

/// Shown when the global feed cannot be fetched
pub const MODERATION_LOAD_ERROR: &str = "Failed to load messages.";

/// Shown after a delete batch where at least one request failed
pub const PARTIAL_DELETE_WARNING: &str = "Some messages may not have been deleted.";

/// Shown after a delete batch where every request failed
pub const DELETE_FAILED_ERROR: &str = "Failed to delete message.";

/// What a pending delete applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Conversation(ConversationKey),
    Message(MessageId),
}

/// How a confirmed delete went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteReport {
    Success { deleted: usize },
    PartialFailure(BatchOutcome),
    /// Nothing was deleted
    Failed(BatchOutcome),
}

impl DeleteReport {
    fn from_outcome(outcome: BatchOutcome) -> Self {
        if outcome.is_success() {
            DeleteReport::Success {
                deleted: outcome.deleted.len(),
            }
        } else if outcome.is_total_failure() {
            DeleteReport::Failed(outcome)
        } else {
            DeleteReport::PartialFailure(outcome)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeleteReport::Success { .. })
    }

    /// User-facing warning, if any
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            DeleteReport::Success { .. } => None,
            DeleteReport::PartialFailure(_) => Some(PARTIAL_DELETE_WARNING),
            DeleteReport::Failed(_) => Some(DELETE_FAILED_ERROR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModerationState {
    #[default]
    Idle,
    Confirming(DeleteTarget),
    Deleting(DeleteTarget),
    Refreshing(DeleteReport),
}

/// State for the administrative message screen
#[derive(Debug, Default)]
pub struct ModerationView {
    groups: Vec<ConversationGroup>,
    search: String,
    state: ModerationState,
    load_error: Option<String>,
    last_report: Option<DeleteReport>,
    cancel: CancellationToken,
}

impl ModerationView {
    pub fn new() -> Self {
        Self::default()
    }

    /// All groups, ordered by label
    pub fn groups(&self) -> &[ConversationGroup] {
        &self.groups
    }

    pub fn group(&self, key: &ConversationKey) -> Option<&ConversationGroup> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Groups whose label matches the current search
    pub fn filtered(&self) -> Vec<&ConversationGroup> {
        filter_groups(&self.groups, &self.search)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn state(&self) -> &ModerationState {
        &self.state
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Report of the most recent confirmed delete
    pub fn last_report(&self) -> Option<&DeleteReport> {
        self.last_report.as_ref()
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

    /// Re-read the global feed and regroup it. On failure the previous
    /// groups stay visible.
    pub async fn refresh<S>(&mut self, store: &S)
    where
        S: MessageStore + ?Sized,
    {
        if self.is_closed() {
            return;
        }

        let result = store.fetch_all_messages().await;
        if self.is_closed() {
            tracing::debug!("Moderation view closed, discarding fetch");
            return;
        }

        match result {
            Ok(records) => {
                self.groups = group_for_moderation(records);
                self.load_error = None;
                tracing::debug!("Moderation feed has {} conversations", self.groups.len());
            }
            Err(e) => {
                tracing::error!("Failed to fetch messages: {}", e);
                self.load_error = Some(MODERATION_LOAD_ERROR.to_string());
            }
        }
    }

    /// Ask to delete a whole conversation
    pub fn request_delete_conversation(&mut self, key: ConversationKey) -> Result<(), MessagingError> {
        if self.group(&key).is_none() {
            return Err(MessagingError::not_found(format!("conversation {}", key)));
        }
        self.state = ModerationState::Confirming(DeleteTarget::Conversation(key));
        Ok(())
    }

    /// Ask to delete a single message
    pub fn request_delete_message(&mut self, id: MessageId) -> Result<(), MessagingError> {
        let known = self
            .groups
            .iter()
            .any(|g| g.messages.iter().any(|m| m.id == id));
        if !known {
            return Err(MessagingError::not_found(format!("message {}", id)));
        }
        self.state = ModerationState::Confirming(DeleteTarget::Message(id));
        Ok(())
    }

    /// Drop a pending confirmation
    pub fn cancel_delete(&mut self) {
        if matches!(self.state, ModerationState::Confirming(_)) {
            self.state = ModerationState::Idle;
        }
    }

    /// Carry out the pending delete, then refresh from the store.
    ///
    /// If the view is closed while deletes are in flight, the report is still
    /// returned but the view's state is left untouched.
    pub async fn confirm<S>(&mut self, store: &S) -> Result<DeleteReport, MessagingError>
    where
        S: MessageStore + ?Sized,
    {
        let target = match &self.state {
            ModerationState::Confirming(target) => target.clone(),
            _ => return Err(MessagingError::not_found("pending delete")),
        };

        let ids = match &target {
            DeleteTarget::Conversation(key) => self
                .group(key)
                .map(ConversationGroup::message_ids)
                .unwrap_or_default(),
            DeleteTarget::Message(id) => vec![*id],
        };
        self.state = ModerationState::Deleting(target.clone());

        let results = join_all(ids.into_iter().map(|id| async move {
            let result = store.delete_message(id).await;
            (id, result)
        }))
        .await;
        let outcome = BatchOutcome::from_results(results);

        match &target {
            DeleteTarget::Conversation(key) => tracing::info!(
                "Deleted {}/{} messages of conversation {}",
                outcome.deleted.len(),
                outcome.attempted,
                key
            ),
            DeleteTarget::Message(id) => tracing::info!("Delete of message {} attempted", id),
        }
        for (id, e) in &outcome.failed {
            tracing::warn!("Delete of message {} failed: {}", id, e);
        }

        let report = DeleteReport::from_outcome(outcome);
        if self.is_closed() {
            tracing::debug!("Moderation view closed during delete, discarding state");
            return Ok(report);
        }
        self.state = ModerationState::Refreshing(report.clone());
        self.refresh(store).await;
        if self.is_closed() {
            return Ok(report);
        }

        self.state = ModerationState::Idle;
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Request and confirm a conversation delete in one step
    pub async fn delete_conversation<S>(
        &mut self,
        store: &S,
        key: ConversationKey,
    ) -> Result<DeleteReport, MessagingError>
    where
        S: MessageStore + ?Sized,
    {
        self.request_delete_conversation(key)?;
        self.confirm(store).await
    }

    /// Request and confirm a single message delete in one step
    pub async fn delete_message<S>(
        &mut self,
        store: &S,
        id: MessageId,
    ) -> Result<DeleteReport, MessagingError>
    where
        S: MessageStore + ?Sized,
    {
        self.request_delete_message(id)?;
        self.confirm(store).await
    }

    /// Plain-text transcript of one conversation. Read-only.
    pub fn export(&self, key: &ConversationKey) -> Result<Transcript, MessagingError> {
        self.group(key)
            .map(export_transcript)
            .ok_or_else(|| MessagingError::not_found(format!("conversation {}", key)))
    }
}
