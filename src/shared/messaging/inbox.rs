//! Inbox Aggregation
//!
//! Reduces the raw inbox feed of one user to one entry per counterpart,
//! newest conversation first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::message::{Message, MessageRecord, UserId};

/// Preview length used by list renderers
pub const PREVIEW_LEN: usize = 60;

/// One conversation in a user's inbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboxEntry {
    /// The other participant
    pub counterpart_id: UserId,
    /// Display name of the other participant, from the newest message that has one
    pub counterpart_username: Option<String>,
    /// Newest message by `(sent_at, id)`
    pub latest: Message,
    /// Any message addressed to the current user is unread
    pub has_unread: bool,
    /// Number of unread messages addressed to the current user
    pub unread_count: u32,
    /// Messages exchanged with this counterpart in the feed
    pub message_count: u32,
}

impl InboxEntry {
    fn start(counterpart_id: UserId, message: Message) -> Self {
        Self {
            counterpart_id,
            counterpart_username: None,
            latest: message,
            has_unread: false,
            unread_count: 0,
            message_count: 0,
        }
    }

    /// Name to show in the list
    pub fn display_name(&self) -> String {
        self.counterpart_username
            .clone()
            .unwrap_or_else(|| format!("User {}", self.counterpart_id))
    }

    /// Truncated latest content
    pub fn preview(&self) -> String {
        self.latest.preview(PREVIEW_LEN)
    }
}

/// Build the inbox of `current_user` from an unsorted feed.
///
/// Records without both endpoint ids, or that do not involve `current_user`,
/// are skipped. Entries are ordered by their latest message, newest first,
/// with the message id breaking timestamp ties so the order is deterministic.
pub fn aggregate_inbox<I>(records: I, current_user: UserId) -> Vec<InboxEntry>
where
    I: IntoIterator<Item = MessageRecord>,
{
    let mut groups: HashMap<UserId, InboxEntry> = HashMap::new();
    // Newest message seen so far that carried the counterpart's name
    let mut named: HashMap<UserId, (Message, String)> = HashMap::new();

    for record in records {
        let message = match Message::try_from(record) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Skipping malformed inbox record: {}", e);
                continue;
            }
        };
        let Some(counterpart) = message.counterpart(current_user) else {
            tracing::debug!(
                "Skipping message {} not addressed to or from user {}",
                message.id,
                current_user
            );
            continue;
        };
        if counterpart == current_user {
            tracing::warn!("Skipping self-addressed message {}", message.id);
            continue;
        }

        if let Some(name) = message.counterpart_username(current_user) {
            let newer = named
                .get(&counterpart)
                .map(|(seen, _)| message.order_key() > seen.order_key())
                .unwrap_or(true);
            if newer {
                named.insert(counterpart, (message.clone(), name.to_string()));
            }
        }

        let entry = groups
            .entry(counterpart)
            .or_insert_with(|| InboxEntry::start(counterpart, message.clone()));

        entry.message_count += 1;
        if message.is_unread_for(current_user) {
            entry.has_unread = true;
            entry.unread_count += 1;
        }
        if message.order_key() > entry.latest.order_key() {
            entry.latest = message;
        }
    }

    let mut entries: Vec<InboxEntry> = groups
        .into_iter()
        .map(|(counterpart, mut entry)| {
            entry.counterpart_username = named.remove(&counterpart).map(|(_, name)| name);
            entry
        })
        .collect();

    entries.sort_by(|a, b| {
        b.latest
            .order_key()
            .cmp(&a.latest.order_key())
            .then_with(|| a.counterpart_id.cmp(&b.counterpart_id))
    });
    entries
}

/// Total unread messages across the inbox
pub fn total_unread(entries: &[InboxEntry]) -> u32 {
    entries.iter().map(|entry| entry.unread_count).sum()
}
