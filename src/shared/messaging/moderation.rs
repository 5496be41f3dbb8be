//! Moderation Grouping and Export
//!
//! The administrative feed is grouped by conversation irrespective of who sent
//! which message. Unlike the inbox, no record is ever dropped here: a record
//! that lost an endpoint id is grouped by its username labels instead, so an
//! administrator can still see and delete it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::identity::{receiver_label, sender_label, ConversationKey};
use super::message::{MessageId, MessageRecord, UserId};
use crate::shared::error::MessagingError;

/// Timestamp format used in transcripts
pub const TRANSCRIPT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// All messages of one conversation, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationGroup {
    pub key: ConversationKey,
    /// `"<a> ↔ <b>"`, labels in lexical order
    pub label: String,
    pub messages: Vec<MessageRecord>,
}

impl ConversationGroup {
    pub fn message_ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Case-insensitive substring match over the pair label
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        needle.is_empty() || self.label.to_lowercase().contains(&needle)
    }
}

/// Group every record by conversation. Groups come back ordered by label.
pub fn group_for_moderation<I>(records: I) -> Vec<ConversationGroup>
where
    I: IntoIterator<Item = MessageRecord>,
{
    let mut buckets: BTreeMap<ConversationKey, Vec<MessageRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(ConversationKey::for_record(&record))
            .or_default()
            .push(record);
    }

    let mut groups: Vec<ConversationGroup> = buckets
        .into_iter()
        .map(|(key, mut messages)| {
            messages.sort_by_key(MessageRecord::order_key);
            let label = group_label(&key, &messages);
            ConversationGroup { key, label, messages }
        })
        .collect();

    groups.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.key.cmp(&b.key)));
    groups
}

/// Groups whose label contains `search`, case-insensitively
pub fn filter_groups<'a>(groups: &'a [ConversationGroup], search: &str) -> Vec<&'a ConversationGroup> {
    groups.iter().filter(|group| group.matches(search)).collect()
}

fn group_label(key: &ConversationKey, messages: &[MessageRecord]) -> String {
    match key {
        ConversationKey::Participants(lo, hi) => {
            let mut names = [participant_name(*lo, messages), participant_name(*hi, messages)];
            names.sort();
            format!("{} ↔ {}", names[0], names[1])
        }
        ConversationKey::Labels(..) => key.to_string(),
    }
}

fn participant_name(user: UserId, messages: &[MessageRecord]) -> String {
    messages
        .iter()
        .find_map(|m| {
            if m.sender_id == Some(user) {
                m.sender_username.clone()
            } else if m.receiver_id == Some(user) {
                m.receiver_username.clone()
            } else {
                None
            }
        })
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("User {}", user))
}

/// Format a timestamp the way transcripts print it
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TRANSCRIPT_TIME_FORMAT).to_string()
}

/// Printed in place of a timestamp the store never provided
pub const INVALID_DATE: &str = "Invalid Date";

/// `"[timestamp] sender -> receiver: content"`
pub fn transcript_line(record: &MessageRecord) -> String {
    let at = if record.has_timestamp() {
        format_timestamp(&record.sent_at)
    } else {
        INVALID_DATE.to_string()
    };
    format!(
        "[{}] {} -> {}: {}",
        at,
        sender_label(record),
        receiver_label(record),
        record.content
    )
}

/// Plain-text export of one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub file_name: String,
    pub contents: String,
}

impl Transcript {
    /// Write the transcript into `dir`, returning the file path
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        tokio::fs::write(&path, self.contents.as_bytes()).await?;
        tracing::info!("Exported transcript to {}", path.display());
        Ok(path)
    }
}

/// Serialize a group, oldest message first, one line per message
pub fn export_transcript(group: &ConversationGroup) -> Transcript {
    let mut ordered: Vec<&MessageRecord> = group.messages.iter().collect();
    ordered.sort_by_key(|m| m.order_key());

    let contents = ordered
        .into_iter()
        .map(transcript_line)
        .collect::<Vec<_>>()
        .join("\n");

    Transcript {
        file_name: transcript_file_name(&group.label),
        contents,
    }
}

fn transcript_file_name(label: &str) -> String {
    let stem: String = label
        .replace(" ↔ ", "_")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("chat_{}.txt", stem)
}

/// Result of a fan-out of per-message deletes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub deleted: Vec<MessageId>,
    pub failed: Vec<(MessageId, MessagingError)>,
}

impl BatchOutcome {
    /// Collect per-id results
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (MessageId, Result<(), MessagingError>)>,
    {
        let mut outcome = BatchOutcome::default();
        for (id, result) in results {
            outcome.attempted += 1;
            match result {
                Ok(()) => outcome.deleted.push(id),
                Err(e) => outcome.failed.push((id, e)),
            }
        }
        outcome
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Some deletes failed and at least one went through
    pub fn is_partial_failure(&self) -> bool {
        !self.failed.is_empty() && !self.deleted.is_empty()
    }

    /// Every attempted delete failed
    pub fn is_total_failure(&self) -> bool {
        !self.failed.is_empty() && self.deleted.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<MessageId> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}
