//! Messaging Module
//!
//! The message model and the pure transformations over it:
//!
//! - `Message` / `MessageRecord` - A direct message between two users
//! - `ConversationKey` - Order-independent identity of a two-party conversation
//! - `InboxEntry` - Per-counterpart summary for one user's inbox
//! - `ThreadMessage` - A message positioned in an ordered thread
//! - `ConversationGroup` - A moderation bucket with export support
//!
//! # Usage
//!
//! ```rust
//! use courier::shared::messaging::{aggregate_inbox, conversation_key};
//!
//! assert_eq!(conversation_key(1, 2), conversation_key(2, 1));
//! assert!(aggregate_inbox(Vec::new(), 1).is_empty());
//! ```

pub mod feed;
pub mod identity;
pub mod inbox;
pub mod message;
pub mod moderation;
pub mod thread;

// Re-export all types
pub use feed::decode_feed;
pub use identity::{conversation_key, ConversationKey, UNKNOWN_RECEIVER, UNKNOWN_SENDER};
pub use inbox::{aggregate_inbox, total_unread, InboxEntry};
pub use message::{
    ApiEnvelope, MalformedRecord, MarkRead, Message, MessageId, MessageRecord, NewMessage, UserId,
    UNKNOWN_SENT_AT,
};
pub use moderation::{
    export_transcript, filter_groups, group_for_moderation, BatchOutcome, ConversationGroup,
    Transcript,
};
pub use thread::{build_thread, Direction, ThreadMessage};
