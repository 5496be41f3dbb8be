//! Shared Module
//!
//! This module contains the types and pure transformations that do not depend
//! on any transport. Aggregation is deterministic and can be re-run on every
//! fetch; the only I/O is writing exported transcripts.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Message model and aggregation
pub mod messaging;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::MessagingError;
pub use messaging::{
    conversation_key, ConversationKey, InboxEntry, Message, MessageId, MessageRecord, UserId,
};
