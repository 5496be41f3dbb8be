//! Courier - Messaging Core Library
//!
//! Courier turns a flat, bidirectional stream of direct messages into the three
//! views a storefront client needs: a per-user inbox, an ordered conversation
//! thread between two users, and an administrative moderation view.
//!
//! # Overview
//!
//! The library provides:
//! - Conversation identity derivation (order-independent participant keys)
//! - Inbox aggregation with unread indicators
//! - Chronologically ordered, deduplicated conversation threads
//! - Moderation grouping with bulk delete and plain-text export
//! - A send pipeline that reconciles against the store after every send
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types and pure transformations
//!   - Message records and their wire shape
//!   - Conversation identity, inbox, thread and moderation aggregation
//!   - Error and configuration types
//!
//! - **`client`** - Store access and view state
//!   - `MessageStore` trait with HTTP and in-memory implementations
//!   - Inbox, thread and moderation views
//!   - Compose / send pipeline
//!
//! # Consistency Model
//!
//! The remote store is the single source of truth. Every mutation (send,
//! mark-read, delete) is followed by a full re-read of the affected scope;
//! nothing is patched locally. Views keep their previous data when a fetch
//! fails, and discard results that resolve after the view was closed.
//!
//! # Usage
//!
//! ```rust,no_run
//! use courier::client::{Config, HttpMessageStore, InboxView};
//!
//! # async fn example() -> Result<(), courier::shared::MessagingError> {
//! let mut config = Config::new();
//! config.set_token(Some("jwt".to_string()));
//! let store = HttpMessageStore::new(config)?;
//!
//! let mut inbox = InboxView::new(42);
//! inbox.refresh(&store).await;
//! for entry in inbox.entries() {
//!     println!("{} unread={}", entry.counterpart_id, entry.has_unread);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `MessagingError` for store and validation failures
//! - `ConfigError` for configuration loading
//! - Malformed records are skipped and logged, never surfaced as errors

/// Shared types and pure transformations
pub mod shared;

/// Store access and view state
pub mod client;
