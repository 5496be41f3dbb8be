//! Client Module
//!
//! Store access and the view state built on top of it. Views take the store
//! by reference on every call, so one store can back many views.

pub mod api;
pub mod compose;
pub mod config;
pub mod inbox_view;
pub mod memory;
pub mod moderation_view;
pub mod store;
pub mod thread_view;

pub use api::HttpMessageStore;
pub use compose::{validate_content, Composer, SEND_ERROR};
pub use config::Config;
pub use inbox_view::{InboxView, INBOX_LOAD_ERROR};
pub use memory::{InMemoryMessageStore, Operation};
pub use moderation_view::{
    DeleteReport, DeleteTarget, ModerationState, ModerationView, DELETE_FAILED_ERROR,
    MODERATION_LOAD_ERROR, PARTIAL_DELETE_WARNING,
};
pub use store::{MessageStore, StoreResult};
pub use thread_view::{ThreadView, THREAD_LOAD_ERROR};
