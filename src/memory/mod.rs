//! Session Memory
//!
//! Append-only conversation log owned by a single session.
//! Entries are replayed in insertion order by the display layer.

pub mod store;

pub use store::ConversationHistory;
