//! Financial Query Router
//!
//! Routes a free-text query to one of several specialized agents:
//! - Classifies the query by financial keywords (pure, total)
//! - Dispatches it to the financial or web search agent
//! - Normalizes whatever shape the agent answers with into plain text
//! - Records the exchange in a session-scoped conversation history
//!
//! PIPELINE:
//! QUERY → CLASSIFY → DISPATCH → NORMALIZE | FALLBACK → RECORD
//!
//! Agent failures never escape the pipeline; they become a fallback reply.

pub mod agent;
pub mod api;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod memory;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::KeywordClassifier;
pub use dispatcher::{DispatchFailure, Dispatcher};
pub use normalizer::normalize;
pub use pipeline::{Exchange, QueryPipeline};
pub use session::Session;
