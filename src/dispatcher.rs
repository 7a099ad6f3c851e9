//! Dispatcher
//!
//! Maps a category to its agent and invokes it. Every failure of the
//! external call, including a panic inside the agent, comes back as a
//! `DispatchFailure` value.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::models::{Category, RawResponse};

/// An agent call that did not produce a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{description}")]
pub struct DispatchFailure {
    pub agent: String,
    pub description: String,
}

/// Aborts the agent task when the dispatch future is dropped mid-call
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Category → agent mapping, fixed for the process lifetime
#[derive(Clone)]
pub struct Dispatcher {
    financial: Arc<dyn Agent>,
    general: Arc<dyn Agent>,
}

impl Dispatcher {
    pub fn new(financial: Arc<dyn Agent>, general: Arc<dyn Agent>) -> Self {
        Self { financial, general }
    }

    /// Route every category to the same agent (team mode)
    pub fn uniform(agent: Arc<dyn Agent>) -> Self {
        Self {
            financial: agent.clone(),
            general: agent,
        }
    }

    pub fn agent_for(&self, category: Category) -> &Arc<dyn Agent> {
        match category {
            Category::Financial => &self.financial,
            Category::General => &self.general,
        }
    }

    /// Call the agent for `category` with the query, unmodified
    pub async fn dispatch(
        &self,
        category: Category,
        query: &str,
    ) -> Result<RawResponse, DispatchFailure> {
        let agent = self.agent_for(category).clone();
        let agent_name = agent.name().to_string();
        let start = Instant::now();

        debug!(%category, agent = %agent_name, "Dispatching query");

        // Own task so a panicking agent cannot unwind through the pipeline
        let owned_query = query.to_string();
        let mut task = AbortOnDrop(tokio::spawn(async move { agent.run(&owned_query).await }));
        let joined = (&mut task.0).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match joined {
            Ok(Ok(response)) => {
                info!(agent = %agent_name, elapsed_ms, "Agent responded");
                Ok(response)
            }
            Ok(Err(e)) => {
                warn!(agent = %agent_name, elapsed_ms, "Agent call failed: {}", e);
                Err(DispatchFailure {
                    agent: agent_name,
                    description: e.to_string(),
                })
            }
            Err(join_error) => {
                let description = if join_error.is_panic() {
                    panic_description(join_error.into_panic())
                } else {
                    "agent call was cancelled".to_string()
                };
                warn!(agent = %agent_name, elapsed_ms, "Agent call aborted: {}", description);
                Err(DispatchFailure {
                    agent: agent_name,
                    description,
                })
            }
        }
    }
}

fn panic_description(payload: Box<dyn std::any::Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&'static str>().map(|s| s.to_string()));

    match detail {
        Some(detail) => format!("agent panicked: {}", detail),
        None => "agent panicked".to_string(),
    }
}
