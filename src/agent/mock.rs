//! Mock agent for development & testing
//! Keeps the router functional without an LLM dependency

use async_trait::async_trait;
use std::sync::Mutex;

use crate::agent::Agent;
use crate::error::RouterError;
use crate::models::RawResponse;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(RawResponse),
    Echo,
    Fail(String),
    Panic(String),
}

/// Deterministic agent that records every query it receives
#[derive(Debug)]
pub struct MockAgent {
    name: String,
    role: String,
    behavior: Behavior,
    queries: Mutex<Vec<String>>,
}

impl MockAgent {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            role: "Mock agent".to_string(),
            behavior,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `response`
    pub fn replying(name: &str, response: RawResponse) -> Self {
        Self::with_behavior(name, Behavior::Reply(response))
    }

    /// Answers with the query it was given
    pub fn echo(name: &str) -> Self {
        Self::with_behavior(name, Behavior::Echo)
    }

    /// Always fails with `description`
    pub fn failing(name: &str, description: &str) -> Self {
        Self::with_behavior(name, Behavior::Fail(description.to_string()))
    }

    /// Panics inside `run`
    pub fn panicking(name: &str, message: &str) -> Self {
        Self::with_behavior(name, Behavior::Panic(message.to_string()))
    }

    /// Queries received so far, oldest first
    pub fn received(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &str {
        &self.role
    }

    async fn run(&self, query: &str) -> crate::Result<RawResponse> {
        match self.queries.lock() {
            Ok(mut queries) => queries.push(query.to_string()),
            Err(poisoned) => poisoned.into_inner().push(query.to_string()),
        }

        match &self.behavior {
            Behavior::Reply(response) => Ok(response.clone()),
            Behavior::Echo => Ok(RawResponse::plain(query)),
            Behavior::Fail(description) => Err(RouterError::AgentError(description.clone())),
            Behavior::Panic(message) => panic!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_queries() {
        let agent = MockAgent::echo("echo");
        agent.run("first").await.unwrap();
        agent.run("second").await.unwrap();

        assert_eq!(agent.received(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_agent() {
        let agent = MockAgent::failing("broken", "connection refused");
        let err = agent.run("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "Agent error: connection refused");
    }
}
