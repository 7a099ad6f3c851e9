//! Team agent
//!
//! Runs several agents on the same query and merges their answers into one
//! markdown document. Used when the router runs in team mode.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::error::RouterError;
use crate::models::RawResponse;
use crate::normalizer::normalize;

pub struct TeamAgent {
    name: String,
    role: String,
    members: Vec<Arc<dyn Agent>>,
}

impl TeamAgent {
    pub fn new(name: &str, role: &str, members: Vec<Arc<dyn Agent>>) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            members,
        }
    }
}

#[async_trait]
impl Agent for TeamAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &str {
        &self.role
    }

    async fn run(&self, query: &str) -> crate::Result<RawResponse> {
        if self.members.is_empty() {
            return Err(RouterError::AgentNotConfigured(format!(
                "{} has no members",
                self.name
            )));
        }

        let mut sections = Vec::with_capacity(self.members.len());
        let mut failures = Vec::new();

        for member in &self.members {
            match member.run(query).await {
                Ok(response) => {
                    info!(team = %self.name, member = %member.name(), "Team member answered");
                    sections.push(format!("## {}\n\n{}", member.name(), normalize(&response)));
                }
                Err(e) => {
                    warn!(team = %self.name, member = %member.name(), "Team member failed: {}", e);
                    sections.push(format!("## {}\n\n_unavailable: {}_", member.name(), e));
                    failures.push(format!("{}: {}", member.name(), e));
                }
            }
        }

        if failures.len() == self.members.len() {
            return Err(RouterError::AgentError(format!(
                "all team members failed ({})",
                failures.join("; ")
            )));
        }

        Ok(RawResponse::structured(sections.join("\n\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockAgent;

    #[tokio::test]
    async fn test_merges_member_answers() {
        let team = TeamAgent::new(
            "Financial Bot",
            "Retrieve financial data",
            vec![
                Arc::new(MockAgent::replying("Web Search Agent", RawResponse::plain("News: ..."))),
                Arc::new(MockAgent::replying(
                    "Financial AI Agent",
                    RawResponse::structured("Running:\n\n| GOOG | $175 |"),
                )),
            ],
        );

        let response = team.run("Summarize analyst recommendations for google").await.unwrap();
        assert_eq!(
            response,
            RawResponse::structured(
                "## Web Search Agent\n\nNews: ...\n\n## Financial AI Agent\n\n| GOOG | $175 |"
            )
        );
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_inline() {
        let team = TeamAgent::new(
            "Financial Bot",
            "Retrieve financial data",
            vec![
                Arc::new(MockAgent::failing("Web Search Agent", "rate limited")),
                Arc::new(MockAgent::echo("Financial AI Agent")),
            ],
        );

        let text = normalize(&team.run("stock price").await.unwrap());
        assert!(text.contains("_unavailable: Agent error: rate limited_"));
        assert!(text.ends_with("## Financial AI Agent\n\nstock price"));
    }

    #[tokio::test]
    async fn test_total_failure_is_an_error() {
        let team = TeamAgent::new(
            "Financial Bot",
            "Retrieve financial data",
            vec![Arc::new(MockAgent::failing("Web Search Agent", "timeout"))],
        );

        let err = team.run("anything").await.unwrap_err();
        assert!(err.to_string().contains("all team members failed"));
    }

    #[tokio::test]
    async fn test_empty_team_is_not_configured() {
        let team = TeamAgent::new("Empty", "Nothing", vec![]);
        assert!(matches!(
            team.run("q").await,
            Err(RouterError::AgentNotConfigured(_))
        ));
    }
}
