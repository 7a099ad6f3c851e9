//! Query pipeline - classify, dispatch, normalize, record
//!
//! RECEIVED → CLASSIFIED → DISPATCHED → {NORMALIZED | FAILED} → RECORDED
//!
//! `process` has no error channel: a failed dispatch is turned into a
//! fallback assistant reply and the session stays usable.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentProfile, GroqAgent, GroqClient, TeamAgent};
use crate::classifier::KeywordClassifier;
use crate::config::{RouterConfig, RoutingMode};
use crate::dispatcher::{DispatchFailure, Dispatcher};
use crate::models::{Category, RawResponse};
use crate::normalizer::normalize;
use crate::session::Session;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Received,
    Classified,
    Dispatched,
    Normalized,
    Failed,
    Recorded,
}

/// Reply text after error containment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answered(String),
    Failed { description: String, reply: String },
}

impl Outcome {
    pub fn reply(&self) -> &str {
        match self {
            Outcome::Answered(text) => text,
            Outcome::Failed { reply, .. } => reply,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Result of one processed query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub category: Category,
    pub agent: String,
    pub reply: String,
    pub failed: bool,
    pub trace: Vec<PipelineStage>,
}

/// User-facing text for a failed query
pub fn fallback_message(description: &str) -> String {
    format!(
        "Sorry, I encountered an error: {}. Please try rephrasing your question.",
        description
    )
}

/// Turn a dispatch result into the reply to record
pub fn resolve(result: Result<RawResponse, DispatchFailure>) -> Outcome {
    match result {
        Ok(raw) => Outcome::Answered(normalize(&raw)),
        Err(failure) => Outcome::Failed {
            reply: fallback_message(&failure.description),
            description: failure.description,
        },
    }
}

/// Runs queries through classification, dispatch and recording
pub struct QueryPipeline {
    classifier: KeywordClassifier,
    dispatcher: Dispatcher,
}

impl QueryPipeline {
    pub fn new(classifier: KeywordClassifier, dispatcher: Dispatcher) -> Self {
        Self {
            classifier,
            dispatcher,
        }
    }

    /// Wire the default Groq-backed agents described by `config`
    pub fn from_config(config: &RouterConfig) -> crate::Result<Self> {
        let client = Arc::new(GroqClient::new(&config.groq)?);

        let financial: Arc<dyn Agent> =
            Arc::new(GroqAgent::new(AgentProfile::financial(), client.clone()));
        let general: Arc<dyn Agent> =
            Arc::new(GroqAgent::new(AgentProfile::web_search(), client));

        let dispatcher = match config.mode {
            RoutingMode::Single => Dispatcher::new(financial, general),
            RoutingMode::Team => Dispatcher::uniform(Arc::new(TeamAgent::new(
                "Financial Bot",
                "Retrieve financial data",
                vec![general, financial],
            ))),
        };

        info!(mode = ?config.mode, model = %config.groq.model, "Query pipeline configured");

        Ok(Self::new(
            KeywordClassifier::new(&config.financial_keywords),
            dispatcher,
        ))
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Process one query against `session`.
    ///
    /// Always appends exactly one User and one Assistant message.
    pub async fn process(&self, session: &mut Session, query: &str) -> Exchange {
        let mut trace = vec![PipelineStage::Received];

        debug!(session_id = %session.id, query = %query, "Pipeline: query received");

        let category = self.classifier.classify(query);
        trace.push(PipelineStage::Classified);
        debug!(%category, "Query classified");

        let agent = self.dispatcher.agent_for(category).name().to_string();
        let result = self.dispatcher.dispatch(category, query).await;
        trace.push(PipelineStage::Dispatched);

        let outcome = resolve(result);
        match &outcome {
            Outcome::Answered(_) => trace.push(PipelineStage::Normalized),
            Outcome::Failed { description, .. } => {
                warn!(%category, agent = %agent, "Recording fallback reply: {}", description);
                trace.push(PipelineStage::Failed);
            }
        }

        session.history.append_exchange(query, outcome.reply());
        trace.push(PipelineStage::Recorded);

        info!(
            session_id = %session.id,
            %category,
            failed = outcome.is_failure(),
            history_len = session.history.len(),
            "Pipeline: exchange recorded"
        );

        Exchange {
            category,
            agent,
            failed: outcome.is_failure(),
            reply: outcome.reply().to_string(),
            trace,
        }
    }
}
