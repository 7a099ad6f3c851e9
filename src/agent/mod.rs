//! Agent trait and built-in profiles
//!
//! Agents are opaque text-generation services. The router only ever calls
//! `run(query)` and treats every failure as non-retryable.

use crate::models::RawResponse;
use crate::Result;
use async_trait::async_trait;

pub mod groq;
pub mod mock;
pub mod team;

pub use groq::{GroqAgent, GroqClient};
pub use mock::MockAgent;
pub use team::TeamAgent;

/// Trait for a single agent back-end
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;
    fn role(&self) -> &str;
    async fn run(&self, query: &str) -> Result<RawResponse>;
}

/// Identity and instructions of an LLM-backed agent
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub name: String,
    pub role: String,
    pub instructions: Vec<String>,
    pub tools: Vec<String>,
}

impl AgentProfile {
    /// Financial data agent: prices, recommendations, fundamentals, news
    pub fn financial() -> Self {
        Self {
            name: "Financial AI Agent".to_string(),
            role: "Retrieve financial data".to_string(),
            instructions: vec![
                "Provide well-structured, concise, and insightful financial analysis with clear justifications.".to_string(),
                "Ensure all financial data is accurate and sourced from reliable sources.".to_string(),
                "Use markdown tables to neatly present stock prices, analyst recommendations, and company fundamentals.".to_string(),
                "Explain financial metrics in an intuitive manner for better user understanding.".to_string(),
                "Answer basic queries like what tools you use, more about yourself, and how you can assist the user.".to_string(),
            ],
            tools: vec![
                "stock_price".to_string(),
                "analyst_recommendations".to_string(),
                "stock_fundamentals".to_string(),
                "company_news".to_string(),
            ],
        }
    }

    /// General-knowledge agent backed by web search
    pub fn web_search() -> Self {
        Self {
            name: "Web Search Agent".to_string(),
            role: "Search the web for information".to_string(),
            instructions: vec![
                "Provide accurate web search results with citations.".to_string(),
                "Ensure information is current and relevant.".to_string(),
                "Answer general knowledge queries effectively.".to_string(),
                "Always include the source where you are getting the data from.".to_string(),
            ],
            tools: vec!["web_search".to_string()],
        }
    }

    /// Build the system prompt sent ahead of every query
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("You are the {}. Your role: {}.", self.name, self.role);

        if !self.instructions.is_empty() {
            prompt.push_str("\n\nGuidelines:\n- ");
            prompt.push_str(&self.instructions.join("\n- "));
        }

        if !self.tools.is_empty() {
            prompt.push_str("\n\nAreas of expertise:\n- ");
            prompt.push_str(&self.tools.join("\n- "));
        }

        prompt.push_str("\n\nFormat: respond in markdown.");
        prompt
    }
}
