//! Query Classifier
//!
//! Classifies a user query as either:
//! - Financial: routed to the financial data agent (e.g., "what is the stock price of Google?")
//! - General: routed to the web search agent (e.g., "what is the capital of France?")
//!
//! Matching is a case-insensitive substring test against a keyword set.
//! A single hit is enough; keyword order does not matter.

use crate::models::Category;

/// Keywords used when no override is configured
pub const DEFAULT_FINANCIAL_KEYWORDS: &[&str] = &[
    // Market data
    "stock", "price", "market", "shares", "trading",
    // Exchanges
    "nasdaq", "nyse",
    // Corporate
    "financial", "investment", "company", "dividend", "earnings",
];

/// Keyword classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Classifier over an explicit keyword set.
    /// Keywords are lower-cased and trimmed; blank entries are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|kw| kw.as_ref().trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();

        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Classify a query. Total: every input, including "", yields a category.
    pub fn classify(&self, query: &str) -> Category {
        let query = query.to_lowercase();

        if self.keywords.iter().any(|kw| query.contains(kw.as_str())) {
            Category::Financial
        } else {
            Category::General
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_FINANCIAL_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_queries() {
        let classifier = KeywordClassifier::default();
        let cases = vec![
            "What is the stock price of Google?",
            "latest NVDA earnings",
            "Is now a good time for investment in bonds?",
            "Which company pays the highest dividend?",
            "NASDAQ closing numbers",
        ];

        for c in cases {
            assert_eq!(classifier.classify(c), Category::Financial, "query: {}", c);
        }
    }

    #[test]
    fn test_general_queries() {
        let classifier = KeywordClassifier::default();
        let cases = vec![
            "What is the capital of France?",
            "who won the world cup in 2022",
            "explain photosynthesis",
        ];

        for c in cases {
            assert_eq!(classifier.classify(c), Category::General, "query: {}", c);
        }
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = KeywordClassifier::default();
        for q in ["STOCK tips", "Stock Tips", "sToCk tips", "Capital Of France"] {
            assert_eq!(classifier.classify(q), classifier.classify(&q.to_lowercase()));
        }
        assert_eq!(classifier.classify("DIVIDEND"), Category::Financial);
    }

    #[test]
    fn test_edge_cases() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify(""), Category::General);
        assert_eq!(classifier.classify("   \t\n"), Category::General);

        // Substring match, not word match
        assert_eq!(classifier.classify("stockholm weather"), Category::Financial);
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = KeywordClassifier::new(["  Crypto ", "", "ETF"]);
        assert_eq!(classifier.keywords(), &["crypto".to_string(), "etf".to_string()]);
        assert_eq!(classifier.classify("best etf for 2025"), Category::Financial);
        assert_eq!(classifier.classify("stock price"), Category::General);
    }

    #[test]
    fn test_empty_keyword_set_is_always_general() {
        let classifier = KeywordClassifier::new(Vec::<String>::new());
        assert_eq!(classifier.classify("stock price"), Category::General);
    }
}
