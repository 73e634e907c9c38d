//! Response Selector - orchestrator for the brain module.
//!
//! Runs one turn through the decision pipeline:
//! 1. Empty input short-circuits to the "don't be shy" prompt
//! 2. Pattern rules, first match wins
//! 3. Sentiment cutoffs
//! 4. Default pool
//!
//! The selector is stateless across turns. It owns nothing mutable, so one
//! instance serves a whole session.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::catalog::{Profile, ReplyCatalog};
use super::category::Category;
use super::lexicon::LexiconScorer;
use super::patterns::PatternMatcher;
use super::sentiment::{SentimentClassifier, SentimentScorer};
use super::tokenizer::{is_word, tokenize};
use crate::error::ChatError;

/// Prompt shown for blank input; not part of any reply pool
pub const EMPTY_INPUT_PROMPT: &str = "Don't be shy, say something!";

/// Pipeline stage that produced the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    EmptyInput,
    Pattern,
    Sentiment,
    Default,
}

/// Pure routing decision for one input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub stage: Stage,
    /// `None` only for empty input
    pub category: Option<Category>,
    /// Compound score, when the sentiment stage ran and the scorer answered
    pub compound: Option<f64>,
}

/// One chosen reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub stage: Stage,
    pub category: Option<Category>,
    pub compound: Option<f64>,
}

/// Stateless decision pipeline over an immutable catalog and rule set
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    catalog: Arc<ReplyCatalog>,
    matcher: PatternMatcher,
    sentiment: SentimentClassifier,
}

impl Default for ResponseSelector {
    fn default() -> Self {
        let profile = Profile::default();
        Self {
            catalog: Arc::new(profile.catalog),
            matcher: profile.matcher,
            sentiment: SentimentClassifier::new(Arc::new(LexiconScorer::new())),
        }
    }
}

impl ResponseSelector {
    /// Assemble a selector.
    ///
    /// Fails if a rule points at a category the catalog has no replies for.
    pub fn new(
        catalog: Arc<ReplyCatalog>,
        matcher: PatternMatcher,
        scorer: Arc<dyn SentimentScorer>,
    ) -> Result<Self, ChatError> {
        if let Some(missing) = matcher.categories().find(|c| !catalog.contains(*c)) {
            return Err(ChatError::Validation(format!(
                "Rule category '{}' has no replies in the catalog",
                missing
            )));
        }

        Ok(Self {
            catalog,
            matcher,
            sentiment: SentimentClassifier::new(scorer),
        })
    }

    pub fn from_profile(
        profile: Profile,
        scorer: Arc<dyn SentimentScorer>,
    ) -> Result<Self, ChatError> {
        Self::new(Arc::new(profile.catalog), profile.matcher, scorer)
    }

    pub fn catalog(&self) -> &ReplyCatalog {
        &self.catalog
    }

    /// Lower-case and trim, the only normalization the pipeline applies
    pub fn normalize(input: &str) -> String {
        input.to_lowercase().trim().to_string()
    }

    /// Route `input` to a category without sampling a reply
    pub fn classify(&self, input: &str) -> Selection {
        let text = Self::normalize(input);

        if text.is_empty() {
            return Selection {
                stage: Stage::EmptyInput,
                category: None,
                compound: None,
            };
        }

        let tokens = tokenize(&text);
        debug!(
            tokens = tokens.len(),
            words = tokens.iter().filter(|t| is_word(t)).count(),
            "Normalized input"
        );

        if let Some(category) = self.matcher.find_category(&text) {
            return Selection {
                stage: Stage::Pattern,
                category: Some(category),
                compound: None,
            };
        }

        let reading = self.sentiment.read(&text);
        match reading.sentiment {
            Some(sentiment) => Selection {
                stage: Stage::Sentiment,
                category: Some(sentiment.category()),
                compound: reading.compound,
            },
            None => Selection {
                stage: Stage::Default,
                category: Some(Category::Default),
                compound: reading.compound,
            },
        }
    }

    /// Choose a reply for `input`, drawing from the selected pool with `rng`
    pub fn respond<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Reply {
        let selection = self.classify(input);

        let text = match selection.category {
            Some(category) => self.catalog.sample(category, rng).to_string(),
            None => EMPTY_INPUT_PROMPT.to_string(),
        };

        debug!(
            stage = ?selection.stage,
            category = selection.category.map(|c| c.label()),
            compound = selection.compound,
            "Reply chosen"
        );

        Reply {
            text,
            stage: selection.stage,
            category: selection.category,
            compound: selection.compound,
        }
    }

    /// Convenience wrapper using the thread-local generator
    pub fn get_response(&self, input: &str) -> String {
        self.respond(input, &mut rand::thread_rng()).text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_greeting_pipeline() {
        let selector = ResponseSelector::default();
        let mut rng = StdRng::seed_from_u64(1);

        let reply = selector.respond("Hello there", &mut rng);
        assert_eq!(reply.stage, Stage::Pattern);
        assert_eq!(reply.category, Some(Category::Greeting));
        assert!(selector
            .catalog()
            .pool(Category::Greeting)
            .contains(&reply.text));
    }

    #[test]
    fn test_empty_input_prompt() {
        let selector = ResponseSelector::default();
        let mut rng = StdRng::seed_from_u64(1);

        let reply = selector.respond("   \t ", &mut rng);
        assert_eq!(reply.text, EMPTY_INPUT_PROMPT);
        assert_eq!(reply.stage, Stage::EmptyInput);
        assert_eq!(reply.category, None);
    }

    #[test]
    fn test_sentiment_with_builtin_scorer() {
        let selector = ResponseSelector::default();

        let positive = selector.classify("I LOVE pizza");
        assert_eq!(positive.stage, Stage::Sentiment);
        assert_eq!(positive.category, Some(Category::Positive));
        assert!(positive.compound.unwrap() > 0.3);

        let negative = selector.classify("i hate mondays");
        assert_eq!(negative.category, Some(Category::Negative));
    }

    #[test]
    fn test_neutral_falls_to_default() {
        let selector = ResponseSelector::default();

        let selection = selector.classify("the sky is blue");
        assert_eq!(selection.stage, Stage::Default);
        assert_eq!(selection.category, Some(Category::Default));
        assert_eq!(selection.compound, Some(0.0));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(ResponseSelector::normalize("  HeLLo \n"), "hello");
    }

    #[test]
    fn test_get_response_returns_pool_member() {
        let selector = ResponseSelector::default();
        let reply = selector.get_response("goodbye");
        assert!(selector.catalog().pool(Category::Farewell).contains(&reply));
    }
}
