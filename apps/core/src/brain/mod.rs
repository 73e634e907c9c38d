//! # Brain Module
//!
//! Decides how ChatBuddy answers a single line of user text.
//! Each turn is evaluated on its own; nothing carries over between turns.
//!
//! ## Components
//! - `category`: The fixed set of reply categories
//! - `tokenizer`: Word / punctuation tokenization
//! - `patterns`: Ordered regex rules (fast path, first match wins)
//! - `sentiment`: Scorer trait and polarity cutoffs (second stage)
//! - `lexicon`: Built-in rule-based sentiment scorer
//! - `catalog`: Reply pools and profile loading
//! - `selector`: Main orchestrator

pub mod catalog;
pub mod category;
pub mod lexicon;
pub mod patterns;
pub mod selector;
pub mod sentiment;
pub mod tokenizer;

// Re-export main types for convenience
pub use catalog::{Profile, ProfileFile, ReplyCatalog};
pub use category::Category;
pub use lexicon::LexiconScorer;
pub use patterns::{PatternMatcher, PatternRule, RuleSpec};
pub use selector::{Reply, ResponseSelector, Selection, Stage, EMPTY_INPUT_PROMPT};
pub use sentiment::{
    PolarityScores, Sentiment, SentimentClassifier, SentimentScorer, NEGATIVE_CUTOFF,
    POSITIVE_CUTOFF,
};
