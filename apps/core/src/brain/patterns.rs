//! Pattern matching using regex rules.
//!
//! Rules are kept in an explicit, ordered list and searched (not full-matched)
//! against normalized text. The first rule that matches decides the category;
//! declaration order is the only tie-break.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::category::Category;
use crate::error::ChatError;

/// Serializable rule definition, as found in profile files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Regex searched anywhere in the normalized text
    pub pattern: String,
    /// Category label the rule resolves to
    pub category: String,
}

/// A compiled (pattern, category) pair
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    category: Category,
}

impl PatternRule {
    pub fn new(pattern: &str, category: Category) -> Result<Self, ChatError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            category,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

// Compile the built-in table once. Order matters: greeting and farewell are
// checked before the generic question rule.
static DEFAULT_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(r"hi|hello|hey", Category::Greeting)
            .expect("Invalid regex: greeting pattern"),
        PatternRule::new(r"bye|goodbye|see you", Category::Farewell)
            .expect("Invalid regex: farewell pattern"),
        PatternRule::new(r"\?|what|why|how|when|where", Category::Question)
            .expect("Invalid regex: question pattern"),
    ]
});

/// Ordered rule list; first match wins
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: Vec<PatternRule>,
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher {
    /// Create a matcher with the built-in greeting / farewell / question rules
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Create a matcher from already compiled rules, keeping their order
    pub fn with_rules(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Compile rule definitions, keeping their order
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self, ChatError> {
        let rules = specs
            .iter()
            .map(|spec| PatternRule::new(&spec.pattern, spec.category.parse()?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_rules(rules))
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Categories referenced by at least one rule
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rules.iter().map(PatternRule::category)
    }

    /// Category of the first rule whose pattern occurs in `text`.
    ///
    /// `text` is expected to be lower-cased and trimmed already. `None` is an
    /// ordinary outcome, not an error.
    pub fn find_category(&self, text: &str) -> Option<Category> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(PatternRule::category)
    }
}
