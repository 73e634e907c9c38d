//! Reply categories.
//!
//! The fixed set of reply classes a turn can be routed to. Every pattern rule
//! and every sentiment outcome resolves to one of these.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

/// Detected reply category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Greeting (hi, hello, hey)
    Greeting,
    /// Farewell (bye, goodbye, see you)
    Farewell,
    /// Question (?, what, why, how, when, where)
    Question,
    /// Positive sentiment above the positive cutoff
    Positive,
    /// Negative sentiment below the negative cutoff
    Negative,
    /// Nothing else applied
    Default,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Greeting,
        Category::Farewell,
        Category::Question,
        Category::Positive,
        Category::Negative,
        Category::Default,
    ];

    /// Returns the lower-case label used in profiles and logs
    pub fn label(&self) -> &'static str {
        match self {
            Category::Greeting => "greeting",
            Category::Farewell => "farewell",
            Category::Question => "question",
            Category::Positive => "positive",
            Category::Negative => "negative",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChatError::Config(format!("Unknown category '{}'", s)))
    }
}
