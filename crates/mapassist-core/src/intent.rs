use serde::{Deserialize, Serialize};

use crate::category::PlaceCategory;
use crate::defaults::{DEFAULT_CATEGORY, MAX_KEYWORDS, MIN_KEYWORDS};

/// Structured reading of a free-text query: one allow-listed category plus
/// the short phrases used for relevance ranking.
///
/// Once produced by the interpreter, `keywords` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretedIntent {
    pub category: PlaceCategory,
    pub keywords: Vec<String>,
}

impl InterpretedIntent {
    /// The intent used when the model answer cannot be parsed at all.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            category: DEFAULT_CATEGORY,
            keywords: Vec::new(),
        }
    }

    /// Apply the keyword policy against the original query text.
    ///
    /// Keywords are trimmed, blanks and case-insensitive duplicates dropped,
    /// and the list capped at [`MAX_KEYWORDS`]. Below [`MIN_KEYWORDS`] the
    /// raw query and then the category leaf are appended, so the result is
    /// never empty.
    #[must_use]
    pub fn finalize(self, query: &str) -> Self {
        let mut keywords: Vec<String> = Vec::with_capacity(MAX_KEYWORDS);
        for keyword in self.keywords {
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
            push_unique(&mut keywords, &keyword);
        }

        if keywords.len() < MIN_KEYWORDS {
            push_unique(&mut keywords, query);
        }
        if keywords.len() < MIN_KEYWORDS {
            push_unique(&mut keywords, self.category.leaf());
        }

        Self {
            category: self.category,
            keywords,
        }
    }
}

fn push_unique(keywords: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return;
    }
    let lowered = candidate.to_lowercase();
    if keywords.iter().any(|k| k.to_lowercase() == lowered) {
        return;
    }
    keywords.push(candidate.to_string());
}
