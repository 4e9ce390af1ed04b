use serde::{Deserialize, Serialize};

/// Query given to a rerank call.
///
/// The text path accepts either form; a weighted query fans out into one
/// candidate set per term, with the weight multiplied into the model score.
/// The cross-modal path supports plain text only and rejects weighted
/// queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RerankQuery {
    Text(String),
    Weighted(Vec<(String, f32)>),
}

impl RerankQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self::Text(query.into())
    }

    pub fn weighted(terms: Vec<(String, f32)>) -> Self {
        Self::Weighted(terms)
    }

    /// The flat query string, when this is a plain text query.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(q) => Some(q),
            Self::Weighted(_) => None,
        }
    }

    /// Every (term, weight) pair this query expands to.
    pub fn terms(&self) -> Vec<(&str, f32)> {
        match self {
            Self::Text(q) => vec![(q.as_str(), 1.0)],
            Self::Weighted(terms) => terms.iter().map(|(t, w)| (t.as_str(), *w)).collect(),
        }
    }
}

impl From<&str> for RerankQuery {
    fn from(query: &str) -> Self {
        Self::Text(query.to_string())
    }
}

impl From<String> for RerankQuery {
    fn from(query: String) -> Self {
        Self::Text(query)
    }
}
