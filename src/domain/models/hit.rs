use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker prefix for internal/system fields on a hit. Keys carrying it are
/// never eligible for scoring; the recognized ones are also strongly typed
/// below rather than left in the open field map.
pub const INTERNAL_FIELD_MARKER: char = '_';

/// One document record in a retrieval result set.
///
/// The recognized system fields (`_id`, `_score`, `_highlights` and the
/// writeback fields) are fixed struct members; everything else the caller
/// supplied lands in the flattened open map and is a potential scoring source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    id: Option<String>,

    #[serde(rename = "_score", skip_serializing_if = "Option::is_none", default)]
    score: Option<f32>,

    #[serde(rename = "_highlights", skip_serializing_if = "Option::is_none", default)]
    highlights: Option<Value>,

    #[serde(rename = "_reranked_id", skip_serializing_if = "Option::is_none", default)]
    reranked_id: Option<String>,

    #[serde(rename = "_reranker_score", skip_serializing_if = "Option::is_none", default)]
    reranker_score: Option<RerankerScore>,

    #[serde(
        rename = "_highlights_reranked",
        skip_serializing_if = "Option::is_none",
        default
    )]
    highlights_reranked: Option<RerankedHighlights>,

    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl Hit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_highlights(mut self, highlights: Value) -> Self {
        self.highlights = Some(highlights);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn score(&self) -> Option<f32> {
        self.score
    }

    pub fn highlights(&self) -> Option<&Value> {
        self.highlights.as_ref()
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn reranked_id(&self) -> Option<&str> {
        self.reranked_id.as_deref()
    }

    pub fn set_reranked_id(&mut self, id: impl Into<String>) {
        self.reranked_id = Some(id.into());
    }

    pub fn reranker_score(&self) -> Option<&RerankerScore> {
        self.reranker_score.as_ref()
    }

    pub fn set_reranker_score(&mut self, score: RerankerScore) {
        self.reranker_score = Some(score);
    }

    pub fn highlights_reranked(&self) -> Option<&RerankedHighlights> {
        self.highlights_reranked.as_ref()
    }

    pub fn set_highlights_reranked(&mut self, highlights: RerankedHighlights) {
        self.highlights_reranked = Some(highlights);
    }

    /// Whether a field name is tagged internal and therefore never scored.
    pub fn is_internal_field(name: &str) -> bool {
        name.starts_with(INTERNAL_FIELD_MARKER)
    }

    /// The string content of a user field, if present and string-valued.
    pub fn field_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Names of fields on this hit that can serve as scoring sources:
    /// caller-supplied, not tagged internal, string-valued.
    pub fn searchable_field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(name, value)| !Self::is_internal_field(name) && value.is_string())
            .map(|(name, _)| name.as_str())
    }
}

/// Ordered list of document records plus, after cross-modal reranking, the
/// detection payload. This is the unit the pipeline mutates in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub hits: Vec<Hit>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reranked: Option<super::RerankedPayload>,
}

impl ResultSet {
    pub fn new(hits: Vec<Hit>) -> Self {
        Self {
            hits,
            reranked: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

/// Score written back onto a hit: a scalar when one highlight is retained,
/// an ordered list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RerankerScore {
    Single(f32),
    Many(Vec<f32>),
}

impl RerankerScore {
    /// The best score, used as the document-level ranking key.
    pub fn top(&self) -> Option<f32> {
        match self {
            Self::Single(s) => Some(*s),
            Self::Many(scores) => scores.first().copied(),
        }
    }
}

/// Highlight(s) written back onto a hit, mirroring the shape of
/// [`RerankerScore`]: one `{field: content}` map, or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RerankedHighlights {
    Single(BTreeMap<String, String>),
    Many(Vec<BTreeMap<String, String>>),
}

impl RerankedHighlights {
    pub fn entry(field: impl Into<String>, content: impl Into<String>) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(field.into(), content.into());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_searchable_fields_skip_internal_and_non_string() {
        let hit = Hit::new()
            .with_id("doc1")
            .with_field("title", "a title")
            .with_field("views", 42)
            .with_field("_private", "hidden");

        let names: Vec<&str> = hit.searchable_field_names().collect();
        assert_eq!(names, vec!["title"]);
    }

    #[test]
    fn test_hit_round_trip_preserves_open_fields() {
        let raw = json!({
            "_id": "doc1",
            "_score": 0.7,
            "title": "cat photo",
            "body": "a cat on a mat"
        });

        let hit: Hit = serde_json::from_value(raw).unwrap();
        assert_eq!(hit.id(), Some("doc1"));
        assert_eq!(hit.score(), Some(0.7));
        assert_eq!(hit.field_text("body"), Some("a cat on a mat"));

        let back = serde_json::to_value(&hit).unwrap();
        assert_eq!(back["title"], "cat photo");
        assert!(back.get("_reranker_score").is_none());
    }

    #[test]
    fn test_reranker_score_top() {
        assert_eq!(RerankerScore::Single(0.9).top(), Some(0.9));
        assert_eq!(RerankerScore::Many(vec![0.8, 0.2]).top(), Some(0.8));
        assert_eq!(RerankerScore::Many(vec![]).top(), None);
    }
}
