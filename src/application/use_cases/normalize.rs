use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Hit, RerankError};

/// One hit flattened to tabular form. Read-only once built.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    reranked_id: String,
    original_score: Option<f32>,
    fields: BTreeMap<String, String>,
    highlight: Option<String>,
}

impl NormalizedRow {
    pub fn reranked_id(&self) -> &str {
        &self.reranked_id
    }

    pub fn original_score(&self) -> Option<f32> {
        self.original_score
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }
}

/// Row-oriented view of a result set plus the field names eligible for
/// scoring, in first-appearance order across hits.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    rows: Vec<NormalizedRow>,
    searchable_fields: Vec<String>,
}

impl NormalizedTable {
    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable_fields
    }
}

/// Assign every hit its reranked-id: the natural document id when present,
/// a fresh UUID otherwise. The id is the join key for the whole pipeline;
/// a natural id appearing twice in one request is rejected outright.
pub fn assign_reranked_ids(hits: &mut [Hit]) -> Result<(), RerankError> {
    let mut seen: HashSet<String> = HashSet::with_capacity(hits.len());

    for hit in hits.iter_mut() {
        let id = match hit.id() {
            Some(natural) => natural.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        if !seen.insert(id.clone()) {
            return Err(RerankError::invalid_input(format!(
                "duplicate document id '{}' in result set",
                id
            )));
        }

        hit.set_reranked_id(id);
    }

    Ok(())
}

/// Build the normalized table for a result set whose reranked-ids have
/// already been assigned.
pub fn normalize_hits(hits: &[Hit]) -> Result<NormalizedTable, RerankError> {
    let mut searchable_fields: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for hit in hits {
        for name in hit.searchable_field_names() {
            if seen.insert(name) {
                searchable_fields.push(name.to_string());
            }
        }
    }

    let mut rows = Vec::with_capacity(hits.len());
    for hit in hits {
        let reranked_id = hit
            .reranked_id()
            .ok_or_else(|| {
                RerankError::internal("hit is missing a reranked id, ids must be assigned first")
            })?
            .to_string();

        let mut fields = BTreeMap::new();
        for name in &searchable_fields {
            if let Some(content) = hit.field_text(name) {
                if !content.is_empty() {
                    fields.insert(name.clone(), content.to_string());
                }
            }
        }

        rows.push(NormalizedRow {
            reranked_id,
            original_score: hit.score(),
            fields,
            highlight: hit.highlights().and_then(reduce_highlight),
        });
    }

    Ok(NormalizedTable {
        rows,
        searchable_fields,
    })
}

/// Reduce a highlight substructure to one content string.
///
/// An empty structure yields nothing; a map with one key yields its value; a
/// map with several keys yields the first value with a warning. A bare string
/// is taken as already reduced.
pub fn reduce_highlight(highlight: &Value) -> Option<String> {
    match highlight {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) => {
            let mut keys = map.keys();
            let first = keys.next()?;
            if keys.next().is_some() {
                warn!(
                    "found more than 1 highlight on a hit, keeping '{}' only",
                    first
                );
            }
            match &map[first] {
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            }
        }
        _ => None,
    }
}
