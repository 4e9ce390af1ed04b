use crate::application::ContentSegmenter;
use crate::domain::{SplitMethod, SplitParams};

/// Splits content into units (characters, words or sentences), then slides a
/// window of `split_length` units with `split_overlap` units of overlap.
///
/// Content shorter than one window yields a single span; non-empty content
/// never yields zero spans.
pub struct WindowSegmenter;

impl WindowSegmenter {
    pub fn new() -> Self {
        Self
    }

    fn units(content: &str, method: SplitMethod) -> Vec<String> {
        match method {
            SplitMethod::Character => content.chars().map(String::from).collect(),
            SplitMethod::Word => content.split_whitespace().map(String::from).collect(),
            SplitMethod::Sentence => split_sentences(content),
        }
    }

    fn join(units: &[String], method: SplitMethod) -> String {
        match method {
            SplitMethod::Character => units.concat(),
            SplitMethod::Word | SplitMethod::Sentence => units.join(" "),
        }
    }
}

impl Default for WindowSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSegmenter for WindowSegmenter {
    fn split(&self, content: &str, params: &SplitParams) -> Vec<String> {
        if content.is_empty() {
            return vec![];
        }

        let units = Self::units(content, params.split_method);
        if units.is_empty() {
            return vec![content.to_string()];
        }

        let length = params.split_length.max(1);
        if units.len() <= length {
            return vec![Self::join(&units, params.split_method)];
        }

        // Overlap >= length would never advance; fall back to step 1.
        let step = length.saturating_sub(params.split_overlap).max(1);

        let mut spans = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + length).min(units.len());
            spans.push(Self::join(&units[start..end], params.split_method));
            if end == units.len() {
                break;
            }
            start += step;
        }
        spans
    }
}

/// Naive sentence splitter: breaks after `.`, `!` or `?` followed by
/// whitespace, keeping the terminator with its sentence.
fn split_sentences(content: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}
