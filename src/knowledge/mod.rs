//! FAQ knowledge base: load, normalize, and keyword matching
//!
//! The knowledge base is a JSON object read once at startup. Two value
//! shapes are accepted per topic key:
//!
//! - legacy: `"library hours": "9am-5pm"` — keywords are derived by
//!   lowercase-splitting the key itself
//! - structured: `"fees": { "answer": "...", "keywords": ["fee", "fees"] }`
//!
//! A missing or unparseable file yields an empty base; the chatbot keeps
//! working without FAQ augmentation.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// One FAQ topic: a canned answer and the lowercase keywords that select it.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Topic entries in file order. Read-only after load; match tie-breaking
/// depends on iteration following insertion order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<(String, KnowledgeEntry)>,
}

impl KnowledgeBase {
    /// Build a base directly from ordered entries (bypassing the file).
    pub fn from_entries(entries: Vec<(String, KnowledgeEntry)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, KnowledgeEntry)> {
        self.entries.iter()
    }

    pub fn get(&self, topic: &str) -> Option<&KnowledgeEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == topic)
            .map(|(_, e)| e)
    }
}

/// The best-scoring FAQ answer for a query, if any keyword hit at all.
#[derive(Debug, Clone)]
pub struct FaqMatch {
    pub answer: String,
}

/// Load the knowledge base from `path`.
///
/// Never fails: a missing file logs a notice, invalid JSON logs a warning,
/// and both return an empty base.
pub fn load(path: &Path) -> KnowledgeBase {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            tracing::info!(path = %path.display(), "FAQ file not found, continuing without FAQs");
            return KnowledgeBase::default();
        }
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "FAQ file is not valid JSON, ignoring it");
            return KnowledgeBase::default();
        }
    };

    let Value::Object(map) = value else {
        tracing::warn!(path = %path.display(), "FAQ file is not a JSON object, ignoring it");
        return KnowledgeBase::default();
    };

    let mut entries = Vec::with_capacity(map.len());
    for (topic, value) in map {
        match value {
            Value::String(answer) => {
                let keywords = topic
                    .to_lowercase()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                entries.push((topic, KnowledgeEntry { answer, keywords }));
            }
            Value::Object(_) => match serde_json::from_value::<KnowledgeEntry>(value) {
                Ok(entry) => entries.push((topic, entry)),
                Err(e) => {
                    tracing::warn!(topic = %topic, error = %e, "skipping malformed FAQ entry");
                }
            },
            _ => {
                tracing::warn!(topic = %topic, "skipping FAQ entry that is neither text nor an object");
            }
        }
    }

    tracing::debug!(entries = entries.len(), "knowledge base loaded");
    KnowledgeBase { entries }
}

/// Find the entry whose keywords hit the query most often.
///
/// A hit is a keyword occurring as a literal substring of the lowercased
/// query. Only a strictly greater hit count replaces the running best, so
/// ties go to the earliest-inserted entry. Zero hits everywhere means no
/// match.
pub fn find_match(query: &str, kb: &KnowledgeBase) -> Option<FaqMatch> {
    let q = query.to_lowercase();
    let mut best: Option<&KnowledgeEntry> = None;
    let mut max_hits = 0;

    for (_, entry) in kb.iter() {
        let hits = entry.keywords.iter().filter(|kw| q.contains(kw.as_str())).count();
        if hits > max_hits {
            max_hits = hits;
            best = Some(entry);
        }
    }

    best.map(|entry| FaqMatch {
        answer: entry.answer.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn kb_from_json(json: &str) -> KnowledgeBase {
        let (path, mut file) = tempfile_path();
        write!(file, "{}", json).unwrap();
        load(&path)
    }

    // Unique temp file per test without extra dev-dependencies.
    fn tempfile_path() -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!("vicky-kb-{}.json", uuid::Uuid::new_v4()));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }

    #[test]
    fn missing_file_yields_empty_base() {
        let kb = load(Path::new("/nonexistent/knowledge_base.json"));
        assert!(kb.is_empty());
    }

    #[test]
    fn invalid_json_yields_empty_base() {
        let kb = kb_from_json("{not json");
        assert!(kb.is_empty());
    }

    #[test]
    fn non_object_top_level_yields_empty_base() {
        let kb = kb_from_json(r#"["fees", "hostel"]"#);
        assert!(kb.is_empty());
    }

    #[test]
    fn legacy_entry_derives_keywords_from_key() {
        let kb = kb_from_json(r#"{"library hours": "9am-5pm"}"#);
        let entry = kb.get("library hours").unwrap();
        assert_eq!(entry.answer, "9am-5pm");
        assert_eq!(entry.keywords, vec!["library", "hours"]);
    }

    #[test]
    fn structured_entry_passes_through() {
        let kb = kb_from_json(
            r#"{"fees": {"answer": "Pay at the office.", "keywords": ["fee", "fees", "payment"]}}"#,
        );
        let entry = kb.get("fees").unwrap();
        assert_eq!(entry.answer, "Pay at the office.");
        assert_eq!(entry.keywords.len(), 3);
    }

    #[test]
    fn malformed_entry_is_skipped_not_fatal() {
        let kb = kb_from_json(r#"{"fees": 42, "hostel": "On campus."}"#);
        assert_eq!(kb.len(), 1);
        assert!(kb.get("hostel").is_some());
    }

    #[test]
    fn no_keyword_hits_means_no_match() {
        let kb = kb_from_json(
            r#"{"fees": {"answer": "Pay at the office.", "keywords": ["fee", "fees", "payment"]}}"#,
        );
        assert!(find_match("what is the weather", &kb).is_none());
    }

    #[test]
    fn highest_hit_count_wins() {
        let kb = kb_from_json(
            r#"{
                "fees": {"answer": "Pay at the office.", "keywords": ["fee", "payment"]},
                "hostel": {"answer": "On campus.", "keywords": ["hostel"]}
            }"#,
        );
        let m = find_match("what is the fee payment process", &kb).unwrap();
        assert_eq!(m.answer, "Pay at the office.");
    }

    #[test]
    fn tie_goes_to_earliest_inserted_entry() {
        let kb = kb_from_json(
            r#"{
                "hostel": {"answer": "On campus.", "keywords": ["campus"]},
                "fees": {"answer": "Pay at the office.", "keywords": ["campus"]}
            }"#,
        );
        let m = find_match("is it on campus", &kb).unwrap();
        assert_eq!(m.answer, "On campus.");
    }

    #[test]
    fn matching_is_substring_containment_not_tokenized() {
        let kb = kb_from_json(r#"{"fees": {"answer": "Pay at the office.", "keywords": ["fee"]}}"#);
        // "fee" occurs inside "coffee"
        assert!(find_match("where can I buy coffee", &kb).is_some());
    }
}
