use serde::{Deserialize, Serialize};

use crate::model::lesson::VideoRef;

/// Category a dictionary sign belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignCategory {
    Alphabet,
    Number,
    CommonPhrase,
}

/// A single sign in the static dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub id: String,
    pub word: String,
    pub category: SignCategory,
    pub description: String,
    pub video: VideoRef,
}

impl DictionaryEntry {
    /// Case-insensitive substring match on the word, mirroring the search box.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.word.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Filters entries by search term and optional category.
#[must_use]
pub fn search<'a>(
    entries: &'a [DictionaryEntry],
    term: &str,
    category: Option<SignCategory>,
) -> Vec<&'a DictionaryEntry> {
    entries
        .iter()
        .filter(|entry| entry.matches(term))
        .filter(|entry| category.is_none_or(|wanted| entry.category == wanted))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, word: &str, category: SignCategory) -> DictionaryEntry {
        DictionaryEntry {
            id: id.to_owned(),
            word: word.to_owned(),
            category,
            description: String::new(),
            video: VideoRef::asset("videos/alphabet-1.mp4").unwrap(),
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let entries = vec![
            entry("alphabet-a", "A", SignCategory::Alphabet),
            entry("phrase-hello", "Hello", SignCategory::CommonPhrase),
        ];

        let hits = search(&entries, "hel", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].word, "Hello");
    }

    #[test]
    fn search_filters_by_category() {
        let entries = vec![
            entry("alphabet-a", "A", SignCategory::Alphabet),
            entry("number-1", "1", SignCategory::Number),
        ];

        let hits = search(&entries, "", Some(SignCategory::Number));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "number-1");
    }

    #[test]
    fn empty_term_matches_everything() {
        let entries = vec![entry("alphabet-a", "A", SignCategory::Alphabet)];
        assert_eq!(search(&entries, "", None).len(), 1);
    }
}
