//! Stopword lists.
//!
//! The analysis only ever asks "is this lowercase word a stopword?", so a
//! [`StopwordSet`] is a plain set of lowercase strings tagged with the
//! language it was loaded for.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{AnalysisError, Result};

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Lowercase stopwords for one language, optionally extended from a file.
#[derive(Clone, Debug, Default)]
pub struct StopwordSet {
    language: String,
    words: HashSet<String>,
}

impl StopwordSet {
    /// Built-in list for `tag`. Only `"english"` ships with the crate.
    pub fn for_language(tag: &str) -> Result<Self> {
        let list = match tag.to_lowercase().as_str() {
            "english" => ENGLISH,
            other => {
                return Err(AnalysisError::configuration(format!(
                    "no stopword list for language '{other}'"
                )));
            }
        };
        Ok(StopwordSet {
            language: tag.to_lowercase(),
            words: list.iter().map(|w| w.to_string()).collect(),
        })
    }

    /// An empty set; nothing is filtered.
    pub fn none() -> Self {
        StopwordSet::default()
    }

    /// Add one word per line from `path`. Words are trimmed and lowercased.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::input_unavailable(format!(
                "stopword file {}: {e}",
                path.display()
            ))
        })?;
        let before = self.words.len();
        self.extend(content.lines());
        info!(
            "loaded {} extra stopwords from {}",
            self.words.len() - before,
            path.display()
        );
        Ok(())
    }

    pub fn extend<'a, I: IntoIterator<Item = &'a str>>(&mut self, words: I) {
        self.words.extend(
            words
                .into_iter()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase),
        );
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list() {
        let set = StopwordSet::for_language("English").unwrap();
        assert_eq!(set.len(), 179);
        assert_eq!(set.language(), "english");
        assert!(set.contains("the"));
        assert!(set.contains("wouldn't"));
        assert!(!set.contains("The"));
        assert!(!set.contains("york"));
    }

    #[test]
    fn test_unknown_language() {
        let err = StopwordSet::for_language("klingon").unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn test_extend_normalizes() {
        let mut set = StopwordSet::none();
        set.extend(["  Foo ", "", "BAR"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["bar", "foo"]);
    }

    #[test]
    fn test_missing_file() {
        let mut set = StopwordSet::none();
        let err = set
            .extend_from_file(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InputUnavailable(_)));
    }
}
