//! Sensitive-word screening for user submissions.

/// Case-insensitive substring matcher over a configured word list.
#[derive(Debug, Clone, Default)]
pub struct SensitiveFilter {
    words: Vec<String>,
}

impl SensitiveFilter {
    /// Build a filter; blank entries are ignored.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The first configured word found in `text`, if any.
    pub fn find(&self, text: &str) -> Option<&str> {
        if self.words.is_empty() {
            return None;
        }
        let haystack = text.to_lowercase();
        self.words
            .iter()
            .find(|w| haystack.contains(w.as_str()))
            .map(String::as_str)
    }
}
