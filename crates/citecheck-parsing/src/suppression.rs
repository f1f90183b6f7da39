use std::collections::HashMap;

/// Why a word suppresses a candidate citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuppressionKind {
    /// "Table", "Figure", "Hypothesis", ...
    DocumentStructure,
    Month,
    /// "Around", "Since", "Spring", ...
    Temporal,
    /// "Vol", "Page", "Issue", ...
    Unit,
    /// Keyword before a bracketed number that makes it a cross-reference.
    CrossReference,
    /// Added through configuration.
    Custom,
}

/// Words that can never start an author name.
pub const DEFAULT_NON_AUTHOR_WORDS: &[(&str, SuppressionKind)] = &[
    ("hypothesis", SuppressionKind::DocumentStructure),
    ("table", SuppressionKind::DocumentStructure),
    ("figure", SuppressionKind::DocumentStructure),
    ("appendix", SuppressionKind::DocumentStructure),
    ("section", SuppressionKind::DocumentStructure),
    ("chapter", SuppressionKind::DocumentStructure),
    ("equation", SuppressionKind::DocumentStructure),
    ("model", SuppressionKind::DocumentStructure),
    ("result", SuppressionKind::DocumentStructure),
    ("study", SuppressionKind::DocumentStructure),
    ("example", SuppressionKind::DocumentStructure),
    ("case", SuppressionKind::DocumentStructure),
    ("scenario", SuppressionKind::DocumentStructure),
    ("version", SuppressionKind::DocumentStructure),
    ("step", SuppressionKind::DocumentStructure),
    ("january", SuppressionKind::Month),
    ("february", SuppressionKind::Month),
    ("march", SuppressionKind::Month),
    ("april", SuppressionKind::Month),
    ("may", SuppressionKind::Month),
    ("june", SuppressionKind::Month),
    ("july", SuppressionKind::Month),
    ("august", SuppressionKind::Month),
    ("september", SuppressionKind::Month),
    ("october", SuppressionKind::Month),
    ("november", SuppressionKind::Month),
    ("december", SuppressionKind::Month),
    ("around", SuppressionKind::Temporal),
    ("circa", SuppressionKind::Temporal),
    ("before", SuppressionKind::Temporal),
    ("after", SuppressionKind::Temporal),
    ("since", SuppressionKind::Temporal),
    ("until", SuppressionKind::Temporal),
    ("between", SuppressionKind::Temporal),
    ("from", SuppressionKind::Temporal),
    ("during", SuppressionKind::Temporal),
    ("report", SuppressionKind::Temporal),
    ("year", SuppressionKind::Temporal),
    ("period", SuppressionKind::Temporal),
    ("spring", SuppressionKind::Temporal),
    ("summer", SuppressionKind::Temporal),
    ("fall", SuppressionKind::Temporal),
    ("autumn", SuppressionKind::Temporal),
    ("winter", SuppressionKind::Temporal),
    ("quarter", SuppressionKind::Temporal),
    ("vol", SuppressionKind::Unit),
    ("volume", SuppressionKind::Unit),
    ("issue", SuppressionKind::Unit),
    ("page", SuppressionKind::Unit),
    ("number", SuppressionKind::Unit),
    ("article", SuppressionKind::Unit),
];

/// Keywords that, shortly before `[n]`, mark it as a cross-reference.
pub const DEFAULT_NUMERIC_KEYWORDS: &[&str] = &[
    "table", "figure", "fig.", "fig", "appendix", "section", "chapter",
];

/// Lead-ins stripped from an author string before splitting it.
pub const DEFAULT_CITATION_PREFIXES: &[&str] = &[
    "e.g.,", "e.g.", "eg.", "i.e.,", "i.e.", "ie.", "cf.", "cf", "see", "see also", "but see",
    "but cf.", "contra", "compare",
];

/// Word → kind lookup for the non-author blocklist.
#[derive(Debug, Clone, Default)]
pub struct SuppressionTable {
    words: HashMap<String, SuppressionKind>,
}

impl SuppressionTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SuppressionKind)>,
        S: AsRef<str>,
    {
        let words = entries
            .into_iter()
            .map(|(w, k)| (w.as_ref().trim().to_lowercase(), k))
            .filter(|(w, _)| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Kind of `word` (case-insensitive), also trying it without a plural `s`.
    pub fn lookup(&self, word: &str) -> Option<SuppressionKind> {
        let word = word.to_lowercase();
        if let Some(kind) = self.words.get(&word) {
            return Some(*kind);
        }
        word.strip_suffix('s')
            .and_then(|singular| self.words.get(singular))
            .copied()
    }

    /// Kind of the first word of `text`, if that word is in the table.
    pub fn leading_word_kind(&self, text: &str) -> Option<SuppressionKind> {
        let word: String = text
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect();
        if word.is_empty() {
            return None;
        }
        self.lookup(&word)
    }
}

/// Whether `keyword` occurs in `haystack` as a whole word (an optional
/// plural `s` is allowed). Both sides are compared lower-cased.
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return false;
    }

    for (idx, _) in haystack.match_indices(&keyword) {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let rest = &haystack[idx + keyword.len()..];
        let rest = rest.strip_prefix('s').unwrap_or(rest);
        let after_ok = keyword.ends_with(|c: char| !c.is_alphanumeric())
            || rest.chars().next().is_none_or(|c| !c.is_alphabetic());
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SuppressionTable {
        SuppressionTable::new(DEFAULT_NON_AUTHOR_WORDS.iter().copied())
    }

    #[test]
    fn test_leading_word_kinds() {
        let table = defaults();
        assert_eq!(
            table.leading_word_kind("Table 1"),
            Some(SuppressionKind::DocumentStructure)
        );
        assert_eq!(table.leading_word_kind("November"), Some(SuppressionKind::Month));
        assert_eq!(table.leading_word_kind("Around"), Some(SuppressionKind::Temporal));
        assert_eq!(table.leading_word_kind("Vol. 3"), Some(SuppressionKind::Unit));
        assert_eq!(table.leading_word_kind("Smith"), None);
    }

    #[test]
    fn test_whole_word_not_prefix() {
        let table = defaults();
        assert_eq!(table.leading_word_kind("Mayer"), None);
        assert_eq!(table.leading_word_kind("Fromm and Smith"), None);
        assert_eq!(table.leading_word_kind("Casey"), None);
    }

    #[test]
    fn test_plural_lookup() {
        let table = defaults();
        assert_eq!(
            table.leading_word_kind("Figures"),
            Some(SuppressionKind::DocumentStructure)
        );
        assert_eq!(table.leading_word_kind("Ross"), None);
    }

    #[test]
    fn test_custom_table() {
        let table = SuppressionTable::new([("Exhibit", SuppressionKind::Custom)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.leading_word_kind("exhibit 4"), Some(SuppressionKind::Custom));
        assert!(SuppressionTable::default().is_empty());
    }

    #[test]
    fn test_contains_keyword() {
        assert!(contains_keyword("as shown in table ", "table"));
        assert!(contains_keyword("see Tables ", "table"));
        assert!(contains_keyword("in fig. ", "fig."));
        assert!(contains_keyword("in fig ", "fig"));
        assert!(!contains_keyword("the configuration ", "fig"));
        assert!(!contains_keyword("a stable result ", "table"));
        assert!(!contains_keyword("", "table"));
    }
}
