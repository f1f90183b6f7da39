/// Reduce an author-name fragment to a comparable surname token.
///
/// Periods and commas are removed and the last whitespace-separated word is
/// returned lower-cased, so "J. M. Smith", "Smith," and "smith" all become
/// `"smith"`. A fragment with no words yields its trimmed, lower-cased form.
pub fn normalize_last_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| !matches!(c, '.' | ',')).collect();
    let cleaned = cleaned.trim();
    match cleaned.split_whitespace().last() {
        Some(word) => word.to_lowercase(),
        None => cleaned.to_lowercase(),
    }
}

/// Normalize every name in an author list, preserving order.
pub fn normalize_all(authors: &[String]) -> Vec<String> {
    authors.iter().map(|a| normalize_last_name(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_takes_rightmost_token() {
        assert_eq!(normalize_last_name("J. M. Smith"), "smith");
        assert_eq!(normalize_last_name("Smith"), "smith");
        assert_eq!(normalize_last_name("Van Bavel"), "bavel");
    }

    #[test]
    fn test_strips_periods_and_commas() {
        assert_eq!(normalize_last_name("Smith,"), "smith");
        assert_eq!(normalize_last_name("Jones."), "jones");
        assert_eq!(normalize_last_name("Smith, J."), "j");
    }

    #[test]
    fn test_hyphenated_name_kept_whole() {
        assert_eq!(normalize_last_name("Smith-Jones"), "smith-jones");
    }

    #[test]
    fn test_diacritics_lowercased() {
        assert_eq!(normalize_last_name("Élodie Müller"), "müller");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_last_name(""), "");
        assert_eq!(normalize_last_name(" .,"), "");
    }

    #[test]
    fn test_normalize_all() {
        assert_eq!(
            normalize_all(&s(&["Smith", "K. Lee"])),
            s(&["smith", "lee"])
        );
    }
}
