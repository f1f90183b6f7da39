use once_cell::sync::Lazy;
use regex::Regex;

/// Year token in a bibliography entry: `(2020)` or a bare `2020` followed by
/// `.`, `,` or whitespace.
pub(crate) static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((\d{4}[a-z]?)\)|(?:^|\s)(\d{4}[a-z]?)(?:\.|,|\s)").unwrap()
});

/// Strip one leading citation prefix ("see also", "e.g.,", "cf.") from an
/// author string. Prefixes are tried longest first and only match as whole
/// words, so "Seeger" keeps its "See".
pub fn strip_citation_prefix<'a>(text: &'a str, prefixes: &[String]) -> &'a str {
    let text = text.trim();
    let mut sorted: Vec<&str> = prefixes.iter().map(String::as_str).collect();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.len()));

    for prefix in sorted {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            continue;
        }
        let Some(head) = text.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &text[prefix.len()..];
        let boundary = prefix.ends_with(|c: char| !c.is_alphanumeric())
            || rest.chars().next().is_none_or(|c| !c.is_alphanumeric());
        if boundary {
            return rest.trim_start();
        }
    }
    text
}

/// Split the author part of an in-text citation into surname tokens.
///
/// "et al." is dropped first. Commas combined with `and`/`&` are treated as
/// one list ("Smith, Jones, and Brown"); otherwise the string is split on
/// whichever separator it has.
pub fn split_citation_authors(author_str: &str) -> Vec<String> {
    static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bet\s+al\b\.?").unwrap());
    static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*&\s*|\s+and\s+").unwrap());

    let cleaned = ET_AL_RE.replace_all(author_str, "");
    let cleaned = cleaned.trim();

    let has_comma = cleaned.contains(',');
    let has_and = AND_RE.is_match(cleaned);

    let parts: Vec<String> = if has_comma && has_and {
        AND_RE
            .replace_all(cleaned, ",")
            .split(',')
            .map(str::to_string)
            .collect()
    } else if has_and {
        AND_RE.split(cleaned).map(str::to_string).collect()
    } else if has_comma {
        cleaned.split(',').map(str::to_string).collect()
    } else {
        vec![cleaned.to_string()]
    };

    parts
        .iter()
        .map(|p| p.trim().trim_end_matches([',', '.', ';', ':']).trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract author surnames and the year from one bibliography entry.
///
/// The author zone is the text before the year (cut at the first quotation
/// mark for MLA-style titles). Without a year, the zone runs to the first
/// sentence-ending period.
pub fn extract_author_year(text: &str) -> (Vec<String>, Option<String>) {
    static PERIOD_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^([^.]+?)\.(?:\s+[A-Z]|$)").unwrap());
    static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^([^"']+)"#).unwrap());

    let mut year = None;
    let zone: &str = match YEAR_RE.captures(text) {
        Some(caps) => {
            if let Some(paren) = caps.get(1) {
                year = Some(paren.as_str().to_string());
                caps.get(0).map_or("", |m| &text[..m.start()]).trim()
            } else if let Some(bare) = caps.get(2) {
                year = Some(bare.as_str().to_string());
                text[..bare.start()]
                    .trim()
                    .trim_end_matches(['.', ',', '(', ')', ' '])
            } else {
                ""
            }
        }
        None => {
            if let Some(c) = PERIOD_RE.captures(text).and_then(|c| c.get(1)) {
                c.as_str().trim()
            } else if let Some(c) = QUOTE_RE.captures(text).and_then(|c| c.get(1)) {
                c.as_str().trim()
            } else {
                let end = text
                    .char_indices()
                    .nth(100)
                    .map_or(text.len(), |(i, _)| i);
                &text[..end]
            }
        }
    };

    let zone = match zone.find(['"', '\u{201C}']) {
        Some(idx) => zone[..idx].trim().trim_end_matches(['.', ',', ' ']),
        None => zone,
    };

    (parse_bib_authors(zone), year)
}

/// Surnames from an author zone such as "Smith, J., & Jones, K.".
pub(crate) fn parse_bib_authors(zone: &str) -> Vec<String> {
    static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bet\s+al\b\.?").unwrap());
    static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+&\s+|\s+and\s+").unwrap());

    let zone = ET_AL_RE.replace_all(zone, "");
    let mut authors: Vec<String> = Vec::new();

    for fragment in SPLIT_RE.split(zone.trim()) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        if fragment.contains(',') {
            authors.extend(inverted_names(fragment));
        } else if let Some(name) = last_real_word(fragment) {
            authors.push(name.to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    authors.retain(|a| seen.insert(a.clone()));
    authors
}

/// Surnames from a comma-separated fragment. A lone surname ("Smith, J.")
/// is followed by its given names; multi-word segments ("J. Smith",
/// "Jessica LP Weeks") are natural-order names.
fn inverted_names(fragment: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut expect_given = false;

    for (i, segment) in fragment.split(',').enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if i == 0 && segment.split_whitespace().count() == 1 {
            names.push(segment.to_string());
            expect_given = true;
            continue;
        }
        if expect_given {
            expect_given = false;
            continue;
        }

        let real: Vec<&str> = real_words(segment).collect();
        match real.as_slice() {
            [] => {}
            [single] if segment.split_whitespace().count() == 1 => {
                names.push(single.to_string());
                expect_given = true;
            }
            [.., last] => names.push(last.to_string()),
        }
    }
    names
}

/// Words longer than one letter once periods are removed (not initials).
fn real_words(segment: &str) -> impl Iterator<Item = &str> {
    segment
        .split_whitespace()
        .filter(|w| w.chars().filter(|c| *c != '.').count() > 1)
}

fn last_real_word(fragment: &str) -> Option<&str> {
    real_words(fragment)
        .last()
        .or_else(|| fragment.split_whitespace().last())
}

/// Best-effort title: the first quoted span, else the sentence following the
/// year token.
pub fn extract_title(text: &str) -> Option<String> {
    static QUOTED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#""([^"]+)"|\x{201C}([^\x{201D}]+)\x{201D}"#).unwrap());

    if let Some(caps) = QUOTED_RE.captures(text) {
        let span = caps.get(1).or_else(|| caps.get(2))?;
        let title = span.as_str().trim().trim_end_matches([',', '.']).trim();
        return (!title.is_empty()).then(|| title.to_string());
    }

    let year = YEAR_RE.find(text)?;
    let rest = text[year.end()..].trim_start_matches(['.', ',', ')', ' ']);
    let sentence = rest.split('.').next()?.trim();
    (!sentence.is_empty()).then(|| sentence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suppression::DEFAULT_CITATION_PREFIXES;

    fn prefixes() -> Vec<String> {
        DEFAULT_CITATION_PREFIXES.iter().map(|s| s.to_string()).collect()
    }

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_strip_prefix_longest_first() {
        let p = prefixes();
        assert_eq!(strip_citation_prefix("see also Smith", &p), "Smith");
        assert_eq!(strip_citation_prefix("e.g., Smith", &p), "Smith");
        assert_eq!(strip_citation_prefix("but see Jones", &p), "Jones");
        assert_eq!(strip_citation_prefix("cf. Brown", &p), "Brown");
    }

    #[test]
    fn test_strip_prefix_whole_word_only() {
        let p = prefixes();
        assert_eq!(strip_citation_prefix("Seeger", &p), "Seeger");
        assert_eq!(strip_citation_prefix("Comparetti", &p), "Comparetti");
        assert_eq!(strip_citation_prefix("See Smith", &p), "Smith");
    }

    #[test]
    fn test_split_single_and_pair() {
        assert_eq!(split_citation_authors("Smith"), s(&["Smith"]));
        assert_eq!(split_citation_authors("Smith & Jones"), s(&["Smith", "Jones"]));
        assert_eq!(split_citation_authors("Smith and Jones"), s(&["Smith", "Jones"]));
    }

    #[test]
    fn test_split_comma_list_with_conjunction() {
        assert_eq!(
            split_citation_authors("Smith, Jones, and Brown"),
            s(&["Smith", "Jones", "Brown"])
        );
        assert_eq!(
            split_citation_authors("Smith, Jones, & Brown,"),
            s(&["Smith", "Jones", "Brown"])
        );
    }

    #[test]
    fn test_split_et_al() {
        assert_eq!(split_citation_authors("Smith et al."), s(&["Smith"]));
        assert_eq!(split_citation_authors("Smith et al"), s(&["Smith"]));
    }

    #[test]
    fn test_extract_apa_entry() {
        let (authors, year) =
            extract_author_year("Smith, J., & Jones, K. (2020). A study of things. Journal, 1.");
        assert_eq!(authors, s(&["Smith", "Jones"]));
        assert_eq!(year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_extract_inverted_full_names() {
        let (authors, _) = extract_author_year("Smith, John (2020). Title.");
        assert_eq!(authors, s(&["Smith"]));

        let (authors, _) =
            extract_author_year("Brown, Thomas, and Williams, Sarah (2019). Title.");
        assert_eq!(authors, s(&["Brown", "Williams"]));

        let (authors, _) =
            extract_author_year("Chen, Li, Wang, Mei, and Kumar, Raj (2021). Title.");
        assert_eq!(authors, s(&["Chen", "Wang", "Kumar"]));
    }

    #[test]
    fn test_extract_mixed_natural_order() {
        let (authors, year) =
            extract_author_year("Tomz, Michael, Jessica LP Weeks (2020). Public opinion.");
        assert_eq!(authors, s(&["Tomz", "Weeks"]));
        assert_eq!(year.as_deref(), Some("2020"));

        let (authors, _) = extract_author_year("Boxell, L., Gentzkow, M. (2017). Title.");
        assert_eq!(authors, s(&["Boxell", "Gentzkow"]));
    }

    #[test]
    fn test_extract_mla_entry() {
        let (authors, year) =
            extract_author_year("Smith, John. \"A Title.\" Journal of Things, vol. 3, 2019, pp. 1-10.");
        assert_eq!(authors, s(&["Smith"]));
        assert_eq!(year.as_deref(), Some("2019"));
    }

    #[test]
    fn test_extract_numbered_content() {
        let (authors, year) = extract_author_year("J. Smith, \"Title,\" Journal, 2020.");
        assert_eq!(authors, s(&["Smith"]));
        assert_eq!(year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_extract_ieee_comma_list() {
        let (authors, year) =
            extract_author_year("J. Smith, K. Lee, and M. Park, \"Title,\" Journal, 2020.");
        assert_eq!(authors, s(&["Smith", "Lee", "Park"]));
        assert_eq!(year.as_deref(), Some("2020"));

        let (authors, _) =
            extract_author_year("John Smith, Kate Lee, and Min Park. \"Title.\" Press, 2018.");
        assert_eq!(authors, s(&["Smith", "Lee", "Park"]));
    }

    #[test]
    fn test_extract_no_year() {
        let (authors, year) = extract_author_year("Doe, Jane. Untitled Manuscript.");
        assert_eq!(authors, s(&["Doe"]));
        assert!(year.is_none());
    }

    #[test]
    fn test_extract_et_al_and_suffix_year() {
        let (authors, year) = extract_author_year("Türkoğlu, D. et al. (2022a). Title.");
        assert_eq!(authors, s(&["Türkoğlu"]));
        assert_eq!(year.as_deref(), Some("2022a"));
    }

    #[test]
    fn test_extract_dedups_authors() {
        let (authors, _) = extract_author_year("Lee, K., & Lee, K. (2020). Title.");
        assert_eq!(authors, s(&["Lee"]));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("Smith, J. (2020). A study of things. Journal.").as_deref(),
            Some("A study of things")
        );
        assert_eq!(
            extract_title("J. Smith, \"Deep nets,\" Proc. X, 2020.").as_deref(),
            Some("Deep nets")
        );
        assert_eq!(
            extract_title("Smith, John. \u{201C}Curly Title.\u{201D} Press, 2001.").as_deref(),
            Some("Curly Title")
        );
        assert!(extract_title("Smith, J.").is_none());
    }
}
