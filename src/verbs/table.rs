//! Searchable irregular verb table

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::IrregularVerb;

pub const NO_MATCHES_MESSAGE: &str = "No verbs match your search. / Ничего не найдено.";

/// Lowercased, accent-free, trimmed form used on both sides of a comparison
pub fn normalize_for_search(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// A blank query matches everything
pub fn matches_search(verb: &IrregularVerb, query: &str) -> bool {
    let query = normalize_for_search(query);
    if query.is_empty() {
        return true;
    }
    [&verb.v1, &verb.v2, &verb.v3, &verb.ru]
        .iter()
        .any(|field| normalize_for_search(field).contains(&query))
}

pub fn filter<'a>(verbs: &'a [IrregularVerb], query: &str) -> Vec<&'a IrregularVerb> {
    verbs.iter().filter(|v| matches_search(v, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbs() -> Vec<IrregularVerb> {
        vec![
            IrregularVerb::new("go", "went", "gone", "идти"),
            IrregularVerb::new("be", "was/were", "been", "быть"),
            IrregularVerb::new("fly", "flew", "flown", "летать"),
        ]
    }

    #[test]
    fn test_normalize_strips_case_and_accents() {
        assert_eq!(normalize_for_search("  Café "), "cafe");
        assert_eq!(normalize_for_search("ИДТИ"), "идти");
        // й decomposes to и + breve
        assert_eq!(normalize_for_search("й"), "и");
    }

    #[test]
    fn test_blank_query_matches_all() {
        let verbs = verbs();
        assert_eq!(filter(&verbs, "").len(), 3);
        assert_eq!(filter(&verbs, "   ").len(), 3);
    }

    #[test]
    fn test_matches_any_form() {
        let verbs = verbs();
        let hits = filter(&verbs, "WENT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].v1, "go");

        assert_eq!(filter(&verbs, "were")[0].v1, "be");
        assert_eq!(filter(&verbs, "лет")[0].v1, "fly");
    }

    #[test]
    fn test_no_matches() {
        let verbs = verbs();
        assert!(filter(&verbs, "swim").is_empty());
    }
}
