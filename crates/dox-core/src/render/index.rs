//! Alphabetical index buckets.

use crate::types::Policy;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Policies sharing the same folded initial, sorted by title.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBucket<'a> {
    pub letter: String,
    pub policies: Vec<&'a Policy>,
}

/// Title folded for comparison: trimmed, accents stripped, lowercased.
#[must_use]
pub fn collation_key(title: &str) -> String {
    title
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Bucket letter of a title: the uppercased initial of its collation key,
/// `#` when that is not alphabetic or the title is blank.
#[must_use]
pub fn initial_of(title: &str) -> String {
    match collation_key(title).chars().next() {
        Some(c) if c.is_alphabetic() => c.to_uppercase().collect(),
        _ => String::from("#"),
    }
}

/// Index order: bucket letter, then collation key, then the raw title.
#[must_use]
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    initial_of(a)
        .cmp(&initial_of(b))
        .then_with(|| collation_key(a).cmp(&collation_key(b)))
        .then_with(|| a.cmp(b))
}

/// Sort `policies` by title and bucket them by initial, buckets in
/// ascending order.
#[must_use]
pub fn index_buckets<'a>(policies: impl IntoIterator<Item = &'a Policy>) -> Vec<IndexBucket<'a>> {
    let mut keyed: Vec<(String, String, &'a Policy)> = policies
        .into_iter()
        .map(|p| (initial_of(&p.title), collation_key(&p.title), p))
        .collect();
    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.title.cmp(&b.2.title))
    });

    let mut buckets: Vec<IndexBucket<'a>> = Vec::new();
    for (letter, _, policy) in keyed {
        match buckets.last_mut() {
            Some(bucket) if bucket.letter == letter => bucket.policies.push(policy),
            _ => buckets.push(IndexBucket {
                letter,
                policies: vec![policy],
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PolicyCategory, PolicyNumber};

    fn titled(n: u32, title: &str) -> Policy {
        let number = PolicyNumber::parse(format!("GEN-IDX-{n:03}")).unwrap();
        Policy::new(n.to_string(), number, title, PolicyCategory::Governance, "text")
    }

    #[test]
    fn test_buckets_are_sorted_case_insensitively() {
        let policies = vec![
            titled(1, "Zebra Policy"),
            titled(2, "apple Rule"),
            titled(3, "Banana Code"),
        ];
        let buckets = index_buckets(&policies);
        let letters: Vec<&str> = buckets.iter().map(|b| b.letter.as_str()).collect();
        assert_eq!(letters, vec!["A", "B", "Z"]);
        assert_eq!(buckets[0].policies[0].title, "apple Rule");
    }

    #[test]
    fn test_same_initial_shares_a_bucket() {
        let policies = vec![titled(1, "beta"), titled(2, "Alpha"), titled(3, "alpine")];
        let buckets = index_buckets(&policies);
        assert_eq!(buckets.len(), 2);
        let titles: Vec<&str> = buckets[0].policies.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "alpine"]);
    }

    #[test]
    fn test_initial_of_folds_accents_and_blanks() {
        assert_eq!(initial_of(""), "#");
        assert_eq!(initial_of("   "), "#");
        assert_eq!(initial_of("éclair"), "E");
        assert_eq!(initial_of("  zoning"), "Z");
        assert_eq!(initial_of("2024 Calendar"), "#");
    }

    #[test]
    fn test_leading_whitespace_joins_its_letter_bucket() {
        let policies = vec![
            titled(1, " Zebra Policy"),
            titled(2, "apple Rule"),
            titled(3, "Zoning Code"),
        ];
        let buckets = index_buckets(&policies);
        let letters: Vec<&str> = buckets.iter().map(|b| b.letter.as_str()).collect();
        assert_eq!(letters, vec!["A", "Z"]);
        let titles: Vec<&str> = buckets[1].policies.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec![" Zebra Policy", "Zoning Code"]);
    }

    #[test]
    fn test_accented_titles_sort_with_their_base_letter() {
        let policies = vec![
            titled(1, "Zebra Policy"),
            titled(2, "Éligibilité Rules"),
            titled(3, "Facility Code"),
            titled(4, "Eligibility Appeals"),
        ];
        let buckets = index_buckets(&policies);
        let letters: Vec<&str> = buckets.iter().map(|b| b.letter.as_str()).collect();
        assert_eq!(letters, vec!["E", "F", "Z"]);
        let titles: Vec<&str> = buckets[0].policies.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Éligibilité Rules", "Eligibility Appeals"]);
    }

    #[test]
    fn test_compare_titles_matches_bucket_order() {
        assert_eq!(compare_titles("#1 Rule", "apple"), Ordering::Less);
        assert_eq!(compare_titles("eclair", "Éclair"), Ordering::Less);
        assert_eq!(compare_titles(" beta", "Alpha"), Ordering::Greater);
    }
}
