//! Cross-workspace principal overlap

use std::collections::BTreeSet;

/// Result of intersecting two principal-ID sets.
///
/// `shared` is what fails the wall; `allowed` are overlaps that were
/// explicitly allow-listed and are reported but tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlap {
    pub shared: BTreeSet<String>,
    pub allowed: BTreeSet<String>,
}

impl Overlap {
    pub fn is_clean(&self) -> bool {
        self.shared.is_empty()
    }
}

/// Intersect provider and consumer principal IDs.
///
/// IDs are compared case-insensitively (directory object IDs are GUIDs and
/// the APIs do not agree on casing) and reported lowercased.
pub fn principal_overlap<'a, P, C, A>(provider: P, consumer: C, allowlist: A) -> Overlap
where
    P: IntoIterator<Item = &'a str>,
    C: IntoIterator<Item = &'a str>,
    A: IntoIterator<Item = &'a str>,
{
    let provider: BTreeSet<String> = provider.into_iter().map(normalize).collect();
    let consumer: BTreeSet<String> = consumer.into_iter().map(normalize).collect();
    let allow: BTreeSet<String> = allowlist.into_iter().map(normalize).collect();

    let mut overlap = Overlap::default();
    for id in provider.intersection(&consumer) {
        if allow.contains(id) {
            overlap.allowed.insert(id.clone());
        } else {
            overlap.shared.insert(id.clone());
        }
    }
    overlap
}

fn normalize(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn overlapping_sets_report_shared_principal() {
        let overlap = principal_overlap(["A", "B", "C"], ["B", "D"], NONE);
        assert!(!overlap.is_clean());
        assert_eq!(overlap.shared.into_iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn disjoint_sets_are_clean() {
        let overlap = principal_overlap(["A", "B"], ["C", "D"], NONE);
        assert!(overlap.is_clean());
        assert!(overlap.shared.is_empty());
    }

    #[test]
    fn allowlisted_principals_do_not_fail() {
        let overlap = principal_overlap(["A", "B"], ["b", "a"], ["A"]);
        assert_eq!(overlap.shared.len(), 1);
        assert!(overlap.allowed.contains("a"));
    }

    #[test]
    fn comparison_ignores_case_and_whitespace() {
        let overlap = principal_overlap([" ABC-1 "], ["abc-1"], NONE);
        assert!(overlap.shared.contains("abc-1"));
    }
}
