//! Result Set Entity

use serde::{Deserialize, Serialize};

use super::CheckResult;

/// Ordered, append-only results of one validation run.
///
/// A run creates its own `ResultSet` and passes it down; there is no
/// process-wide accumulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<CheckResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn into_vec(self) -> Vec<CheckResult> {
        self.results
    }

    /// Results recorded at or after `start`, used to attribute results to a suite.
    pub fn since(&self, start: usize) -> &[CheckResult] {
        self.results.get(start..).unwrap_or(&[])
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new();
        set.push(CheckResult::pass("a", "Identity", "ok"));
        set.push(CheckResult::fail("b", "Isolation", "no"));
        set.push(CheckResult::pass("c", "Isolation", "ok"));
        set
    }

    #[test]
    fn counts_add_up() {
        let set = sample();
        assert_eq!(set.len(), 3);
        assert_eq!(set.passed() + set.failed(), set.len());
        assert_eq!(set.failed(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let names: Vec<_> = sample().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn since_returns_tail() {
        let set = sample();
        assert_eq!(set.since(1).len(), 2);
        assert!(set.since(3).is_empty());
        assert!(set.since(10).is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(3));
    }
}
