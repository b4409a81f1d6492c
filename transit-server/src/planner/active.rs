//! Lines currently on the road.

use std::collections::HashSet;

use crate::domain::Estimate;

/// Uppercased labels of every line with at least one live estimate record.
///
/// Only lines in this set are offered as routes, so a valid itinerary on a
/// line with no buses running right now is not reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveLineSet {
    lines: HashSet<String>,
}

impl ActiveLineSet {
    pub fn from_estimates(estimates: &[Estimate]) -> Self {
        Self::from_labels(estimates.iter().map(|e| e.line.as_str()))
    }

    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let lines = labels
            .into_iter()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_uppercase)
            .collect();
        Self { lines }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, line: &str) -> bool {
        self.lines.contains(&line.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(line: &str) -> Estimate {
        Estimate {
            stop_id: "1".to_string(),
            line: line.to_string(),
            arrivals: Vec::new(),
        }
    }

    #[test]
    fn derives_uppercased_distinct_lines() {
        let estimates = vec![estimate("15"), estimate("n3"), estimate("N3"), estimate("15")];
        let active = ActiveLineSet::from_estimates(&estimates);

        assert_eq!(active.len(), 2);
        assert!(active.contains("15"));
        assert!(active.contains("N3"));
        assert!(active.contains("n3"));
        assert!(!active.contains("7"));
    }

    #[test]
    fn ignores_blank_labels() {
        let active = ActiveLineSet::from_labels(["", "  ", "21"]);
        assert_eq!(active.len(), 1);
        assert!(!active.contains(""));
    }

    #[test]
    fn empty_snapshot_means_nothing_is_active() {
        let active = ActiveLineSet::from_estimates(&[]);
        assert!(active.is_empty());
        assert!(!active.contains("15"));
    }
}
