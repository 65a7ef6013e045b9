//! Value-frequency rankings over categorical columns

use serde::Serialize;
use std::collections::HashMap;

/// `(value, count)` pairs, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyRanking {
    pub entries: Vec<(String, usize)>,
}

impl FrequencyRanking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(v, _)| v.as_str()).collect()
    }
}

/// Count non-null values and sort by count descending.
///
/// Ties keep first-appearance order. With `top_n`, the result holds exactly
/// `min(top_n, distinct)` entries.
pub fn frequency_ranking<'a, I>(values: I, top_n: Option<usize>) -> FrequencyRanking
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, usize)> = Vec::new();

    for value in values.into_iter().flatten() {
        match position.get(value) {
            Some(&i) => entries[i].1 += 1,
            None => {
                position.insert(value, entries.len());
                entries.push((value.to_string(), 1));
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    if let Some(n) = top_n {
        entries.truncate(n);
    }

    FrequencyRanking { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // RANKING ORDER
    // ==========================================================================

    #[test]
    fn test_sorted_by_count_descending() {
        let values = ["b", "a", "b", "c", "b", "a"];
        let r = frequency_ranking(values.iter().map(|v| Some(*v)), None);
        assert_eq!(
            r.entries,
            vec![("b".to_string(), 3), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
        assert!(r.entries.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let values = ["x", "y", "z"];
        let r = frequency_ranking(values.iter().map(|v| Some(*v)), None);
        assert_eq!(r.labels(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_nulls_excluded_before_counting() {
        let values = vec![None, Some("a"), None, Some("a"), None];
        let r = frequency_ranking(values, None);
        assert_eq!(r.entries, vec![("a".to_string(), 2)]);
        assert_eq!(r.total(), 2);
    }

    #[test]
    fn test_all_null_is_empty() {
        let r = frequency_ranking(vec![None, None], Some(15));
        assert!(r.is_empty());
        assert_eq!(r.max_count(), 0);
    }

    // ==========================================================================
    // TRUNCATION
    // ==========================================================================
    //
    // Truncating to N returns exactly min(N, distinct-value-count) entries.
    // ==========================================================================

    #[test]
    fn test_truncation_to_n() {
        let values: Vec<String> = (0..20).map(|i| format!("v{}", i)).collect();
        let r = frequency_ranking(values.iter().map(|v| Some(v.as_str())), Some(15));
        assert_eq!(r.len(), 15);
    }

    #[test]
    fn test_truncation_larger_than_distinct() {
        let values = ["a", "b", "a"];
        let r = frequency_ranking(values.iter().map(|v| Some(*v)), Some(15));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_truncation_keeps_top_entries() {
        let values = ["a", "b", "b", "c", "c", "c"];
        let r = frequency_ranking(values.iter().map(|v| Some(*v)), Some(2));
        assert_eq!(r.labels(), vec!["c", "b"]);
    }
}
