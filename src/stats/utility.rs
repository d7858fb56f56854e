use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences of each distinct value, most frequent first.
///
/// Values with equal counts keep the order in which they were first seen.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The most frequent value, or `None` for empty input. Ties go to the value
/// seen first.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

/// Arithmetic mean of `count` values summing to `total`. Returns `None` when
/// there are no values.
pub fn mean(total: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_empty() {
        assert_eq!(mode(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        for _ in 0..10 {
            assert_eq!(mode(["A", "B", "A", "B"]), Some("A"));
            assert_eq!(mode(["B", "A", "A", "B"]), Some("B"));
        }
    }

    #[test]
    fn test_mode_clear_winner() {
        assert_eq!(mode([3, 1, 2, 2, 1, 2]), Some(2));
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(["Customer", "Subscriber", "Subscriber", "Dependent", "Customer"]);
        assert_eq!(
            counts,
            vec![("Customer", 2), ("Subscriber", 2), ("Dependent", 1)]
        );
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(360.0, 3), Some(120.0));
        assert_eq!(mean(0.0, 0), None);
    }
}
