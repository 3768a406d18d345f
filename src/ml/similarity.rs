// Set overlap scoring shared by the similarity-based classifiers.
//
//   jaccard(A, B) = |A ∩ B| / |A ∪ B|
//
// Two empty sets score 0.0 rather than dividing by zero. Every strategy uses
// this one function, so the empty-set convention is the same everywhere.

use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity in `[0, 1]`.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = smaller.iter().filter(|item| larger.contains(item)).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_sets_score_zero() {
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["wallet"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_identical_sets_score_one() {
        let a = set(&["bomb", "threat", "station"]);
        assert!((jaccard(&a, &a) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_overlap() {
        let a = set(&["lost", "wallet"]);
        let b = set(&["wallet", "missing"]);
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_sets() {
        assert_eq!(jaccard(&set(&["gun"]), &set(&["graffiti", "wall"])), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let samples = [
            set(&[]),
            set(&["a"]),
            set(&["a", "b", "c"]),
            set(&["b", "c", "d", "e"]),
            set(&["x", "y"]),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(jaccard(a, b), jaccard(b, a));
                let score = jaccard(a, b);
                assert!((0.0..=1.0).contains(&score));
            }
        }
    }
}
