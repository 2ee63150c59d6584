//! Edit distance for fuzzy text matching.

/// Damerau-Levenshtein distance (optimal string alignment variant):
/// insertions, deletions, substitutions, and adjacent transpositions each
/// cost 1. O(n·m) time and space.
///
/// Used by the dispatcher to tolerate OCR noise in store names, and by the
/// wider system to fuzzy-match item names against a product catalog.
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut dist = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in dist.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        dist[0][j] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);

            let mut best = (dist[i - 1][j] + 1)
                .min(dist[i][j - 1] + 1)
                .min(dist[i - 1][j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(dist[i - 2][j - 2] + 1);
            }

            dist[i][j] = best;
        }
    }

    dist[n][m]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_and_empty() {
        assert_eq!(damerau_levenshtein("costco", "costco"), 0);
        assert_eq!(damerau_levenshtein("", ""), 0);
        assert_eq!(damerau_levenshtein("", "target"), 6);
        assert_eq!(damerau_levenshtein("target", ""), 6);
    }

    #[test]
    fn test_substitution_and_indel() {
        assert_eq!(damerau_levenshtein("milk", "mill"), 1);
        assert_eq!(damerau_levenshtein("milk", "milks"), 1);
        assert_eq!(damerau_levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_adjacent_transposition() {
        assert_eq!(damerau_levenshtein("ab", "ba"), 1);
        assert_eq!(damerau_levenshtein("cotsco", "costco"), 1);
    }

    #[test]
    fn test_unequal_lengths() {
        assert_eq!(damerau_levenshtein("tragte", "target"), 2);
        assert_eq!(damerau_levenshtein("wholesale", "whole"), 4);
    }
}
