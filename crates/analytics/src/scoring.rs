//! Population-relative quantile scoring.
//!
//! Values are ranked ascending and the ranks are cut into five equal-width
//! groups, which splits the population into quintiles. Equal values share
//! their average rank and therefore always share a score. A population with
//! one member or a single distinct value lands entirely in the middle bucket.

use configuration::settings::MAX_SCORE;

/// The score given when a population cannot be split.
pub const MIDDLE_SCORE: u8 = MAX_SCORE.div_ceil(2);

/// Scores every value in `1..=5`, higher values scoring higher.
///
/// The returned vector is parallel to `values`.
pub fn quantile_scores<T: Ord>(values: &[T]) -> Vec<u8> {
    let n = values.len();
    if n <= 1 {
        return vec![MIDDLE_SCORE; n];
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].cmp(&values[b]));

    let mut scores = vec![MIDDLE_SCORE; n];
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }

        // 1-based ranks start+1..=end+1; their average, doubled, is start+end+2.
        let score = bucket(start + end + 2, n);
        for &i in &order[start..=end] {
            scores[i] = score;
        }
        start = end + 1;
    }
    scores
}

/// Scores every value in `1..=5`, lower values scoring higher.
pub fn inverse_quantile_scores<T: Ord>(values: &[T]) -> Vec<u8> {
    quantile_scores(values)
        .into_iter()
        .map(|score| MAX_SCORE + 1 - score)
        .collect()
}

/// Maps a doubled average rank among `n > 1` values to its bucket:
/// `max(1, ceil(5 * (rank - 1) / (n - 1)))`.
fn bucket(twice_rank: usize, n: usize) -> u8 {
    let buckets = usize::from(MAX_SCORE);
    let numerator = buckets * (twice_rank - 2);
    let denominator = 2 * (n - 1);
    let score = numerator.div_ceil(denominator).clamp(1, buckets);
    score as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_distinct_values_use_every_score() {
        assert_eq!(quantile_scores(&[50, 10, 40, 20, 30]), vec![5, 1, 4, 2, 3]);
    }

    #[test]
    fn ten_values_split_into_pairs() {
        let values: Vec<u32> = (1..=10).collect();
        assert_eq!(quantile_scores(&values), vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
    }

    #[test]
    fn two_values_take_the_extremes() {
        assert_eq!(quantile_scores(&[150, 10]), vec![5, 1]);
    }

    #[test]
    fn uniform_population_gets_middle_score() {
        assert_eq!(quantile_scores(&[7, 7, 7, 7]), vec![3, 3, 3, 3]);
        assert_eq!(quantile_scores(&[1, 1]), vec![3, 3]);
        assert_eq!(quantile_scores(&["only"]), vec![3]);
        assert!(quantile_scores::<u8>(&[]).is_empty());
    }

    #[test]
    fn ties_share_a_score() {
        // Ranks 1..=4 tie on 1 (average 2.5); 5 and 6 stand alone.
        let scores = quantile_scores(&[1, 1, 1, 1, 2, 3]);
        assert_eq!(scores, vec![2, 2, 2, 2, 4, 5]);
    }

    #[test]
    fn inverse_scores_favour_small_values() {
        assert_eq!(inverse_quantile_scores(&[0, 30, 365]), vec![5, 3, 1]);
        assert_eq!(inverse_quantile_scores(&[4, 4]), vec![3, 3]);
    }

    #[test]
    fn scores_are_always_in_range() {
        for n in 1..40usize {
            let values: Vec<usize> = (0..n).map(|i| (i * 7) % 5).collect();
            for score in quantile_scores(&values) {
                assert!((1..=5).contains(&score), "n={} score={}", n, score);
            }
        }
    }
}
