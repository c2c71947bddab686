/// Number of aligned positions whose genes differ, plus the length
/// difference.
///
/// For node paths this counts how many stops two routes disagree on.
///
/// # Examples
///
/// ```
/// use u_evopath::distance::hamming_distance;
///
/// assert_eq!(hamming_distance(&[true, false, true], &[true, true, false]), 2);
/// assert_eq!(hamming_distance(&[0, 1, 2, 0], &[0, 1, 0]), 2);
/// ```
pub fn hamming_distance<G: PartialEq>(a: &[G], b: &[G]) -> usize {
    let differing = a.iter().zip(b).filter(|(x, y)| x != y).count();
    differing + a.len().abs_diff(b.len())
}

/// Euclidean distance over the aligned prefix of two real-valued genomes.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (y - x).powi(2))
        .sum::<f64>()
        .sqrt()
}
