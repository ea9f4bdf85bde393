//! Typo suggestions for unknown references.

/// Classic two-row Levenshtein edit distance.
///
/// # Examples
///
/// ```
/// use giotto_script::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("bg", "bg"), 0);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}

/// Candidate corrections for an unknown reference.
///
/// Returns up to 3 known identifiers whose edit distance to `target` is at
/// most half the target's length, ordered by increasing distance (ties
/// broken lexicographically so results are deterministic).
///
/// # Examples
///
/// ```
/// use giotto_script::suggest;
///
/// let known = ["background", "narration", "cutscene"];
/// let candidates = suggest("backgroud", known.iter().copied());
/// assert_eq!(candidates, vec!["background".to_string()]);
///
/// // distance greater than half the target's length yields nothing
/// assert!(suggest("xyz", known.iter().copied()).is_empty());
/// ```
pub fn suggest<'a>(target: &str, known: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = known
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| distance * 2 <= target.chars().count())
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);

    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_handles_unicode() {
        assert_eq!(levenshtein("héros", "heros"), 1);
    }

    #[test]
    fn suggestions_are_bounded_and_ordered() {
        let known = ["shot_1", "shot_2", "shot_3", "shot_10", "unrelated"];
        let candidates = suggest("shot_4", known.iter().copied());
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0], "shot_1");
        assert!(!candidates.contains(&"unrelated".to_string()));
    }

    #[test]
    fn half_length_bound_is_inclusive() {
        // distance 2, target length 4: 2 * 2 <= 4 keeps the candidate
        let candidates = suggest("abcd", ["abxy"].iter().copied());
        assert_eq!(candidates, vec!["abxy".to_string()]);
        // distance 3, target length 4: dropped
        assert!(suggest("abcd", ["axyz"].iter().copied()).is_empty());
    }
}
