//! Fuzzy title matching for client-side result refinement.

use crate::model::Recipe;

/// Levenshtein edit distance between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows are enough; full matrix is never needed
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Edit distance scaled by the longer input, in `0.0..=1.0` (0 = identical).
fn normalized_distance(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

/// Match quality of a title against a query, smaller is better.
///
/// A title matches either as a whole or through one of its words; scoring
/// both ways keeps "Chicken Noodle Soup" close to the query "chicken" even
/// though the full strings are far apart.
pub fn title_score(query: &str, title: &str) -> f64 {
    let query = query.to_lowercase();
    let title = title.to_lowercase();

    let mut best = normalized_distance(&query, &title);
    for word in title.split_whitespace() {
        let score = normalized_distance(&query, word);
        if score < best {
            best = score;
        }
    }
    best
}

/// Keep the candidates whose titles score within `threshold` of the query,
/// best match first. Larger thresholds match more loosely. Candidates with
/// equal scores keep their input order, so the output is fully determined by
/// (query, candidates, threshold).
pub fn filter_by_title(query: &str, candidates: Vec<Recipe>, threshold: f64) -> Vec<Recipe> {
    let mut scored: Vec<(f64, Recipe)> = candidates
        .into_iter()
        .map(|recipe| (title_score(query, &recipe.title), recipe))
        .filter(|(score, _)| *score <= threshold)
        .collect();

    // Stable sort: ties keep candidate order
    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, recipe)| recipe).collect()
}
