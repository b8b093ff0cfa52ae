//! Ranked fuzzy search over the history ring, for an incremental
//! history-search UI. Pure algorithmic port of the scoring formula in
//! spec.md §4.4; no teacher analog.

use super::ring::HistoryRing;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub number: u64,
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
}

fn category_base(cmd_lower: &str, pattern_lower: &str) -> Option<(Category, Option<usize>)> {
    if cmd_lower == pattern_lower {
        return Some((Category::Exact, Some(0)));
    }
    if cmd_lower.starts_with(pattern_lower) {
        return Some((Category::Prefix, Some(0)));
    }
    if let Some(pos) = cmd_lower.find(pattern_lower) {
        return Some((Category::Substring, Some(pos)));
    }
    if subsequence_match(cmd_lower, pattern_lower).is_some() {
        return Some((Category::Fuzzy, None));
    }
    None
}

/// Greedy in-order subsequence match. Returns the matched byte positions in
/// `cmd` for each char of `pattern`, or `None` if not all chars matched.
fn subsequence_match(cmd: &str, pattern: &str) -> Option<Vec<usize>> {
    let cmd_chars: Vec<char> = cmd.chars().collect();
    let mut positions = Vec::with_capacity(pattern.chars().count());
    let mut cursor = 0;
    for pc in pattern.chars() {
        let mut found = None;
        while cursor < cmd_chars.len() {
            if cmd_chars[cursor] == pc {
                found = Some(cursor);
                cursor += 1;
                break;
            }
            cursor += 1;
        }
        match found {
            Some(pos) => positions.push(pos),
            None => return None,
        }
    }
    Some(positions)
}

fn fuzzy_subscore(cmd: &str, pattern: &str, positions: &[usize]) -> f64 {
    let pattern_len = pattern.chars().count().max(1);
    let target_len = cmd.chars().count().max(1);

    let mut max_run = 1usize;
    let mut run = 1usize;
    let mut gaps = 0usize;
    for w in positions.windows(2) {
        if w[1] == w[0] + 1 {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 1;
            gaps += w[1] - w[0] - 1;
        }
    }

    let consecutive_ratio = max_run as f64 / pattern_len as f64;
    let gap_ratio = (gaps.min(target_len)) as f64 / target_len as f64;
    0.6 * consecutive_ratio + 0.4 * (1.0 - gap_ratio)
}

fn length_bonus(pattern_len: usize, cmd_len: usize) -> f64 {
    if cmd_len == 0 {
        return 0.0;
    }
    ((pattern_len as f64 / cmd_len as f64) * 5.0).min(5.0)
}

fn recency_bonus(index: usize, total: usize) -> f64 {
    if total <= 1 {
        return 15.0;
    }
    (index as f64 / (total - 1) as f64) * 15.0
}

fn substring_position_bonus(pos: Option<usize>) -> f64 {
    match pos {
        Some(p) => (10.0 - p as f64).max(0.0),
        None => 0.0,
    }
}

/// Scores and ranks history entries against `query`, case-insensitively,
/// returning at most `k` results in descending score order.
pub fn ranked_search(ring: &HistoryRing, query: &str, k: usize) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }
    let pattern_lower = query.to_lowercase();
    let total = ring.len();
    let mut scored: Vec<SearchResult> = ring
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let cmd_lower = entry.text.to_lowercase();
            let (category, pos) = category_base(&cmd_lower, &pattern_lower)?;

            let base = match category {
                Category::Exact => 100.0,
                Category::Prefix => 80.0,
                Category::Substring => 60.0,
                Category::Fuzzy => {
                    let positions = subsequence_match(&cmd_lower, &pattern_lower)?;
                    let sub = fuzzy_subscore(&cmd_lower, &pattern_lower, &positions);
                    20.0 + 30.0 * sub
                }
            };

            let score = base
                + substring_position_bonus(pos)
                + recency_bonus(idx, total)
                + length_bonus(pattern_lower.chars().count(), cmd_lower.chars().count());

            Some(SearchResult {
                number: entry.number,
                text: entry.text.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_with(cmds: &[&str]) -> HistoryRing {
        let mut r = HistoryRing::new(100);
        for c in cmds {
            r.push(c);
        }
        r
    }

    #[test]
    fn exact_match_outranks_substring() {
        let ring = ring_with(&["git status", "git stat", "ls"]);
        let results = ranked_search(&ring, "git stat", 10);
        assert_eq!(results[0].text, "git stat");
    }

    #[test]
    fn prefix_outranks_substring() {
        let ring = ring_with(&["cargo build", "run cargo build release"]);
        let results = ranked_search(&ring, "cargo", 10);
        assert_eq!(results[0].text, "cargo build");
    }

    #[test]
    fn recency_breaks_ties_among_equal_category() {
        let ring = ring_with(&["ytest abc", "ytest def"]);
        let results = ranked_search(&ring, "ytest", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "ytest def");
    }

    #[test]
    fn no_match_returns_empty() {
        let ring = ring_with(&["echo hi"]);
        assert!(ranked_search(&ring, "zzzzz", 10).is_empty());
    }

    #[test]
    fn truncates_to_k() {
        let ring = ring_with(&["aa1", "aa2", "aa3", "aa4"]);
        let results = ranked_search(&ring, "aa", 2);
        assert_eq!(results.len(), 2);
    }
}
