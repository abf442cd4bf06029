//! Bounded fuzzy similarity over normalized character sequences.
//!
//! Both measures are indel based: a substitution counts as one deletion plus
//! one insertion, so `ratio = 2 * LCS / (len_a + len_b)`.

/// Length of the longest common subsequence of `a` and `b`.
///
/// Common prefix and suffix are stripped first; the remaining core runs the
/// two-row DP in `O(len_a * len_b)` time and `O(min(len_a, len_b))` memory.
pub fn lcs_len(a: &[char], b: &[char]) -> usize {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return prefix + suffix;
    }

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];
    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prefix + suffix + prev[short.len()]
}

/// Whole-string similarity in [0, 1]. Symmetric.
///
/// Returns 0 when either side is empty, including two empty strings.
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let lcs = lcs_len(a, b);
    (2 * lcs) as f64 / (a.len() + b.len()) as f64
}

/// Similarity in [0, 1] of `needle` against its best-aligning substring of
/// `haystack`.
///
/// Runs a semi-global indel alignment (free leading and trailing haystack
/// characters) in `O(len_needle * len_haystack)` time and
/// `O(len_needle)` memory. For every haystack end position the cheapest
/// substring is scored as `1 - dist / (len_needle + len_substring)`; among
/// equally cheap substrings the shorter one is kept. Not symmetric.
pub fn partial_ratio(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    if n == 0 || haystack.is_empty() {
        return 0.0;
    }

    // Column j holds, for each needle prefix length i, the cheapest alignment
    // against a haystack substring ending at j and where that substring starts.
    let mut dist: Vec<usize> = (0..=n).collect();
    let mut start: Vec<usize> = vec![0; n + 1];
    let mut best = 0.0f64;

    for (j, &hc) in haystack.iter().enumerate() {
        let mut diag = (dist[0], start[0]);
        dist[0] = 0;
        start[0] = j + 1;

        for i in 1..=n {
            let up = (dist[i], start[i]);

            let mut cell = (up.0 + 1, up.1);
            let skip_needle = (dist[i - 1] + 1, start[i - 1]);
            if cheaper(skip_needle, cell) {
                cell = skip_needle;
            }
            if needle[i - 1] == hc && !cheaper(cell, diag) {
                cell = diag;
            }

            diag = up;
            dist[i] = cell.0;
            start[i] = cell.1;
        }

        let substring_len = j + 1 - start[n];
        let score = 1.0 - dist[n] as f64 / (n + substring_len) as f64;
        if score > best {
            best = score;
        }
        if best >= 1.0 {
            break;
        }
    }

    best.clamp(0.0, 1.0)
}

/// Lower distance wins; on equal distance the later start (shorter substring) wins.
#[inline]
fn cheaper(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.0 || (a.0 == b.0 && a.1 > b.1)
}
