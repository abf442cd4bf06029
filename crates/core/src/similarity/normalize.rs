//! Text normalization applied before any similarity scoring.
//!
//! Steps, in order:
//! 1. Unicode NFKC (folds ligatures such as `ﬁ` and full-width forms)
//! 2. Smart quotes and dashes mapped to ASCII, invisible characters dropped
//! 3. Line-break hyphenation removed (`exam-\nple` becomes `example`)
//! 4. Lowercasing
//! 5. Whitespace runs collapsed to a single space, ends trimmed

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static LINE_BREAK_HYPHEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w)-[ \t]*\r?\n\s*(\w)").expect("line-break hyphen pattern is valid")
});

/// Characters that carry no visible content in extracted text.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'          // SOFT HYPHEN
        | '\u{200B}'        // ZERO WIDTH SPACE
        | '\u{200C}'        // ZERO WIDTH NON-JOINER
        | '\u{200D}'        // ZERO WIDTH JOINER
        | '\u{2060}'        // WORD JOINER
        | '\u{FEFF}' // ZERO WIDTH NO-BREAK SPACE (BOM)
    )
}

fn ascii_equivalent(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => '"',
        '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
        _ => c,
    }
}

/// Joins words split across a line break. Matches consume the first
/// character of the next word, so chained single-character breaks such as
/// `a-\nb-\nc` need another pass.
fn dehyphenate(mut text: String) -> String {
    while LINE_BREAK_HYPHEN.is_match(&text) {
        text = LINE_BREAK_HYPHEN.replace_all(&text, "$1$2").into_owned();
    }
    text
}

/// Normalizes `text` for fuzzy comparison.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .filter(|&c| !is_invisible(c))
        .map(ascii_equivalent)
        .collect();

    let lowered = dehyphenate(folded).to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
