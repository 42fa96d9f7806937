//! Word-list extraction from PDF text.
//!
//! Scans extracted text for English-word / Japanese-meaning line pairs: a
//! line of English letters arms a pending word, and the next line containing
//! CJK characters becomes its meaning. Pairs are emitted as `word=meaning`.

use regex::Regex;
use std::sync::LazyLock;

/// A line consisting only of English letters, spaces, and apostrophes.
static WORD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s']+$").expect("word pattern"));

/// Hiragana, katakana, or kanji anywhere in the line.
static HAS_CJK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{3040}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}]").expect("meaning pattern")
});

/// Trailing hiragana, stripped from meanings (okurigana and particles).
static TRAILING_HIRAGANA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{3040}-\x{309F}]+$").expect("trailing-kana pattern"));

/// Extract `word=meaning` entries from text.
///
/// Lines starting with `word` or `PAGE` are treated as column headers and
/// skipped. A word line with no following meaning line produces no entry.
pub fn parse_word_list(text: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        let line = line.trim();
        if WORD_LINE.is_match(line) && !line.starts_with("word") && !line.starts_with("PAGE") {
            pending = Some(line);
        } else if let Some(word) = pending
            && HAS_CJK.is_match(line)
        {
            let meaning = TRAILING_HIRAGANA.replace(line, "");
            entries.push(format!("{}={}", word, meaning.trim()));
            pending = None;
        }
    }

    entries
}
