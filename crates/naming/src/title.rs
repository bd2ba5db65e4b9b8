//! Title guessing from uploaded file names.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(SEPARATORS, r"[_-]");
regex!(LEADING_JUNK, r"^[0-9\W]+");
regex!(PARENTHESISED, r"\s*\([^)]*\)");
regex!(BRACKETED, r"\s*\[[^\]]*\]");
regex!(MIX, r"(?i)\s*mix\s*");

/// Returns the extension of a file name (text after the last dot), if any.
///
/// ```
/// use stamp_naming::extension;
///
/// assert_eq!(extension("song.final.mp3"), Some("mp3"));
/// assert_eq!(extension("README"), None);
/// assert_eq!(extension("trailing."), None);
/// ```
pub fn extension(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

/// Replaces the extension of `file_name` with `ext`, appending it when the
/// name has none.
pub fn replace_extension(file_name: &str, ext: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    format!("{stem}.{}", ext.trim_start_matches('.'))
}

/// Derives an uppercase title from a file name.
///
/// The stem (everything before the final dot) has separators turned into
/// spaces, leading track numbers and punctuation stripped, parenthesised and
/// bracketed content removed, and the first "mix" dropped.
///
/// ```
/// use stamp_naming::extract_title;
///
/// assert_eq!(extract_title("01 - Night_Drive (Club Mix) [2024].mp3"), "NIGHT DRIVE");
/// ```
pub fn extract_title(file_name: &str) -> String {
    // Names without a dot have no stem at all.
    let stem = file_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or_default();
    let title = SEPARATORS.replace_all(stem, " ");
    let title = LEADING_JUNK.replace(&title, "");
    let title = PARENTHESISED.replace_all(&title, "");
    let title = BRACKETED.replace_all(&title, "");
    let title = MIX.replace(&title, " ");
    title.trim().to_uppercase()
}
