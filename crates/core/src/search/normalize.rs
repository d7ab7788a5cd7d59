//! Text normalization shared by indexing and querying.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lowercase `text`, decompose it (NFD) and drop combining marks, so that
/// `"Élan"` and `"elan"` compare equal.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)).collect()
}
