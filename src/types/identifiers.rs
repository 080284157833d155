use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Storage key of a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an already-final storage key. No normalization is applied.
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    /// Derive a storage key from a human-provided key, prefixed by the
    /// document type: `user` + `Kore` gives `user-kore`.
    pub fn from_key(doc_type: &str, key: &str, type_separator: &str, separator: &str) -> Self {
        DocumentId(format!("{doc_type}{type_separator}{}", normalize(key, separator)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque revision token. Only ever produced by a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(token: impl Into<String>) -> Self {
        Revision(token.into())
    }

    /// Next revision in the `<generation>-<hash>` form, chained on the
    /// previous revision and the serialized body being written.
    pub fn next(previous: Option<&Revision>, body: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        if let Some(prev) = previous {
            hasher.update(prev.as_str().as_bytes());
        }
        hasher.update(body);

        let hash = hex::encode(hasher.finalize());
        let generation = previous.and_then(Revision::generation).unwrap_or(0) + 1;

        Revision(format!("{generation}-{}", &hash[..32]))
    }

    /// Leading generation counter, if the token has one.
    pub fn generation(&self) -> Option<u64> {
        self.0.split_once('-').and_then(|(n, _)| n.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize an arbitrary human string into a storage-safe key.
///
/// Letters and digits are transliterated to ASCII where a mapping exists,
/// everything else becomes `separator`, runs of separators collapse to one,
/// and the result is lowercased. Empty or fully unmappable input yields
/// exactly `separator`.
///
/// Input is composed to NFC first, so precomposed and decomposed spellings
/// of the same text give the same key; leftover combining marks are dropped.
/// Transliteration of non-ASCII letters still depends on the mapping table,
/// so callers needing stable ids across environments should pass ASCII keys.
pub fn normalize(input: &str, separator: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    let push = |out: &mut String, piece: &str, pending: &mut bool| {
        for c in piece.chars() {
            if c.is_ascii_alphanumeric() {
                if *pending {
                    out.push_str(separator);
                    *pending = false;
                }
                out.push(c.to_ascii_lowercase());
            } else {
                *pending = true;
            }
        }
    };

    for c in input.nfc() {
        if c.is_ascii() {
            let mut buf = [0u8; 4];
            push(&mut out, c.encode_utf8(&mut buf), &mut pending_separator);
            continue;
        }
        match deunicode::deunicode_char(c) {
            // Combining marks transliterate to nothing.
            Some("") => {}
            Some(ascii) if c.is_alphanumeric() && ascii.chars().any(|a| a.is_ascii_alphanumeric()) => {
                push(&mut out, ascii, &mut pending_separator)
            }
            _ => pending_separator = true,
        }
    }

    if pending_separator || out.is_empty() {
        out.push_str(separator);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(normalize("kore", "_"), "kore");
        assert_eq!(normalize("Kore", "_"), "kore");
    }

    #[test]
    fn punctuation_collapses() {
        assert_eq!(normalize("a  b--c", "_"), "a_b_c");
        assert_eq!(normalize("!hello!", "-"), "-hello-");
    }

    #[test]
    fn empty_is_separator() {
        assert_eq!(normalize("", "_"), "_");
        assert_eq!(normalize("!!!", "-"), "-");
    }

    #[test]
    fn combining_marks_do_not_split_words() {
        assert_eq!(normalize("o\u{308}a\u{308}u\u{308}", "_"), normalize("öäü", "_"));
        assert_eq!(normalize("e\u{301}te\u{301}", "_"), normalize("été", "_"));
    }

    #[test]
    fn revision_generation_increments() {
        let first = Revision::next(None, b"{}");
        let second = Revision::next(Some(&first), b"{}");
        assert_eq!(first.generation(), Some(1));
        assert_eq!(second.generation(), Some(2));
        assert_ne!(first, second);
    }
}
