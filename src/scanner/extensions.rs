//! Lexical extension buckets and their ranking.

use std::collections::BTreeMap;

/// Bucket for files whose name carries no extension.
pub const NO_EXTENSION: &str = "[no extension]";

/// Extension bucket for a file name: the suffix from the last `.` inclusive.
///
/// Names without a dot, or made of nothing but dots, fall into
/// [`NO_EXTENSION`]. A trailing dot after a name is its own `"."` bucket, and
/// leading dots get no special treatment, so `.bashrc` is its own bucket.
#[must_use]
pub fn extension_key(file_name: &str) -> &str {
    let bytes = file_name.as_bytes();
    match memchr::memrchr(b'.', bytes) {
        Some(dot) if bytes.iter().any(|&b| b != b'.') => &file_name[dot..],
        _ => NO_EXTENSION,
    }
}

/// The `limit` most populated buckets, by descending count.
///
/// Ties keep the map's iteration order (alphabetical for a `BTreeMap`).
#[must_use]
pub fn top_extensions(file_types: &BTreeMap<String, u64>, limit: usize) -> Vec<(&str, u64)> {
    let mut ranked: Vec<(&str, u64)> = file_types
        .iter()
        .map(|(ext, count)| (ext.as_str(), *count))
        .collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::{NO_EXTENSION, extension_key, top_extensions};
    use std::collections::BTreeMap;

    #[test]
    fn extension_is_suffix_from_last_dot() {
        assert_eq!(extension_key("a.txt"), ".txt");
        assert_eq!(extension_key("archive.tar.gz"), ".gz");
        assert_eq!(extension_key("Photo.JPG"), ".JPG");
    }

    #[test]
    fn names_without_usable_dot_use_sentinel() {
        assert_eq!(extension_key("README"), NO_EXTENSION);
        assert_eq!(extension_key(""), NO_EXTENSION);
        assert_eq!(extension_key("."), NO_EXTENSION);
        assert_eq!(extension_key(".."), NO_EXTENSION);
    }

    #[test]
    fn trailing_dot_after_a_name_is_its_own_bucket() {
        assert_eq!(extension_key("notes."), ".");
        assert_eq!(extension_key("draft.v2."), ".");
        assert_eq!(extension_key(".hidden."), ".");
    }

    #[test]
    fn leading_dot_is_not_special() {
        assert_eq!(extension_key(".bashrc"), ".bashrc");
        assert_eq!(extension_key(".config.toml"), ".toml");
    }

    #[test]
    fn multibyte_names_slice_on_the_dot() {
        assert_eq!(extension_key("résumé.pdf"), ".pdf");
        assert_eq!(extension_key("データ"), NO_EXTENSION);
    }

    #[test]
    fn ranking_is_by_descending_count_with_stable_ties() {
        let mut types = BTreeMap::new();
        types.insert(".rs".to_string(), 4);
        types.insert(".md".to_string(), 2);
        types.insert(".toml".to_string(), 4);
        types.insert(NO_EXTENSION.to_string(), 1);

        let ranked = top_extensions(&types, 3);
        assert_eq!(ranked, vec![(".rs", 4), (".toml", 4), (".md", 2)]);
    }

    #[test]
    fn ranking_limit_zero_or_oversized() {
        let mut types = BTreeMap::new();
        types.insert(".log".to_string(), 1);
        assert!(top_extensions(&types, 0).is_empty());
        assert_eq!(top_extensions(&types, 10), vec![(".log", 1)]);
    }
}
