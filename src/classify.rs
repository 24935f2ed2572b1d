//! Extension-based classification.

use std::path::Path;

use crate::config::CategoryMap;

/// Label returned when no category claims the extension.
pub const OTHER_CATEGORY: &str = "other";

/// Lowercase extension of the file name, including the leading dot.
/// Empty when there is none. A name that only starts with a dot (".env") has no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Map a path to its category label, or [`OTHER_CATEGORY`].
pub fn classify<'a>(path: &Path, categories: &'a CategoryMap) -> &'a str {
    categories
        .category_for(&extension_of(path))
        .unwrap_or(OTHER_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn map() -> CategoryMap {
        let mut raw = BTreeMap::new();
        raw.insert("images".to_string(), vec![".png".to_string(), ".jpg".to_string()]);
        raw.insert("documents".to_string(), vec![".pdf".to_string()]);
        raw.insert("archives".to_string(), vec![".gz".to_string()]);
        CategoryMap::build(&raw).0
    }

    #[test]
    fn known_extensions_map_to_their_category() {
        let m = map();
        assert_eq!(classify(Path::new("/dl/photo.png"), &m), "images");
        assert_eq!(classify(Path::new("scan.jpg"), &m), "images");
        assert_eq!(classify(Path::new("report.pdf"), &m), "documents");
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(classify(Path::new("PHOTO.PNG"), &map()), "images");
    }

    #[test]
    fn unknown_or_missing_extension_is_other() {
        let m = map();
        assert_eq!(classify(Path::new("notes.xyz"), &m), OTHER_CATEGORY);
        assert_eq!(classify(Path::new("Makefile"), &m), OTHER_CATEGORY);
        assert_eq!(classify(Path::new(".env"), &m), OTHER_CATEGORY);
    }

    #[test]
    fn only_final_extension_counts() {
        assert_eq!(classify(Path::new("backup.tar.gz"), &map()), "archives");
        assert_eq!(extension_of(Path::new("backup.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("README")), "");
    }
}
