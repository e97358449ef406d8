use std::fs;
use std::path::Path;
use tracing::warn;

/// Load one value per line from a curated text file, skipping blanks and
/// `#` comments. A missing or unreadable file is an empty list, not an error,
/// so the app still starts with whatever other sources provide.
pub fn load_text_file(path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read list file {:?}: {}", path, e);
            return Vec::new();
        }
    };

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.txt");
        fs::write(&path, "# comment\n\nalpha\n beta \n").unwrap();

        assert_eq!(
            load_text_file(&path),
            vec!["alpha".to_string(), "beta".to_string()]
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        assert!(load_text_file(&PathBuf::from("/nonexistent/path.txt")).is_empty());
    }
}
