//! Photo discovery.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info, warn};

use super::PhotoError;

/// File extensions treated as photos, compared case-insensitively.
pub const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            PHOTO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Recursively find photos under `dir`, sorted by path.
pub fn discover_photos(dir: &Path) -> Result<Vec<PathBuf>, PhotoError> {
    if !dir.is_dir() {
        return Err(PhotoError::NotADirectory(dir.to_path_buf()));
    }

    let pattern = format!("{}/**/*", Pattern::escape(&dir.to_string_lossy()));
    let mut photos = Vec::new();

    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() && is_photo(&path) => photos.push(path),
            Ok(path) => debug!("Skipping non-photo {:?}", path),
            Err(e) => warn!("Unreadable directory entry: {}", e),
        }
    }

    photos.sort();
    info!("Found {} photos in {:?}", photos.len(), dir);
    Ok(photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_photo() {
        assert!(is_photo(Path::new("a/b/final.JPG")));
        assert!(is_photo(Path::new("team.jpeg")));
        assert!(is_photo(Path::new("x.Png")));
        assert!(!is_photo(Path::new("final.jpg.txt")));
        assert!(!is_photo(Path::new("README")));
    }

    #[test]
    fn test_discover_recursive_and_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("day2")).unwrap();
        fs::write(root.join("zeta.jpg"), b"").unwrap();
        fs::write(root.join("alpha.PNG"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();
        fs::write(root.join("day2").join("toss.bmp"), b"").unwrap();

        let found = discover_photos(root).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["alpha.PNG", "day2/toss.bmp", "zeta.jpg"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let err = discover_photos(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, PhotoError::NotADirectory(_)));
    }
}
