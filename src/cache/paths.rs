// Cache path utilities.
// Maps gist IDs to entry file names inside the cache directory.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Extension shared by every cache entry.
pub const ENTRY_EXTENSION: &str = "json";

/// File name for a gist ID: hex SHA-256 of the ID, so any ID is path-safe
/// and distinct IDs never share a file.
pub fn entry_file_name(id: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    format!("{}.{}", hex::encode(digest), ENTRY_EXTENSION)
}

/// Path to the cache entry for a gist ID.
pub fn entry_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(entry_file_name(id))
}

/// Whether a path names a cache entry: a SHA-256 hex stem plus the entry extension.
pub fn is_entry(path: &Path) -> bool {
    let has_extension = path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION);
    let hex_stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.len() == 64 && stem.bytes().all(|b| b.is_ascii_hexdigit()));
    has_extension && hex_stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_file_name_is_deterministic() {
        assert_eq!(entry_file_name("abc"), entry_file_name("abc"));
        assert_ne!(entry_file_name("abc"), entry_file_name("abd"));
        assert_eq!(
            entry_file_name("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.json"
        );
    }

    #[test]
    fn test_entry_path_is_path_safe() {
        let dir = Path::new("/tmp/gisty");
        for id in ["../escape", "a/b", "c:\\d", ""] {
            let path = entry_path(dir, id);
            assert_eq!(path.parent(), Some(dir));
            assert!(is_entry(&path));
        }
    }

    #[test]
    fn test_is_entry() {
        assert!(is_entry(&entry_path(Path::new("x"), "abc")));
        assert!(!is_entry(Path::new("x/abc.json")));
        assert!(!is_entry(Path::new("x/settings.json")));
        let digest = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(!is_entry(Path::new(&format!("x/{}.tmp", digest))));
        assert!(!is_entry(Path::new(&format!("x/{}", digest))));
        assert!(!is_entry(Path::new(&format!("x/{}z.json", &digest[1..]))));
    }
}
