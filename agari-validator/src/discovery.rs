use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

/// Recursively finds files under `root` whose extension is `extension`.
/// The result is sorted so that a seeded shuffle is reproducible.
pub fn find_log_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}
