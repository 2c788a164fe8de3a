// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scratch files for the current session.
//!
//! Fetched feed data and downloaded thumbnails live in one directory that
//! is emptied when the application exits. Thumbnails are named by the
//! SHA256 of their URL so that revisiting an event reuses the download.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::FeedError;

pub const DATA_FILE_NAME: &str = "current_data.json";
const IMAGE_PREFIX: &str = "image-";
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Debug, Clone)]
pub struct SessionFiles {
    dir: PathBuf,
}

impl SessionFiles {
    /// Use `dir` for session files, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| FeedError::io(&dir, e))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the last fetched feed is written.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE_NAME)
    }

    /// Where the thumbnail downloaded from `url` is kept.
    #[must_use]
    pub fn image_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        let ext = url
            .rsplit('.')
            .next()
            .map(str::to_ascii_lowercase)
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or_else(|| "img".to_string());

        self.dir.join(format!("{IMAGE_PREFIX}{hash}.{ext}"))
    }

    /// Bytes of a previously stored thumbnail.
    #[must_use]
    pub fn cached_image(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.image_path(url)).ok()
    }

    pub fn store_image(&self, url: &str, bytes: &[u8]) -> Result<PathBuf, FeedError> {
        let path = self.image_path(url);
        fs::write(&path, bytes).map_err(|e| FeedError::io(&path, e))?;
        Ok(path)
    }

    /// Delete the data file and every stored thumbnail, then the directory
    /// itself if nothing else is left in it. Returns the number of files
    /// removed.
    pub fn cleanup(&self) -> usize {
        let mut removed = 0;

        let data = self.data_path();
        if data.is_file() {
            match fs::remove_file(&data) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Failed to remove {}: {e}", data.display()),
            }
        }

        if let Ok(entries) = fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                let is_image = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(IMAGE_PREFIX));
                if is_image {
                    match fs::remove_file(entry.path()) {
                        Ok(()) => removed += 1,
                        Err(e) => log::warn!("Failed to remove {:?}: {e}", entry.path()),
                    }
                }
            }
        }

        // Only succeeds when empty
        let _ = fs::remove_dir(&self.dir);

        log::debug!("Removed {removed} session files from {}", self.dir.display());
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path_is_stable_and_keeps_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let files = SessionFiles::new(tmp.path()).unwrap();

        let url = "https://upload.wikimedia.org/thumb/Kobuk.JPG";
        let a = files.image_path(url);
        assert_eq!(a, files.image_path(url));
        assert_eq!(a.extension().unwrap(), "jpg");
        assert_ne!(a, files.image_path("https://upload.wikimedia.org/thumb/Other.png"));

        let odd = files.image_path("https://example.org/thumb?id=3");
        assert_eq!(odd.extension().unwrap(), "img");
    }

    #[test]
    fn test_cleanup_removes_data_and_images() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("session");
        let files = SessionFiles::new(&dir).unwrap();

        fs::write(files.data_path(), b"{}").unwrap();
        let image = files.store_image("https://example.org/a.png", b"png").unwrap();
        assert_eq!(files.cached_image("https://example.org/a.png").unwrap(), b"png");

        assert_eq!(files.cleanup(), 2);
        assert!(!files.data_path().exists());
        assert!(!image.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_cleanup_leaves_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let files = SessionFiles::new(tmp.path()).unwrap();
        fs::write(tmp.path().join("notes.txt"), b"keep").unwrap();

        assert_eq!(files.cleanup(), 0);
        assert!(tmp.path().join("notes.txt").exists());
    }
}
