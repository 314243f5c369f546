//! Logo lookup – finds pre-fetched channel logos on disk.
//!
//! Logos are stored as `{number}_{code}.png` in a single directory. Entries
//! without a file simply render without a logo.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::channels::ChannelEntry;

#[derive(Debug, Clone, Default)]
pub struct LogoLookup {
    paths: HashMap<(String, String), PathBuf>,
}

/// File name a logo for this channel is expected under.
pub fn logo_filename(number: &str, code: &str) -> String {
    format!("{number}_{code}.png")
}

impl LogoLookup {
    /// Look up a logo file for every entry that has one in `dir`.
    pub fn from_dir(dir: &Path, entries: &[ChannelEntry]) -> Self {
        if !dir.is_dir() {
            log::warn!("logo directory '{}' does not exist; drawing without logos", dir.display());
            return Self::default();
        }
        let mut lookup = Self::default();
        for entry in entries {
            let path = dir.join(logo_filename(&entry.number, &entry.code));
            if path.is_file() {
                lookup.insert(&entry.number, &entry.code, path);
            }
        }
        log::info!(
            "found {} of {} channel logos in '{}'",
            lookup.len(),
            entries.len(),
            dir.display()
        );
        lookup
    }

    pub fn insert(&mut self, number: &str, code: &str, path: PathBuf) {
        self.paths.insert((number.to_string(), code.to_string()), path);
    }

    pub fn get(&self, number: &str, code: &str) -> Option<&Path> {
        self.paths
            .get(&(number.to_string(), code.to_string()))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_only_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("200_CNN.png"), b"not really a png").unwrap();
        let entries = vec![
            ChannelEntry::new("200", "CNN", "News"),
            ChannelEntry::new("201", "HLN", "News"),
        ];
        let lookup = LogoLookup::from_dir(dir.path(), &entries);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.get("200", "CNN"), Some(dir.path().join("200_CNN.png").as_path()));
        assert_eq!(lookup.get("201", "HLN"), None);
    }

    #[test]
    fn missing_directory_gives_empty_lookup() {
        let lookup = LogoLookup::from_dir(Path::new("/definitely/not/here"), &[]);
        assert!(lookup.is_empty());
    }
}
