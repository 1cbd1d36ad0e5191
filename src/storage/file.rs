//! Directory-backed storage: one `<key>.json` file per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Storage;
use crate::error::{Error, Result};

/// Stores each key as a JSON file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs_err::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(e, path)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs_err::create_dir_all(&self.dir).map_err(|e| Error::io(e, self.dir.clone()))?;

        // Write beside the target then rename, so readers never see a torn file
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs_err::write(&tmp, value).map_err(|e| Error::io(e, tmp.clone()))?;
        fs_err::rename(&tmp, &path).map_err(|e| Error::io(e, path.clone()))?;

        tracing::debug!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs_err::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(e, path)),
        }
    }
}

/// Map a storage key to a safe file stem.
///
/// Keys embed email addresses (`church-otp-<email>`), so anything outside a
/// conservative set is replaced with `_`.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '@' | '+' => c,
            _ => '_',
        })
        .collect()
}
