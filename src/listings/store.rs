/// Persistent tier of the listing cache
use super::types::{ListingSnapshot, PairKey};
use crate::logger::{self, LogTag};
use crate::venues::Venue;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Byte store keyed by venue and pair key
///
/// Reads are validated and anything unreadable is a miss. Writes are
/// best-effort; callers log and ignore the error.
pub trait ListingStore: Send + Sync {
    /// Snapshot plus the time it was written
    fn load(&self, venue: Venue, key: &PairKey) -> Option<(ListingSnapshot, SystemTime)>;

    fn save(&self, venue: Venue, key: &PairKey, snapshot: &ListingSnapshot) -> Result<(), String>;

    /// Remove every stored snapshot, returning how many were removed
    fn clear(&self) -> Result<usize, String>;
}

/// One JSON array file per venue and pair
pub struct FileListingStore {
    directory: PathBuf,
}

impl FileListingStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, venue: Venue, key: &PairKey) -> PathBuf {
        self.directory
            .join(format!("{}_{}.json", venue.as_str(), key))
    }
}

impl ListingStore for FileListingStore {
    fn load(&self, venue: Venue, key: &PairKey) -> Option<(ListingSnapshot, SystemTime)> {
        let path = self.file_path(venue, key);
        let modified = std::fs::metadata(&path).ok()?.modified().ok()?;
        let contents = std::fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<ListingSnapshot>(&contents) {
            Ok(snapshot) => Some((snapshot, modified)),
            Err(e) => {
                logger::debug(
                    LogTag::Cache,
                    &format!("Ignoring unreadable listing file {}: {}", path.display(), e),
                );
                None
            }
        }
    }

    fn save(&self, venue: Venue, key: &PairKey, snapshot: &ListingSnapshot) -> Result<(), String> {
        std::fs::create_dir_all(&self.directory)
            .map_err(|e| format!("create {}: {}", self.directory.display(), e))?;

        let path = self.file_path(venue, key);
        let payload = serde_json::to_vec(snapshot).map_err(|e| e.to_string())?;

        // Readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, payload).map_err(|e| format!("write {}: {}", tmp.display(), e))?;
        std::fs::rename(&tmp, &path).map_err(|e| format!("rename {}: {}", path.display(), e))
    }

    fn clear(&self) -> Result<usize, String> {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.to_string()),
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                std::fs::remove_file(&path).map_err(|e| e.to_string())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
