use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::catch::{CatchRecord, CatchRepository, NewCatch};
use crate::domain::DomainError;
use crate::infrastructure::fs::{read_json, write_json_atomic, JsonFileError};

/// Catch log stored as a JSON array, rewritten on every append
#[derive(Debug)]
pub struct FileCatchRepository {
    path: PathBuf,
    catches: Mutex<Vec<CatchRecord>>,
}

impl FileCatchRepository {
    /// Open the log at `path`.
    ///
    /// A missing file starts an empty log. An unparseable file is moved aside
    /// to `<path>.corrupt` and the log starts empty. A file that cannot be
    /// read is left in place and reported as an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        let catches = match read_json::<Vec<CatchRecord>>(&path) {
            Ok(Some(catches)) => number_legacy_entries(catches),
            Ok(None) => Vec::new(),
            Err(e @ JsonFileError::Io { .. }) => return Err(e.into()),
            Err(e @ JsonFileError::Parse { .. }) => {
                let backup = corrupt_path(&path);
                warn!(error = %e, backup = %backup.display(), "Catch log corrupt, starting empty");
                std::fs::rename(&path, &backup).map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to move corrupt catch log to {}: {}",
                        backup.display(),
                        e
                    ))
                })?;
                Vec::new()
            }
        };

        info!(path = %path.display(), count = catches.len(), "Catch log opened");

        Ok(Self {
            path,
            catches: Mutex::new(catches),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatchRepository for FileCatchRepository {
    async fn append(&self, entry: NewCatch) -> Result<CatchRecord, DomainError> {
        let mut catches = self.catches.lock().await;

        let id = catches.last().map(|c| c.id + 1).unwrap_or(1);
        let record = CatchRecord::from_new(id, entry, Utc::now());

        catches.push(record.clone());

        if let Err(e) = write_json_atomic(&self.path, &*catches) {
            catches.pop();
            return Err(e);
        }

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<CatchRecord>, DomainError> {
        Ok(self.catches.lock().await.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.catches.lock().await.len())
    }
}

/// Assign positional ids to entries stored without one
fn number_legacy_entries(mut catches: Vec<CatchRecord>) -> Vec<CatchRecord> {
    for (index, catch) in catches.iter_mut().enumerate() {
        if catch.id == 0 {
            catch.id = index as u64 + 1;
        }
    }
    catches
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_catch(species: &str) -> NewCatch {
        NewCatch {
            species: species.to_string(),
            bait: "Worm".to_string(),
            location: "Mill Pond".to_string(),
            date: "2024-06-01".to_string(),
            time: "06:45".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_append_and_list_in_order() {
        let dir = TempDir::new().unwrap();
        let repo = FileCatchRepository::open(dir.path().join("catches.json")).unwrap();

        repo.append(new_catch("Bass")).await.unwrap();
        let second = repo.append(new_catch("Trout")).await.unwrap();

        assert_eq!(second.id, 2);
        let catches = repo.list().await.unwrap();
        assert_eq!(catches.len(), 2);
        assert_eq!(catches[0].species, "Bass");
        assert_eq!(catches[1].species, "Trout");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catches.json");

        {
            let repo = FileCatchRepository::open(&path).unwrap();
            repo.append(new_catch("Perch")).await.unwrap();
        }

        let reopened = FileCatchRepository::open(&path).unwrap();
        let next = reopened.append(new_catch("Walleye")).await.unwrap();

        assert_eq!(next.id, 2);
        assert_eq!(reopened.list().await.unwrap()[0].species, "Perch");
    }

    #[tokio::test]
    async fn test_legacy_entries_are_numbered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catches.json");
        std::fs::write(
            &path,
            r#"[{"species":"Carp","bait":"Corn","location":"Canal","date":"2024-04-02","time":"09:00","notes":""},
               {"species":"Bream","bait":"Maggot","location":"Canal","date":"2024-04-02","time":"10:00","notes":""}]"#,
        )
        .unwrap();

        let repo = FileCatchRepository::open(&path).unwrap();
        let catches = repo.list().await.unwrap();

        assert_eq!(catches[0].id, 1);
        assert_eq!(catches[1].id, 2);
        assert_eq!(repo.append(new_catch("Tench")).await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_corrupt_log_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catches.json");
        std::fs::write(&path, "not json").unwrap();

        let repo = FileCatchRepository::open(&path).unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(dir.path().join("catches.json.corrupt").exists());
    }

    #[test]
    fn test_unreadable_log_is_left_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catches.json");
        std::fs::create_dir(&path).unwrap();

        let err = FileCatchRepository::open(&path).unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(path.is_dir());
        assert!(!dir.path().join("catches.json.corrupt").exists());
    }
}
