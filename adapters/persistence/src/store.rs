use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::{GameSnapshot, PersistenceError, Result};

/// File extension of save files.
pub const SAVE_EXTENSION: &str = "json";
/// Number of saves a store keeps unless configured otherwise.
pub const DEFAULT_MAX_SAVES: usize = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Directory of JSON save files.
///
/// Saves are identified by file name, extension included. New saves are named
/// after the local time they were written.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
    max_saves: usize,
}

impl SaveStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>, max_saves: usize) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_saves })
    }

    /// Maximum number of saves kept.
    #[must_use]
    pub const fn max_saves(&self) -> usize {
        self.max_saves
    }

    /// Save names sorted alphabetically, which is also chronological for
    /// timestamped names.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Reports whether another new save would be refused.
    pub fn is_full(&self) -> Result<bool> {
        Ok(self.list()?.len() >= self.max_saves)
    }

    /// Writes the snapshot under a name derived from the current local time.
    pub fn save_new(&self, snapshot: &GameSnapshot) -> Result<String> {
        self.save_new_at(snapshot, Local::now().naive_local())
    }

    /// Writes the snapshot under a name derived from `timestamp`.
    ///
    /// A numeric suffix is appended when a save with the same name exists.
    pub fn save_new_at(&self, snapshot: &GameSnapshot, timestamp: NaiveDateTime) -> Result<String> {
        if self.is_full()? {
            return Err(PersistenceError::SaveLimitReached {
                limit: self.max_saves,
            });
        }

        let stem = timestamp.format(TIMESTAMP_FORMAT).to_string();
        let mut name = format!("{stem}.{SAVE_EXTENSION}");
        let mut copy = 1;
        while self.dir.join(&name).exists() {
            copy += 1;
            name = format!("{stem} ({copy}).{SAVE_EXTENSION}");
        }

        self.write(&self.dir.join(&name), snapshot)?;
        info!(%name, "saved new game");
        Ok(name)
    }

    /// Overwrites, or creates, the named save.
    pub fn save_as(&self, name: &str, snapshot: &GameSnapshot) -> Result<()> {
        let path = self.path_for(name)?;
        self.write(&path, snapshot)?;
        info!(%name, "saved game");
        Ok(())
    }

    /// Reads the named save. The snapshot is not validated until it is turned
    /// into a game.
    pub fn load(&self, name: &str) -> Result<GameSnapshot> {
        let path = self.path_for(name)?;
        let json = fs::read_to_string(&path)?;
        let snapshot = GameSnapshot::from_json(&json)?;
        debug!(path = %path.display(), "loaded save");
        Ok(snapshot)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains("..");
        if invalid {
            return Err(PersistenceError::InvalidName(name.to_owned()));
        }

        let path = self.dir.join(name);
        if path.extension().and_then(|ext| ext.to_str()) == Some(SAVE_EXTENSION) {
            Ok(path)
        } else {
            Ok(self.dir.join(format!("{name}.{SAVE_EXTENSION}")))
        }
    }

    fn write(&self, path: &Path, snapshot: &GameSnapshot) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let json = snapshot.to_json()?;
        let written = fs::write(&temp_path, json).and_then(|()| fs::rename(&temp_path, path));
        if let Err(error) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(error.into());
        }
        debug!(path = %path.display(), "wrote save");
        Ok(())
    }
}
