//! Item table persistence.
//!
//! The table is read whole into memory, patched by the post-load mods, and
//! written back with an atomic write+rename. Writers serialize on an exclusive
//! `fs2` lock over a `.<name>.lock` sidecar next to the target; the sidecar is
//! never renamed or removed, so every writer locks the same inode.

use super::errors::DatabaseError;
use super::types::{ItemTable, TemplateItem};
use fs2::FileExt;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default cap on the size of an item table file (64 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 64 * 1024 * 1024;

/// In-memory item template table handed to post-load mods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDatabase {
    items: ItemTable,
}

impl ItemDatabase {
    pub fn new(items: ItemTable) -> Self {
        Self { items }
    }

    /// Load an item table from a JSON file, refusing files over `max_bytes`.
    pub fn load<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let size = fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(DatabaseError::TooLarge {
                path: path.display().to_string(),
                size,
                limit: max_bytes,
            });
        }

        let contents = fs::read_to_string(path)?;
        let database = Self::from_json_str(&contents).map_err(|source| DatabaseError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded {} item templates from {}", database.len(), path.display());
        Ok(database)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        // Interrupted writes have been seen to leave leading NULs behind.
        let items: ItemTable = serde_json::from_str(contents.trim_start_matches('\0'))?;
        Ok(Self { items })
    }

    pub fn to_json_string(&self) -> Result<String, DatabaseError> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    /// Write the table to `path`, replacing any existing file atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DatabaseError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        write_json_atomic(path, &json)?;
        debug!("Wrote {} item templates to {}", self.len(), path.display());
        Ok(())
    }

    pub fn items(&self) -> &ItemTable {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut ItemTable {
        &mut self.items
    }

    pub fn get(&self, id: &str) -> Option<&TemplateItem> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> ItemTable {
        self.items
    }
}

/// Sidecar file writers lock while replacing `path`.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("items.json");
    path.with_file_name(format!(".{}.lock", base))
}

fn write_json_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path_for(path))?;
    lock_file.lock_exclusive()?;

    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("items.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break candidate;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    drop(lock_file);
    Ok(())
}
