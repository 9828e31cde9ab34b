//! In-memory collaborator doubles
//!
//! Compiled for this crate's tests and, behind the `mock` feature, for the
//! tests of downstream crates.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use sideeye_protocol::FileEntry;

use crate::interaction::{Page, Refresh, Rotation};
use crate::telemetry::{AlertLevel, TelemetrySnapshot};
use crate::traits::{Display, FileStorage, Network, WriteMode};

/// Errors reported by [`MemStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    NotFound,
    NotADirectory,
    /// Parent directory of the target does not exist
    ParentMissing,
    /// Write failure injected by the test
    Injected,
}

/// Hierarchical storage held in memory
#[derive(Debug, Clone)]
pub struct MemStorage {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    /// Fail every write with [`MemError::Injected`]
    pub fail_writes: bool,
    /// Accept at most this many bytes per write
    pub short_write_limit: Option<usize>,
    mutations: usize,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    /// Empty storage with only the root directory
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(String::from("/"));
        Self {
            files: BTreeMap::new(),
            dirs,
            fail_writes: false,
            short_write_limit: None,
            mutations: 0,
        }
    }

    /// Contents of the file at `path`
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.dirs.contains(path)
    }

    /// Place a file without going through the trait (parents are not checked)
    pub fn insert_file(&mut self, path: &str, contents: &[u8]) {
        self.files.insert(path.to_string(), contents.to_vec());
    }

    /// Number of successful create/remove/write calls
    pub fn mutations(&self) -> usize {
        self.mutations
    }
}

fn parent(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((dir, _)) => dir,
    }
}

fn name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

impl FileStorage for MemStorage {
    type Error = MemError;

    fn exists(&mut self, path: &str) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }

    fn create_dir(&mut self, path: &str) -> Result<(), MemError> {
        if !self.dirs.contains(parent(path)) {
            return Err(MemError::ParentMissing);
        }
        self.dirs.insert(path.to_string());
        self.mutations += 1;
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<(), MemError> {
        self.files.remove(path).ok_or(MemError::NotFound)?;
        self.mutations += 1;
        Ok(())
    }

    fn write_at(
        &mut self,
        path: &str,
        mode: WriteMode,
        offset: u64,
        data: &[u8],
    ) -> Result<usize, MemError> {
        if self.fail_writes {
            return Err(MemError::Injected);
        }
        if !self.dirs.contains(parent(path)) {
            return Err(MemError::ParentMissing);
        }

        let file = self.files.entry(path.to_string()).or_default();
        if mode == WriteMode::Truncate {
            file.clear();
        }

        let accepted = self
            .short_write_limit
            .map_or(data.len(), |limit| limit.min(data.len()));
        let start = offset as usize;
        let end = start + accepted;
        if file.len() < end {
            file.resize(end, 0);
        }
        file[start..end].copy_from_slice(&data[..accepted]);

        self.mutations += 1;
        Ok(accepted)
    }

    fn list_dir(&mut self, path: &str) -> Result<Vec<FileEntry>, MemError> {
        if !self.dirs.contains(path) {
            return Err(if self.files.contains_key(path) {
                MemError::NotADirectory
            } else {
                MemError::NotFound
            });
        }

        let dirs = self
            .dirs
            .iter()
            .filter(|dir| dir.as_str() != "/" && parent(dir) == path)
            .map(|dir| FileEntry {
                name: name(dir).to_string(),
                size: 0,
                is_dir: true,
            });
        let files = self
            .files
            .iter()
            .filter(|(file, _)| parent(file) == path)
            .map(|(file, contents)| FileEntry {
                name: name(file).to_string(),
                size: contents.len() as u64,
                is_dir: false,
            });

        Ok(dirs.chain(files).collect())
    }
}

/// One call received by [`RecordingDisplay`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayCall {
    Backlight(bool),
    Brightness(u8),
    Rotation(Rotation),
    Render { page: Page, refresh: Refresh },
    Countdown { seconds: u8, full_redraw: bool },
    Banner { level: AlertLevel, visible: bool },
}

/// Display double that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded calls
    pub fn take(&mut self) -> Vec<DisplayCall> {
        core::mem::take(&mut self.calls)
    }

    /// Recorded render calls, in order
    pub fn renders(&self) -> Vec<(Page, Refresh)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Render { page, refresh } => Some((*page, *refresh)),
                _ => None,
            })
            .collect()
    }

    /// Countdown values drawn, in order
    pub fn countdowns(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Countdown { seconds, .. } => Some(*seconds),
                _ => None,
            })
            .collect()
    }

    /// Last backlight state set, if any
    pub fn backlight(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            DisplayCall::Backlight(on) => Some(*on),
            _ => None,
        })
    }
}

impl Display for RecordingDisplay {
    fn set_backlight(&mut self, on: bool) {
        self.calls.push(DisplayCall::Backlight(on));
    }

    fn set_brightness(&mut self, level: u8) {
        self.calls.push(DisplayCall::Brightness(level));
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.calls.push(DisplayCall::Rotation(rotation));
    }

    fn render(&mut self, page: Page, _snapshot: &TelemetrySnapshot, refresh: Refresh) {
        self.calls.push(DisplayCall::Render { page, refresh });
    }

    fn show_reset_countdown(&mut self, seconds: u8, full_redraw: bool) {
        self.calls.push(DisplayCall::Countdown {
            seconds,
            full_redraw,
        });
    }

    fn show_alert_banner(&mut self, level: AlertLevel, visible: bool) {
        self.calls.push(DisplayCall::Banner { level, visible });
    }
}

/// Network double that counts publishes
#[derive(Debug, Clone, Default)]
pub struct RecordingNetwork {
    pub published: usize,
    /// Connected flag of the most recently published snapshot
    pub last_connected: Option<bool>,
    pub serviced: usize,
    pub credentials_forgotten: bool,
}

impl RecordingNetwork {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Network for RecordingNetwork {
    fn publish(&mut self, snapshot: &TelemetrySnapshot) {
        self.published += 1;
        self.last_connected = Some(snapshot.is_connected());
    }

    fn service(&mut self, _now_ms: u32) {
        self.serviced += 1;
    }

    fn forget_credentials(&mut self) {
        self.credentials_forgotten = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_and_name() {
        assert_eq!(parent("/a"), "/");
        assert_eq!(parent("/a/b/c.txt"), "/a/b");
        assert_eq!(name("/a/b/c.txt"), "c.txt");
    }

    #[test]
    fn test_write_requires_parent() {
        let mut storage = MemStorage::new();
        assert_eq!(
            storage.write_at("/a/b.txt", WriteMode::Truncate, 0, b"x"),
            Err(MemError::ParentMissing)
        );
        storage.create_dir("/a").unwrap();
        assert_eq!(storage.write_at("/a/b.txt", WriteMode::Truncate, 0, b"x"), Ok(1));
        assert_eq!(storage.file("/a/b.txt"), Some(&b"x"[..]));
    }

    #[test]
    fn test_list_dir() {
        let mut storage = MemStorage::new();
        storage.create_dir("/docs").unwrap();
        storage.write_at("/readme.md", WriteMode::Truncate, 0, b"hi").unwrap();
        storage.write_at("/docs/a.txt", WriteMode::Truncate, 0, b"abc").unwrap();

        let root = storage.list_dir("/").unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root[0].name, "docs");
        assert!(root[0].is_dir);
        assert_eq!(root[1].name, "readme.md");
        assert_eq!(root[1].size, 2);

        assert_eq!(storage.list_dir("/missing"), Err(MemError::NotFound));
        assert_eq!(storage.list_dir("/readme.md"), Err(MemError::NotADirectory));
    }
}
