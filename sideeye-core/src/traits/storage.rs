//! Hierarchical file storage capability

use alloc::vec::Vec;
use core::fmt::Debug;

use sideeye_protocol::FileEntry;

/// How a file is opened for writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// Create or truncate
    Truncate,
    /// Create if missing, keep existing contents
    Append,
}

/// File storage collaborator (SD card or similar)
///
/// Paths are absolute and `/`-separated.
pub trait FileStorage {
    type Error: Debug;

    /// Check whether a file or directory exists at `path`
    fn exists(&mut self, path: &str) -> bool;

    /// Create one directory; the parent must exist
    fn create_dir(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Remove the file at `path`
    fn remove_file(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Open `path` in `mode`, seek to `offset`, and write `data`
    ///
    /// Returns the number of bytes written.
    fn write_at(
        &mut self,
        path: &str,
        mode: WriteMode,
        offset: u64,
        data: &[u8],
    ) -> Result<usize, Self::Error>;

    /// List the entries of the directory at `path`
    fn list_dir(&mut self, path: &str) -> Result<Vec<FileEntry>, Self::Error>;
}
