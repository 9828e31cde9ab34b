//! Chunk decode and write

use alloc::vec::Vec;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{trace, warn};

use crate::traits::{FileStorage, WriteMode};

/// Errors that can occur while applying one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Payload is not valid base64
    Decode,
    /// Decode buffer could not be allocated
    OutOfMemory,
    /// An intermediate directory could not be created
    CreateDir,
    /// The previous file at the path could not be removed
    Remove,
    /// Storage rejected the write
    Write,
    /// Storage accepted fewer bytes than were decoded
    ShortWrite { written: usize, expected: usize },
}

/// Decode buffer size for a base64 payload of `encoded_len` bytes
pub fn decoded_capacity(encoded_len: usize) -> usize {
    (encoded_len * 3).div_ceil(4) + 1
}

/// Apply one chunk, reporting success as a flag
///
/// Failures are logged and leave the sync status to the caller.
pub fn handle<S: FileStorage>(storage: &mut S, path: &str, offset: u64, payload: &str) -> bool {
    match try_handle(storage, path, offset, payload) {
        Ok(written) => {
            trace!("chunk {}@{}: {} bytes", path, offset, written);
            true
        }
        Err(err) => {
            warn!("chunk {}@{} failed: {:?}", path, offset, err);
            false
        }
    }
}

/// Decode `payload` and write it at `offset` of `path`
///
/// Offset 0 creates any missing parent directories and replaces an existing
/// file; any other offset appends. Nothing touches storage unless the
/// payload decodes. Returns the number of bytes written.
pub fn try_handle<S: FileStorage>(
    storage: &mut S,
    path: &str,
    offset: u64,
    payload: &str,
) -> Result<usize, SyncError> {
    let data = decode(payload)?;

    let mode = if offset == 0 {
        ensure_parent_dirs(storage, path)?;
        if storage.exists(path) {
            storage.remove_file(path).map_err(|err| {
                warn!("remove {} failed: {:?}", path, err);
                SyncError::Remove
            })?;
        }
        WriteMode::Truncate
    } else {
        WriteMode::Append
    };

    let written = storage
        .write_at(path, mode, offset, &data)
        .map_err(|err| {
            warn!("write {} failed: {:?}", path, err);
            SyncError::Write
        })?;

    if written != data.len() {
        return Err(SyncError::ShortWrite {
            written,
            expected: data.len(),
        });
    }
    Ok(written)
}

fn decode(payload: &str) -> Result<Vec<u8>, SyncError> {
    let capacity = decoded_capacity(payload.len());
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| SyncError::OutOfMemory)?;
    buf.resize(capacity, 0);

    let len = STANDARD
        .decode_slice(payload.as_bytes(), &mut buf)
        .map_err(|_| SyncError::Decode)?;
    buf.truncate(len);
    Ok(buf)
}

/// Create every missing directory between the root and the file name
fn ensure_parent_dirs<S: FileStorage>(storage: &mut S, path: &str) -> Result<(), SyncError> {
    let Some((parent, _)) = path.rsplit_once('/') else {
        return Ok(());
    };

    for (i, _) in parent.match_indices('/').filter(|(i, _)| *i > 0) {
        create_if_missing(storage, &parent[..i])?;
    }
    if !parent.is_empty() {
        create_if_missing(storage, parent)?;
    }
    Ok(())
}

fn create_if_missing<S: FileStorage>(storage: &mut S, dir: &str) -> Result<(), SyncError> {
    if dir.is_empty() || storage.exists(dir) {
        return Ok(());
    }
    storage.create_dir(dir).map_err(|err| {
        warn!("mkdir {} failed: {:?}", dir, err);
        SyncError::CreateDir
    })
}
