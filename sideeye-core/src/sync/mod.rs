//! Resumable chunked file transfer
//!
//! Each `WriteChunk` command is handled on its own: there is no transfer
//! session on the device. The host supplies absolute offsets starting at
//! zero, and offset zero means "start a new file".

pub mod file_sync;

pub use file_sync::{decoded_capacity, handle, try_handle, SyncError};
