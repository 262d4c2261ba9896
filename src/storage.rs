//! Storage trait seam and error classification for the cycle log.
//!
//! The cycle mounts the filesystem, appends one log line and unmounts
//! again every period, so the storage interface is deliberately narrow:
//! mount/unmount, a root listing, an append and a diagnostic read-back.
//! Block-device drivers and the FAT implementation live in platform code.

use crate::hal::Console;
use core::fmt;
use core::fmt::Write;

/// Classified storage error kinds.
///
/// Mirrors the `Error::kind()` convention of the `embedded-hal` error
/// traits: implementations keep their own rich error type and map it onto
/// these kinds so the cycle can tell the two expected, recoverable
/// conditions apart from everything else.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Mount requested while the filesystem is already mounted
    AlreadyMounted,

    /// Operation requires a mounted filesystem but none is mounted
    NotMounted,

    /// Block device or filesystem I/O fault
    Io,

    /// Anything the implementation cannot classify further
    Other,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageErrorKind::AlreadyMounted => write!(f, "already mounted"),
            StorageErrorKind::NotMounted => write!(f, "not mounted"),
            StorageErrorKind::Io => write!(f, "I/O fault"),
            StorageErrorKind::Other => write!(f, "unclassified fault"),
        }
    }
}

/// Storage error trait.
///
/// Implemented by the platform's storage error type so the cycle can
/// classify failures without knowing the concrete type.
pub trait StorageError: fmt::Debug {
    /// Classify this error.
    fn kind(&self) -> StorageErrorKind;
}

/// Mountable filesystem on a block device.
///
/// The mount point and log path are fixed by [`crate::config::CycleConfig`];
/// implementations bind the mount point at construction and resolve the
/// paths they are given against it.
pub trait Storage {
    /// Platform-specific error type
    type Error: StorageError;

    /// Mount the filesystem.
    fn mount(&mut self) -> Result<(), Self::Error>;

    /// Unmount the filesystem. After this returns the card is safe to remove.
    fn unmount(&mut self) -> Result<(), Self::Error>;

    /// Total capacity of the underlying block device in 512-byte blocks.
    ///
    /// Readable without a mounted filesystem; used for the bring-up
    /// diagnostic only.
    fn capacity_blocks(&mut self) -> Result<u32, Self::Error>;

    /// Visit the name of every entry in the root directory.
    fn list_root(&mut self, visit: &mut dyn FnMut(&str)) -> Result<(), Self::Error>;

    /// Append bytes to the file at `path`, creating it if absent.
    /// Returns the number of bytes written.
    fn append(&mut self, path: &str, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read the file at `path` from start to end, discarding the contents.
    /// Returns the total number of bytes read. Diagnostic use only.
    fn read_total(&mut self, path: &str) -> Result<usize, Self::Error>;
}

/// Print the block device capacity to the console, in whole megabytes.
///
/// Bring-up diagnostic: confirms the card answers before the first cycle
/// ever mounts it.
pub fn announce_capacity<S, W>(storage: &mut S, console: &mut W) -> Result<(), S::Error>
where
    S: Storage,
    W: Console,
{
    let blocks = storage.capacity_blocks()?;
    let mut line: heapless::String<48> = heapless::String::new();
    let _ = write!(line, "storage size: {} MB", blocks / 2048);
    console.write_line(&line);
    Ok(())
}
