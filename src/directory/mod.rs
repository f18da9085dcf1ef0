//! Directory record decoding and navigation

pub(crate) mod cursor;
pub mod iterator;
pub mod record;
pub mod walk;

pub use iterator::DirectoryIterator;
pub use record::{DirectoryRecord, FileId};
pub use walk::DirectoryWalk;

use crate::error::{IsoError, Result};
use crate::types::{EntryKind, FileEntry, Volume, MAX_DIRECTORY_DEPTH};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;
use gpt_disk_io::BlockIo;

/// Find a file or directory by path
///
/// Navigates the directory tree from the root to locate an entry. Path
/// components are matched case-insensitively and separated by `/`; an
/// empty path (or bare `/`) resolves to the root directory itself.
///
/// # Example
/// ```ignore
/// use isofs::{mount, find_file};
///
/// let volume = mount(&mut block_io, 0)?;
/// let file = find_file(&mut block_io, &volume, "/boot/vmlinuz")?;
/// println!("File size: {} bytes", file.size);
/// ```
pub fn find_file<B: BlockIo>(block_io: &mut B, volume: &Volume, path: &str) -> Result<FileEntry>
where
    B::Error: Display,
{
    let components: Vec<&str> = path
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();

    if components.len() > MAX_DIRECTORY_DEPTH {
        return Err(IsoError::PathTooLong);
    }

    if components.is_empty() {
        return Ok(root_entry(volume));
    }

    let mut current = volume.root_extent();
    for (depth, component) in components.iter().enumerate() {
        let is_last = depth == components.len() - 1;

        let mut found = None;
        for result in DirectoryIterator::new(&mut *block_io, volume, current) {
            let entry = result?;
            // ISO9660 level 1 names are uppercase; match caller paths
            // case-insensitively
            if entry.name.eq_ignore_ascii_case(component) {
                found = Some(entry);
                break;
            }
        }

        match found {
            Some(entry) if is_last => return Ok(entry),
            Some(entry) => match entry.kind {
                EntryKind::Directory { extent } => current = extent,
                EntryKind::File { .. } => return Err(IsoError::NotFound),
            },
            None => return Err(IsoError::NotFound),
        }
    }

    Err(IsoError::NotFound)
}

/// Synthetic entry for the root directory, which has no record of its
/// own outside the volume descriptor.
fn root_entry(volume: &Volume) -> FileEntry {
    let root = volume.root_extent();
    FileEntry {
        name: String::from("/"),
        path: String::from("/"),
        kind: EntryKind::Directory { extent: root },
        size: root.len as u64,
        flags: volume.pvd.root_record.flags,
        recorded_at: volume.pvd.root_record.recorded_at,
    }
}
