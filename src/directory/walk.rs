//! Depth-first directory tree traversal
//!
//! [`DirectoryWalk`] yields every entry of the volume as a lazy sequence:
//! within one directory, entries come in the physical order their records
//! appear; subdirectories are visited depth-first, first-encountered
//! first. Directory entries are emitted before their children so an
//! extractor can create each directory before writing into it.
//!
//! Recursion is replaced by an explicit stack of pending directories, so
//! memory is bounded by the current path depth rather than the tree size.

use crate::directory::cursor::ExtentCursor;
use crate::error::{IsoError, Result};
use crate::file::extent::Extent;
use crate::file::reader::FileReader;
use crate::types::{EntryKind, FileEntry, IsoLayout, Volume, MAX_DIRECTORY_DEPTH};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;
use gpt_disk_io::BlockIo;
use log::trace;

/// A directory discovered but not yet visited: its record extent and the
/// logical path prefix its children inherit.
struct PendingDirectory {
    extent: Extent,
    path: String,
}

/// The directory currently being decoded. Subdirectories found in it are
/// buffered until the extent closes so they can be queued in physical
/// order.
struct OpenDirectory {
    cursor: ExtentCursor,
    path: String,
    children: Vec<PendingDirectory>,
}

/// Lazy depth-first walk over the whole directory tree.
///
/// Holds the device handle exclusively for its lifetime; use
/// [`DirectoryWalk::open_file`] between iteration steps to read the
/// content of an emitted file. A decode error ends the walk: the sequence
/// yields the error once and nothing after it, since a misaligned record
/// would turn every later read into garbage.
pub struct DirectoryWalk<'a, B: BlockIo> {
    block_io: &'a mut B,
    base_lba: u64,
    layout: IsoLayout,
    pending: Vec<PendingDirectory>,
    current: Option<OpenDirectory>,
    finished: bool,
}

impl<'a, B: BlockIo> DirectoryWalk<'a, B> {
    /// Start a walk at the volume's root directory.
    pub fn new(block_io: &'a mut B, volume: &Volume) -> Self {
        let root = PendingDirectory {
            extent: volume.root_extent(),
            path: String::new(),
        };
        Self {
            block_io,
            base_lba: volume.start_lba,
            layout: volume.layout,
            pending: alloc::vec![root],
            current: None,
            finished: false,
        }
    }

    /// Open a bounded reader over an emitted file entry, reusing the
    /// walk's device handle. `None` for directories.
    pub fn open_file<'s>(&'s mut self, entry: &FileEntry) -> Option<FileReader<'s, B>> {
        match &entry.kind {
            EntryKind::File { extents } => Some(FileReader::new(
                self.block_io,
                extents.clone(),
                self.base_lba,
                self.layout,
            )),
            EntryKind::Directory { .. } => None,
        }
    }

    fn advance(&mut self) -> Result<Option<FileEntry>>
    where
        B::Error: Display,
    {
        loop {
            if self.current.is_none() {
                let Some(next) = self.pending.pop() else {
                    return Ok(None);
                };
                trace!("descending into directory {:?}", next.path);
                self.current = Some(OpenDirectory {
                    cursor: ExtentCursor::new(next.extent, self.base_lba, self.layout),
                    path: next.path,
                    children: Vec::new(),
                });
            }

            let step = match self.current.as_mut() {
                Some(dir) => dir.cursor.next_entry(self.block_io)?,
                None => continue,
            };

            let Some(mut entry) = step else {
                // Extent exhausted. Queue its subdirectories so the first
                // one encountered is popped first.
                if let Some(closed) = self.current.take() {
                    for child in closed.children.into_iter().rev() {
                        self.pending.push(child);
                    }
                }
                continue;
            };

            if let Some(dir) = self.current.as_mut() {
                if !dir.path.is_empty() {
                    entry.path = format!("{}/{}", dir.path, entry.name);
                }
                if let EntryKind::Directory { extent } = &entry.kind {
                    let depth = entry.path.split('/').count();
                    if depth > MAX_DIRECTORY_DEPTH {
                        return Err(IsoError::PathTooLong);
                    }
                    dir.children.push(PendingDirectory {
                        extent: *extent,
                        path: entry.path.clone(),
                    });
                }
            }
            return Ok(Some(entry));
        }
    }
}

impl<'a, B: BlockIo> Iterator for DirectoryWalk<'a, B>
where
    B::Error: Display,
{
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
