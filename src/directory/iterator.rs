//! Directory iteration
//!
//! Lazy listing of a single directory extent, in the physical order the
//! records appear. Self ("." ) and parent ("..") pseudo-entries are never
//! yielded, and multi-extent continuation runs arrive fused as one entry.

use crate::directory::cursor::ExtentCursor;
use crate::error::Result;
use crate::file::extent::Extent;
use crate::types::{FileEntry, Volume};
use core::fmt::Display;
use gpt_disk_io::BlockIo;

/// Directory iterator
pub struct DirectoryIterator<'a, B: BlockIo> {
    block_io: &'a mut B,
    cursor: ExtentCursor,
}

impl<'a, B: BlockIo> DirectoryIterator<'a, B> {
    /// Iterate the directory stored in `extent`
    pub fn new(block_io: &'a mut B, volume: &Volume, extent: Extent) -> Self {
        Self {
            block_io,
            cursor: ExtentCursor::new(extent, volume.start_lba, volume.layout),
        }
    }
}

impl<'a, B: BlockIo> Iterator for DirectoryIterator<'a, B>
where
    B::Error: Display,
{
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_entry(self.block_io).transpose()
    }
}
