//! Sector-buffered reading of directory extents
//!
//! Directory records are packed into sector-aligned extents, never cross
//! a sector boundary, and pad the tail of each sector with zero bytes.
//! [`ExtentCursor`] tracks a decode position inside one such extent and
//! feeds records out one at a time; it is the single decode path shared
//! by single-directory iteration and the full tree walk.

use crate::directory::record::{DirectoryRecord, FileId};
use crate::error::{IsoError, Result};
use crate::file::extent::{Extent, ExtentChain};
use crate::types::{EntryKind, FileEntry, IsoLayout};
use crate::utils::string;
use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Display;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Decode position inside one directory extent.
///
/// The block device is passed into each call rather than borrowed at
/// construction so several cursors can share one device handle.
pub(crate) struct ExtentCursor {
    extent: Extent,
    base_lba: u64,
    block_size: usize,
    offset: usize,
    sector: Box<[u8]>,
    sector_lba: Option<u64>,
}

impl ExtentCursor {
    pub(crate) fn new(extent: Extent, base_lba: u64, layout: IsoLayout) -> Self {
        Self {
            extent,
            base_lba,
            block_size: layout.block_size,
            offset: 0,
            sector: vec![0u8; layout.block_size].into_boxed_slice(),
            sector_lba: None,
        }
    }

    /// Decode the next record, skipping zero padding at sector tails.
    /// `Ok(None)` once the extent is exhausted.
    pub(crate) fn next_record<B: BlockIo>(
        &mut self,
        block_io: &mut B,
    ) -> Result<Option<DirectoryRecord>>
    where
        B::Error: Display,
    {
        loop {
            if self.offset >= self.extent.len as usize {
                return Ok(None);
            }

            let sector_index = self.offset / self.block_size;
            let lba = self.base_lba + self.extent.lba as u64 + sector_index as u64;
            let offset_in_sector = self.offset % self.block_size;

            if self.sector_lba != Some(lba) {
                block_io
                    .read_blocks(Lba(lba), &mut self.sector)
                    .map_err(IsoError::corrupted)?;
                self.sector_lba = Some(lba);
            }

            match DirectoryRecord::parse(&self.sector[offset_in_sector..])? {
                Some(record) => {
                    self.offset += record.length as usize;
                    return Ok(Some(record));
                }
                None => {
                    // Zero length byte: the rest of this sector is padding
                    self.offset = (sector_index + 1) * self.block_size;
                }
            }
        }
    }

    /// Decode the next entry: skips the self/parent pseudo-entries, fuses
    /// multi-extent continuation runs, and maps identifiers to names.
    /// The entry's `path` is just its name; callers qualify it.
    pub(crate) fn next_entry<B: BlockIo>(&mut self, block_io: &mut B) -> Result<Option<FileEntry>>
    where
        B::Error: Display,
    {
        loop {
            let Some(record) = self.next_record(block_io)? else {
                return Ok(None);
            };

            let name_bytes = match &record.file_id {
                FileId::Current | FileId::Parent => continue,
                FileId::Name(bytes) => bytes.clone(),
            };

            if record.is_directory() {
                let name = string::identifier_to_name(&name_bytes);
                return Ok(Some(FileEntry {
                    path: name.clone(),
                    name,
                    kind: EntryKind::Directory {
                        extent: record.extent(),
                    },
                    size: record.data_length as u64,
                    flags: record.flags,
                    recorded_at: record.recorded_at,
                }));
            }

            let recorded_at = record.recorded_at;
            let mut extents = ExtentChain::single(record.extent());
            let mut last = record;
            while last.flags.multi_extent {
                // Content continues in the next record of the same
                // identifier; a run that ends mid-extent is corrupt.
                let Some(next) = self.next_record(block_io)? else {
                    return Err(IsoError::MalformedRecord);
                };
                if next.file_id != last.file_id || next.is_directory() {
                    return Err(IsoError::MalformedRecord);
                }
                extents.push(next.extent());
                last = next;
            }

            let name = string::identifier_to_name(&name_bytes);
            let size = extents.total_len();
            return Ok(Some(FileEntry {
                path: name.clone(),
                name,
                kind: EntryKind::File { extents },
                size,
                flags: last.flags,
                recorded_at,
            }));
        }
    }
}
