//! Bounded file content reading
//!
//! File content lives in whole sectors, so the last sector of an extent
//! usually carries padding past the declared length. [`FileReader`] maps
//! a logical cursor onto the extent chain and never returns a byte
//! beyond the declared total.

use crate::error::{IsoError, Result};
use crate::file::extent::ExtentChain;
use crate::types::IsoLayout;
use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Display;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Sequential reader over one file's extent chain.
///
/// Borrows the device handle exclusively, so only one reader can be
/// active per handle at a time; drop it (fully read or not) to get the
/// handle back.
pub struct FileReader<'a, B: BlockIo> {
    block_io: &'a mut B,
    extents: ExtentChain,
    base_lba: u64,
    block_size: usize,
    position: u64,
    sector: Box<[u8]>,
    sector_lba: Option<u64>,
}

impl<'a, B: BlockIo> FileReader<'a, B> {
    /// Create a reader over `extents`, addressed relative to the image's
    /// start sector.
    pub fn new(block_io: &'a mut B, extents: ExtentChain, base_lba: u64, layout: IsoLayout) -> Self {
        Self {
            block_io,
            extents,
            base_lba,
            block_size: layout.block_size,
            position: 0,
            sector: vec![0u8; layout.block_size].into_boxed_slice(),
            sector_lba: None,
        }
    }

    /// Declared content length in bytes
    pub fn len(&self) -> u64 {
        self.extents.total_len()
    }

    /// Whether the file has no content
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current read position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read into `buf` from the current position.
    ///
    /// Returns the number of bytes read; 0 only at end of content. Short
    /// counts happen at extent and sector boundaries, so callers loop.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize>
    where
        B::Error: Display,
    {
        let total = self.extents.total_len();
        let mut written = 0;

        while written < buf.len() && self.position < total {
            let Some((extent, offset_in_extent)) = self.extents.locate(self.position) else {
                break;
            };

            let sector_index = offset_in_extent as usize / self.block_size;
            let offset_in_sector = offset_in_extent as usize % self.block_size;
            let lba = self.base_lba + extent.lba as u64 + sector_index as u64;

            if self.sector_lba != Some(lba) {
                self.block_io
                    .read_blocks(Lba(lba), &mut self.sector)
                    .map_err(IsoError::corrupted)?;
                self.sector_lba = Some(lba);
            }

            let extent_remaining = (extent.len - offset_in_extent) as usize;
            let sector_remaining = self.block_size - offset_in_sector;
            let n = (buf.len() - written)
                .min(extent_remaining)
                .min(sector_remaining);

            buf[written..written + n]
                .copy_from_slice(&self.sector[offset_in_sector..offset_in_sector + n]);
            written += n;
            self.position += n as u64;
        }

        Ok(written)
    }

    /// Read exactly `buf.len()` bytes; `ReadFailed` if the content ends
    /// first.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>
    where
        B::Error: Display,
    {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(IsoError::ReadFailed);
            }
            filled += n;
        }
        Ok(())
    }
}
