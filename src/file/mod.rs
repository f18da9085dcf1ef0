//! File reading and extent management

pub mod extent;
pub mod reader;

pub use extent::{Extent, ExtentChain};
pub use reader::FileReader;

use crate::error::{IsoError, Result};
use crate::types::{FileEntry, Volume};
use alloc::vec::Vec;
use core::fmt::Display;
use gpt_disk_io::BlockIo;

/// Read a file's entire content into `buffer`.
///
/// The buffer must hold at least `entry.size` bytes; exactly that many
/// are copied regardless of sector padding on disk. `ReadFailed` for
/// directories or a too-small buffer.
///
/// # Returns
/// Number of bytes read
pub fn read_file<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    entry: &FileEntry,
    buffer: &mut [u8],
) -> Result<usize>
where
    B::Error: Display,
{
    let size = entry.size as usize;
    if buffer.len() < size {
        return Err(IsoError::ReadFailed);
    }

    let Some(mut reader) = entry.open(block_io, volume) else {
        return Err(IsoError::ReadFailed);
    };
    reader.read_exact(&mut buffer[..size])?;

    Ok(size)
}

/// Read a file's entire content into a new `Vec`
pub fn read_file_vec<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    entry: &FileEntry,
) -> Result<Vec<u8>>
where
    B::Error: Display,
{
    let mut buffer = alloc::vec![0u8; entry.size as usize];
    read_file(block_io, volume, entry, &mut buffer)?;
    Ok(buffer)
}
