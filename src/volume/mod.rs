//! Volume descriptor scanning and mounting
//!
//! ISO9660 volume descriptors start at sector 16, one per sector, closed
//! by a set terminator. Only the Primary Volume Descriptor is decoded;
//! boot records, supplementary descriptors and anything unrecognized are
//! skipped over (their extensions are out of scope).

pub mod primary;

pub use primary::PrimaryVolumeDescriptor;

use crate::error::{IsoError, Result};
use crate::types::{IsoLayout, Volume, VolumeDescriptorType};
use alloc::vec;
use core::fmt::Display;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;
use log::{debug, trace};

/// Volume Descriptor header (first 7 bytes of each descriptor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDescriptorHeader {
    /// Type code (0=boot, 1=primary, 2=supplementary, 255=terminator)
    pub type_code: u8,

    /// Standard identifier "CD001"
    pub identifier: [u8; 5],

    /// Version (always 1)
    pub version: u8,
}

impl VolumeDescriptorHeader {
    /// CD001 magic bytes
    pub const MAGIC: &'static [u8; 5] = b"CD001";

    /// Read the header from the start of a sector
    pub fn from_sector(data: &[u8]) -> Self {
        Self {
            type_code: data[0],
            identifier: [data[1], data[2], data[3], data[4], data[5]],
            version: data[6],
        }
    }

    /// Check standard identifier and version
    pub fn is_valid(&self) -> bool {
        &self.identifier == Self::MAGIC && self.version == 1
    }

    /// Classify the sector; `None` when the header is not a recognizable
    /// descriptor (such sectors are skipped during scanning)
    pub fn classify(&self) -> Option<VolumeDescriptorType> {
        if !self.is_valid() {
            return None;
        }
        VolumeDescriptorType::from_byte(self.type_code)
    }
}

/// Locate and decode the Primary Volume Descriptor.
///
/// Reads one sector at a time starting at the layout's data area start.
/// A terminator before any primary descriptor is `PrimaryVolumeNotFound`;
/// every other descriptor type, and any sector that does not carry a
/// descriptor header, is skipped. Read failures (including running off
/// the end of the image) are `CorruptedImage`.
pub fn scan<B: BlockIo>(
    block_io: &mut B,
    start_lba: u64,
    layout: &IsoLayout,
) -> Result<PrimaryVolumeDescriptor>
where
    B::Error: Display,
{
    let mut buffer = vec![0u8; layout.block_size];

    let mut sector = layout.data_area_start;
    loop {
        let lba = Lba(start_lba + sector);
        block_io
            .read_blocks(lba, &mut buffer)
            .map_err(IsoError::corrupted)?;

        let header = VolumeDescriptorHeader::from_sector(&buffer);
        match header.classify() {
            Some(VolumeDescriptorType::Primary) => {
                trace!("primary volume descriptor at sector {sector}");
                return primary::parse(&buffer);
            }
            Some(VolumeDescriptorType::Terminator) => {
                return Err(IsoError::PrimaryVolumeNotFound);
            }
            other => {
                trace!("skipping descriptor {other:?} at sector {sector}");
            }
        }

        sector += 1;
    }
}

/// Mount an ISO9660 volume from a block device with the default layout.
///
/// # Arguments
/// * `block_io` - Block device containing the image
/// * `start_lba` - Sector the image starts at (0 for a raw image file)
pub fn mount<B: BlockIo>(block_io: &mut B, start_lba: u64) -> Result<Volume>
where
    B::Error: Display,
{
    mount_with(block_io, start_lba, IsoLayout::default())
}

/// Mount with an explicit layout.
///
/// Rejects images outside the supported subset: multi-volume sets and
/// logical block sizes other than the layout's.
pub fn mount_with<B: BlockIo>(block_io: &mut B, start_lba: u64, layout: IsoLayout) -> Result<Volume>
where
    B::Error: Display,
{
    let pvd = scan(block_io, start_lba, &layout)?;

    if pvd.logical_block_size as usize != layout.block_size {
        return Err(IsoError::UnsupportedExtension(
            "logical block sizes other than 2048 bytes",
        ));
    }
    if pvd.volume_set_size > 1 {
        return Err(IsoError::UnsupportedExtension("multi-volume sets"));
    }

    debug!(
        "mounted volume {:?}: {} blocks of {} bytes",
        pvd.volume_id(),
        pvd.volume_space_size,
        pvd.logical_block_size
    );

    Ok(Volume {
        pvd,
        start_lba,
        layout,
    })
}
