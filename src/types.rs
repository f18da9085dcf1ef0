//! Common types and constants for ISO9660

use crate::file::extent::{Extent, ExtentChain};
use crate::file::reader::FileReader;
use crate::utils::datetime::DateTime7;
use crate::volume::primary::PrimaryVolumeDescriptor;
use alloc::string::String;
use gpt_disk_io::BlockIo;

/// ISO9660 sector size (always 2048 bytes)
pub const SECTOR_SIZE: usize = 2048;

/// Volume descriptor set starts at sector 16
pub const VOLUME_DESCRIPTOR_START: u64 = 16;

/// Maximum directory depth (ECMA-119 6.8.2.1)
pub const MAX_DIRECTORY_DEPTH: usize = 8;

/// Permission bits reported for directories (read-only media)
pub const DIRECTORY_MODE: u16 = 0o555;

/// Permission bits reported for regular files (read-only media)
pub const FILE_MODE: u16 = 0o444;

/// Image layout parameters.
///
/// The defaults are the only values ECMA-119 images use in practice, but
/// the scanner and decoders take the layout explicitly so the assumptions
/// are visible and overridable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoLayout {
    /// Logical block size in bytes
    pub block_size: usize,

    /// First sector of the data area (where volume descriptors begin)
    pub data_area_start: u64,
}

impl Default for IsoLayout {
    fn default() -> Self {
        Self {
            block_size: SECTOR_SIZE,
            data_area_start: VOLUME_DESCRIPTOR_START,
        }
    }
}

/// Volume descriptor type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VolumeDescriptorType {
    /// Boot Record (El Torito)
    BootRecord = 0,
    /// Primary Volume Descriptor
    Primary = 1,
    /// Supplementary Volume Descriptor (Joliet)
    Supplementary = 2,
    /// Volume Partition Descriptor
    Partition = 3,
    /// Volume Descriptor Set Terminator
    Terminator = 255,
}

impl VolumeDescriptorType {
    /// Classify a descriptor type byte; `None` for unassigned codes.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::BootRecord),
            1 => Some(Self::Primary),
            2 => Some(Self::Supplementary),
            3 => Some(Self::Partition),
            255 => Some(Self::Terminator),
            _ => None,
        }
    }
}

/// File flags from directory record (ECMA-119 9.1.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFlags {
    /// Hidden file
    pub hidden: bool,

    /// Directory (not a file)
    pub directory: bool,

    /// Associated file
    pub associated: bool,

    /// Record format described in the extended attribute record
    pub record_format: bool,

    /// Owner/group permissions recorded in the extended attribute record
    pub protection: bool,

    /// Not the final record for this file; content continues in the next
    /// record carrying the same identifier
    pub multi_extent: bool,
}

impl FileFlags {
    /// Decode the flags byte.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            hidden: bits & 0x01 != 0,
            directory: bits & 0x02 != 0,
            associated: bits & 0x04 != 0,
            record_format: bits & 0x08 != 0,
            protection: bits & 0x10 != 0,
            multi_extent: bits & 0x80 != 0,
        }
    }

    /// Re-encode the flags byte.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.hidden {
            bits |= 0x01;
        }
        if self.directory {
            bits |= 0x02;
        }
        if self.associated {
            bits |= 0x04;
        }
        if self.record_format {
            bits |= 0x08;
        }
        if self.protection {
            bits |= 0x10;
        }
        if self.multi_extent {
            bits |= 0x80;
        }
        bits
    }
}

/// Where an entry's content lives.
///
/// Only regular files carry extents that can be opened for reading, so
/// callers branch on the variant instead of downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory; the extent holds its directory records
    Directory {
        /// Location and length of the directory's record extent
        extent: Extent,
    },
    /// A regular file; multi-extent files carry every extent of the run
    File {
        /// Content extents in record order
        extents: ExtentChain,
    },
}

/// One entry produced by directory iteration or the tree walk.
///
/// `path` is the logical on-image path relative to the root directory
/// (`NAME`, `DIR/NAME`, ...); for single-directory iteration it equals
/// `name`. Never contains `.` or `..` components.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Entry name with any `;1` version suffix stripped
    pub name: String,

    /// Logical path relative to the root directory
    pub path: String,

    /// Directory or file content capability
    pub kind: EntryKind,

    /// Content size in bytes (sum of all extents for multi-extent files)
    pub size: u64,

    /// Flags from the directory record
    pub flags: FileFlags,

    /// Recording date and time from the directory record
    pub recorded_at: DateTime7,
}

impl FileEntry {
    /// Is this a regular file?
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File { .. })
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    /// Is this hidden?
    pub fn is_hidden(&self) -> bool {
        self.flags.hidden
    }

    /// Permission bits for extraction. The base format records no UNIX
    /// mode, so these are fixed read-only defaults.
    pub fn mode(&self) -> u16 {
        if self.is_directory() {
            DIRECTORY_MODE
        } else {
            FILE_MODE
        }
    }

    /// File extension, if any
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Open a bounded reader over this entry's content.
    ///
    /// Returns `None` for directories, which have no content to read.
    pub fn open<'a, B: BlockIo>(
        &self,
        block_io: &'a mut B,
        volume: &Volume,
    ) -> Option<FileReader<'a, B>> {
        match &self.kind {
            EntryKind::File { extents } => Some(FileReader::new(
                block_io,
                extents.clone(),
                volume.start_lba,
                volume.layout,
            )),
            EntryKind::Directory { .. } => None,
        }
    }
}

/// A mounted volume: the decoded Primary Volume Descriptor plus the
/// layout it was decoded with.
///
/// Decoded exactly once per image and immutable afterwards; every
/// directory and file operation takes it by shared reference.
#[derive(Debug, Clone)]
pub struct Volume {
    /// The decoded Primary Volume Descriptor
    pub pvd: PrimaryVolumeDescriptor,

    /// Sector the image starts at on the underlying device (0 for raw
    /// image files)
    pub start_lba: u64,

    /// Layout the volume was mounted with
    pub layout: IsoLayout,
}

impl Volume {
    /// Volume identifier, trimmed of padding
    pub fn volume_id(&self) -> &str {
        self.pvd.volume_id()
    }

    /// Logical block size declared by the volume
    pub fn logical_block_size(&self) -> u16 {
        self.pvd.logical_block_size
    }

    /// Root directory extent
    pub fn root_extent(&self) -> Extent {
        self.pvd.root_record.extent()
    }
}
