//! Directory Record structure
//!
//! Directory records describe files and subdirectories. They are
//! variable-length: a 33-byte fixed body, the file identifier, a padding
//! byte when the identifier length is even, and an opaque system use
//! region where vendor extensions (Rock Ridge and friends) live.

use crate::error::{IsoError, Result};
use crate::file::extent::Extent;
use crate::types::FileFlags;
use crate::utils::datetime::DateTime7;
use crate::utils::endian::{le_u16, le_u32, write_both_u16, write_both_u32};
use alloc::vec::Vec;

/// Fixed region length, length byte included (BP 1-33)
const FIXED_LEN: usize = 33;

/// File identifier from a directory record (BP 34+)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileId {
    /// The directory itself (single 0x00 byte)
    Current,
    /// The parent directory (single 0x01 byte)
    Parent,
    /// A file or subdirectory name
    Name(Vec<u8>),
}

impl FileId {
    fn decode(bytes: &[u8]) -> Self {
        match bytes {
            [0x00] => Self::Current,
            [0x01] => Self::Parent,
            _ => Self::Name(bytes.to_vec()),
        }
    }

    /// The identifier's on-disk bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Current => &[0x00],
            Self::Parent => &[0x01],
            Self::Name(bytes) => bytes,
        }
    }

    /// Identifier length in bytes (BP 33)
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Identifiers are never empty in a valid record
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One decoded directory record (ECMA-119 9.1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// Length of directory record (BP 1)
    pub length: u8,

    /// Extended attribute record length in blocks (BP 2)
    pub extended_attr_length: u8,

    /// Extent location, trusted little-endian half (BP 3-10)
    pub extent_lba: u32,

    /// Data length in bytes, trusted little-endian half (BP 11-18)
    pub data_length: u32,

    /// Recording date and time (BP 19-25)
    pub recorded_at: DateTime7,

    /// File flags (BP 26)
    pub flags: FileFlags,

    /// File unit size (interleaved files) (BP 27)
    pub file_unit_size: u8,

    /// Interleave gap size (BP 28)
    pub interleave_gap: u8,

    /// Volume sequence number, trusted little-endian half (BP 29-32)
    pub volume_sequence: u16,

    /// File identifier (BP 34+)
    pub file_id: FileId,

    /// Length of the system use region. Its bytes are skipped, never
    /// interpreted.
    pub system_use_len: u8,
}

impl DirectoryRecord {
    /// Minimum record length: the fixed region plus one identifier byte
    pub const MIN_LENGTH: u8 = 34;

    /// Decode one record from a slice positioned at a candidate record
    /// start.
    ///
    /// A length byte of zero means "no further record at this position"
    /// (directory extents are sector-aligned and zero-padded) and is
    /// returned as `Ok(None)`, not an error. The slice must not extend
    /// past the current sector: records never cross sector boundaries, so
    /// a declared length larger than the slice is `MalformedRecord`.
    pub fn parse(data: &[u8]) -> Result<Option<Self>> {
        let Some(&length) = data.first() else {
            return Err(IsoError::corrupted("directory record truncated"));
        };

        if length == 0 {
            return Ok(None);
        }

        if length < Self::MIN_LENGTH || length as usize > data.len() {
            return Err(IsoError::MalformedRecord);
        }

        let body = &data[..length as usize];
        let file_id_len = body[32] as usize;
        if file_id_len == 0 {
            return Err(IsoError::MalformedRecord);
        }

        // Identifier region is padded to an even byte count, so the pad
        // byte exists exactly when the identifier length is even
        // (ECMA-119 9.1.12).
        let pad = 1 - file_id_len % 2;
        let fixed_end = FIXED_LEN + file_id_len + pad;
        if fixed_end > length as usize {
            // Would leave a negative system use length
            return Err(IsoError::MalformedRecord);
        }
        let system_use_len = (length as usize - fixed_end) as u8;

        let recorded: [u8; 7] = [
            body[18], body[19], body[20], body[21], body[22], body[23], body[24],
        ];

        Ok(Some(Self {
            length,
            extended_attr_length: body[1],
            extent_lba: le_u32(&body[2..6]),
            data_length: le_u32(&body[10..14]),
            recorded_at: DateTime7::from_bytes(&recorded),
            flags: FileFlags::from_bits(body[25]),
            file_unit_size: body[26],
            interleave_gap: body[27],
            volume_sequence: le_u16(&body[28..30]),
            file_id: FileId::decode(&body[33..33 + file_id_len]),
            system_use_len,
        }))
    }

    /// Re-encode the record into `out`, which must hold at least
    /// `self.length` bytes. Both endiannesses of each numeric field are
    /// regenerated from the trusted value; the system use region is
    /// emitted as zeros since its content is never retained.
    ///
    /// Returns the number of bytes written (`self.length`).
    pub fn encode_into(&self, out: &mut [u8]) -> usize {
        let length = self.length as usize;
        out[..length].fill(0);

        out[0] = self.length;
        out[1] = self.extended_attr_length;
        write_both_u32(&mut out[2..10], self.extent_lba);
        write_both_u32(&mut out[10..18], self.data_length);
        out[18..25].copy_from_slice(&self.recorded_at.to_bytes());
        out[25] = self.flags.bits();
        out[26] = self.file_unit_size;
        out[27] = self.interleave_gap;
        write_both_u16(&mut out[28..32], self.volume_sequence);
        out[32] = self.file_id.len() as u8;
        out[33..33 + self.file_id.len()].copy_from_slice(self.file_id.as_bytes());

        length
    }

    /// The record's content extent
    pub fn extent(&self) -> Extent {
        Extent::new(self.extent_lba, self.data_length)
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.flags.directory
    }

    /// Is this the self ("." ) or parent ("..") pseudo-entry?
    pub fn is_pseudo(&self) -> bool {
        matches!(self.file_id, FileId::Current | FileId::Parent)
    }
}
