//! Primary Volume Descriptor parsing
//!
//! The Primary Volume Descriptor (PVD) is always present and describes
//! the whole image, including the root directory record embedded at byte
//! position 157. See ECMA-119 8.4 for the field layout.

use crate::directory::record::DirectoryRecord;
use crate::error::{IsoError, Result};
use crate::types::{VolumeDescriptorType, SECTOR_SIZE};
use crate::utils::datetime::VolumeDateTime;
use crate::utils::endian::{be_u32, le_u16, le_u32, write_both_u16, write_both_u32};
use crate::utils::string;

/// Byte offset of the embedded root directory record
const ROOT_RECORD_OFFSET: usize = 156;

/// The root record field is fixed at 34 bytes
const ROOT_RECORD_LEN: usize = 34;

/// Decoded Primary Volume Descriptor (sector 16+, type 1)
///
/// Identifier fields keep their fixed-width padded byte form; the `*_id`
/// accessor methods return them trimmed. Numeric fields hold the trusted
/// little-endian half of the on-disk both-endian encoding; the mirrored
/// big-endian copy is not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryVolumeDescriptor {
    /// System identifier (32 a-characters)
    pub system_id: [u8; 32],

    /// Volume identifier (32 d-characters)
    pub volume_id: [u8; 32],

    /// Volume space size in logical blocks
    pub volume_space_size: u32,

    /// Number of volumes in the set
    pub volume_set_size: u16,

    /// This volume's ordinal within the set
    pub volume_sequence_number: u16,

    /// Logical block size in bytes (2048 on every real image)
    pub logical_block_size: u16,

    /// Path table size in bytes
    pub path_table_size: u32,

    /// Type L path table location (little-endian on disk)
    pub type_l_path_table: u32,

    /// Optional type L path table location
    pub optional_type_l_path_table: u32,

    /// Type M path table location (big-endian on disk)
    pub type_m_path_table: u32,

    /// Optional type M path table location
    pub optional_type_m_path_table: u32,

    /// Root directory record, embedded in the descriptor
    pub root_record: DirectoryRecord,

    /// Volume set identifier (128 d-characters)
    pub volume_set_id: [u8; 128],

    /// Publisher identifier (128 a-characters)
    pub publisher_id: [u8; 128],

    /// Data preparer identifier (128 a-characters)
    pub data_preparer_id: [u8; 128],

    /// Application identifier (128 a-characters)
    pub application_id: [u8; 128],

    /// Copyright file identifier (37 bytes)
    pub copyright_file_id: [u8; 37],

    /// Abstract file identifier (37 bytes)
    pub abstract_file_id: [u8; 37],

    /// Bibliographic file identifier (37 bytes)
    pub bibliographic_file_id: [u8; 37],

    /// Volume creation date and time
    pub created_at: VolumeDateTime,

    /// Volume modification date and time
    pub modified_at: VolumeDateTime,

    /// Volume expiration date and time
    pub expires_at: VolumeDateTime,

    /// Volume effective date and time
    pub effective_at: VolumeDateTime,

    /// File structure version (1)
    pub file_structure_version: u8,

    /// Application use area, opaque (512 bytes)
    pub application_use: [u8; 512],
}

impl PrimaryVolumeDescriptor {
    /// System identifier, trimmed of padding
    pub fn system_id(&self) -> &str {
        string::achars_to_str(&self.system_id).unwrap_or_default()
    }

    /// Volume identifier, trimmed of padding
    pub fn volume_id(&self) -> &str {
        string::dchars_to_str(&self.volume_id).unwrap_or_default()
    }

    /// Volume set identifier, trimmed of padding
    pub fn volume_set_id(&self) -> &str {
        string::dchars_to_str(&self.volume_set_id).unwrap_or_default()
    }

    /// Publisher identifier, trimmed of padding
    pub fn publisher_id(&self) -> &str {
        string::achars_to_str(&self.publisher_id).unwrap_or_default()
    }

    /// Data preparer identifier, trimmed of padding
    pub fn data_preparer_id(&self) -> &str {
        string::achars_to_str(&self.data_preparer_id).unwrap_or_default()
    }

    /// Application identifier, trimmed of padding
    pub fn application_id(&self) -> &str {
        string::achars_to_str(&self.application_id).unwrap_or_default()
    }
}

/// Parse a Primary Volume Descriptor from one full sector.
///
/// The fixed fields before and after the embedded root directory record
/// are positional; the record itself is variable-length within its fixed
/// 34-byte slot and is decoded by the directory record decoder.
pub fn parse(data: &[u8]) -> Result<PrimaryVolumeDescriptor> {
    if data.len() < SECTOR_SIZE {
        return Err(IsoError::corrupted("short read of primary volume descriptor"));
    }

    if data[0] != VolumeDescriptorType::Primary as u8 {
        return Err(IsoError::corrupted("descriptor type is not primary"));
    }
    if &data[1..6] != super::VolumeDescriptorHeader::MAGIC {
        return Err(IsoError::corrupted("bad standard identifier"));
    }
    if data[6] != 1 {
        return Err(IsoError::corrupted("unsupported descriptor version"));
    }

    let root_region = &data[ROOT_RECORD_OFFSET..ROOT_RECORD_OFFSET + ROOT_RECORD_LEN];
    let root_record = DirectoryRecord::parse(root_region)?
        .ok_or_else(|| IsoError::corrupted("missing root directory record"))?;

    Ok(PrimaryVolumeDescriptor {
        system_id: copy_from(&data[8..40]),
        volume_id: copy_from(&data[40..72]),
        volume_space_size: le_u32(&data[80..84]),
        volume_set_size: le_u16(&data[120..122]),
        volume_sequence_number: le_u16(&data[124..126]),
        logical_block_size: le_u16(&data[128..130]),
        path_table_size: le_u32(&data[132..136]),
        type_l_path_table: le_u32(&data[140..144]),
        optional_type_l_path_table: le_u32(&data[144..148]),
        type_m_path_table: be_u32(&data[148..152]),
        optional_type_m_path_table: be_u32(&data[152..156]),
        root_record,
        volume_set_id: copy_from(&data[190..318]),
        publisher_id: copy_from(&data[318..446]),
        data_preparer_id: copy_from(&data[446..574]),
        application_id: copy_from(&data[574..702]),
        copyright_file_id: copy_from(&data[702..739]),
        abstract_file_id: copy_from(&data[739..776]),
        bibliographic_file_id: copy_from(&data[776..813]),
        created_at: VolumeDateTime::from_bytes(copy_from(&data[813..830])),
        modified_at: VolumeDateTime::from_bytes(copy_from(&data[830..847])),
        expires_at: VolumeDateTime::from_bytes(copy_from(&data[847..864])),
        effective_at: VolumeDateTime::from_bytes(copy_from(&data[864..881])),
        file_structure_version: data[881],
        application_use: copy_from(&data[883..1395]),
    })
}

impl PrimaryVolumeDescriptor {
    /// Re-encode the descriptor into one sector.
    ///
    /// Both endiannesses of every numeric field are regenerated from the
    /// trusted value, so the output matches the original sector whenever
    /// the image's mirrored copies were consistent.
    pub fn encode_into(&self, out: &mut [u8; SECTOR_SIZE]) {
        out.fill(0);

        out[0] = VolumeDescriptorType::Primary as u8;
        out[1..6].copy_from_slice(super::VolumeDescriptorHeader::MAGIC);
        out[6] = 1;

        out[8..40].copy_from_slice(&self.system_id);
        out[40..72].copy_from_slice(&self.volume_id);
        write_both_u32(&mut out[80..88], self.volume_space_size);
        write_both_u16(&mut out[120..124], self.volume_set_size);
        write_both_u16(&mut out[124..128], self.volume_sequence_number);
        write_both_u16(&mut out[128..132], self.logical_block_size);
        write_both_u32(&mut out[132..140], self.path_table_size);
        out[140..144].copy_from_slice(&self.type_l_path_table.to_le_bytes());
        out[144..148].copy_from_slice(&self.optional_type_l_path_table.to_le_bytes());
        out[148..152].copy_from_slice(&self.type_m_path_table.to_be_bytes());
        out[152..156].copy_from_slice(&self.optional_type_m_path_table.to_be_bytes());
        self.root_record
            .encode_into(&mut out[ROOT_RECORD_OFFSET..ROOT_RECORD_OFFSET + ROOT_RECORD_LEN]);
        out[190..318].copy_from_slice(&self.volume_set_id);
        out[318..446].copy_from_slice(&self.publisher_id);
        out[446..574].copy_from_slice(&self.data_preparer_id);
        out[574..702].copy_from_slice(&self.application_id);
        out[702..739].copy_from_slice(&self.copyright_file_id);
        out[739..776].copy_from_slice(&self.abstract_file_id);
        out[776..813].copy_from_slice(&self.bibliographic_file_id);
        out[813..830].copy_from_slice(&self.created_at.raw);
        out[830..847].copy_from_slice(&self.modified_at.raw);
        out[847..864].copy_from_slice(&self.expires_at.raw);
        out[864..881].copy_from_slice(&self.effective_at.raw);
        out[881] = self.file_structure_version;
        out[883..1395].copy_from_slice(&self.application_use);
    }
}

fn copy_from<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}
