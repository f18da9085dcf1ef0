//! Fixture ISO image builder
//!
//! Writes just enough of an ECMA-119 image for the reader to chew on:
//! a Primary Volume Descriptor at sector 16, a set terminator at 17, and
//! sector-aligned directory extents with "." / ".." entries, nested
//! directories, plain files and multi-extent continuation runs.

use crate::common::MemoryBlockDevice;

const SECTOR: usize = 2048;

#[derive(Default)]
struct Node {
    children: Vec<Child>,
}

enum Child {
    Dir(String, Node),
    File(FileSpec),
}

struct FileSpec {
    name: String,
    chunks: Vec<Vec<u8>>,
    flags: u8,
}

pub struct IsoBuilder {
    volume_id: String,
    system_id: String,
    volume_set_id: String,
    publisher_id: String,
    root_lba: u32,
    root: Node,
}

impl IsoBuilder {
    pub fn new() -> Self {
        Self {
            volume_id: "TESTVOL".to_string(),
            system_id: "TEST SYSTEM".to_string(),
            volume_set_id: String::new(),
            publisher_id: String::new(),
            root_lba: 18,
            root: Node::default(),
        }
    }

    pub fn volume_id(&mut self, id: &str) -> &mut Self {
        self.volume_id = id.to_string();
        self
    }

    pub fn volume_set_id(&mut self, id: &str) -> &mut Self {
        self.volume_set_id = id.to_string();
        self
    }

    pub fn publisher_id(&mut self, id: &str) -> &mut Self {
        self.publisher_id = id.to_string();
        self
    }

    /// Place the root directory extent at a specific sector (>= 18)
    pub fn root_lba(&mut self, lba: u32) -> &mut Self {
        assert!(lba >= 18, "root extent would overlap descriptors");
        self.root_lba = lba;
        self
    }

    /// Create a (possibly nested) empty directory
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        dir_node(&mut self.root, &components(path));
        self
    }

    /// Add a file; intermediate directories are created on first use
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> &mut Self {
        self.add_file_with_flags(path, content, 0x00)
    }

    pub fn add_hidden_file(&mut self, path: &str, content: &[u8]) -> &mut Self {
        self.add_file_with_flags(path, content, 0x01)
    }

    fn add_file_with_flags(&mut self, path: &str, content: &[u8], flags: u8) -> &mut Self {
        let parts = components(path);
        let (name, dirs) = parts.split_last().expect("file path");
        let node = dir_node(&mut self.root, dirs);
        node.children.push(Child::File(FileSpec {
            name: name.to_string(),
            chunks: vec![content.to_vec()],
            flags,
        }));
        self
    }

    /// Add a file stored as one extent per chunk, recorded as a
    /// multi-extent continuation run. All chunks but the last should be
    /// sector multiples, as on real images.
    pub fn add_multi_extent_file(&mut self, path: &str, chunks: &[&[u8]]) -> &mut Self {
        assert!(!chunks.is_empty());
        let parts = components(path);
        let (name, dirs) = parts.split_last().expect("file path");
        let node = dir_node(&mut self.root, dirs);
        node.children.push(Child::File(FileSpec {
            name: name.to_string(),
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
            flags: 0x00,
        }));
        self
    }

    pub fn build(&mut self) -> MemoryBlockDevice {
        // Flatten the tree, assigning one sector per directory in
        // depth-first preorder, then extents for every file chunk.
        let root = std::mem::take(&mut self.root);
        let mut dirs = Vec::new();
        flatten(root, 0, &mut dirs);

        let mut next_free = self.root_lba + 1;
        dirs[0].lba = self.root_lba;
        for dir in dirs.iter_mut().skip(1) {
            dir.lba = next_free;
            next_free += 1;
        }
        for dir in dirs.iter_mut() {
            for entry in dir.entries.iter_mut() {
                if let FlatEntry::File { chunks, extents, .. } = entry {
                    for chunk in chunks.iter() {
                        extents.push((next_free, chunk.len() as u32));
                        next_free += chunk.len().div_ceil(SECTOR) as u32;
                    }
                }
            }
        }

        let total_sectors = next_free;
        let mut data = vec![0u8; total_sectors as usize * SECTOR];

        self.write_pvd(&mut data, total_sectors);

        // Volume descriptor set terminator
        let term = 17 * SECTOR;
        data[term] = 255;
        data[term + 1..term + 6].copy_from_slice(b"CD001");
        data[term + 6] = 1;

        // Directory extents
        for (index, dir) in dirs.iter().enumerate() {
            let parent_lba = dirs[dir.parent].lba;
            let mut offset = dir.lba as usize * SECTOR;
            write_dir_entry(&mut data, &mut offset, dir.lba, SECTOR as u32, 0x02, &[0x00]);
            write_dir_entry(&mut data, &mut offset, parent_lba, SECTOR as u32, 0x02, &[0x01]);

            for entry in &dir.entries {
                match entry {
                    FlatEntry::Dir { name, dir_id } => {
                        write_dir_entry(
                            &mut data,
                            &mut offset,
                            dirs[*dir_id].lba,
                            SECTOR as u32,
                            0x02,
                            name.as_bytes(),
                        );
                    }
                    FlatEntry::File {
                        name,
                        flags,
                        chunks,
                        extents,
                    } => {
                        let last = extents.len() - 1;
                        for (i, (lba, len)) in extents.iter().enumerate() {
                            let flags = if i < last { flags | 0x80 } else { *flags };
                            write_dir_entry(&mut data, &mut offset, *lba, *len, flags, name.as_bytes());
                            let start = *lba as usize * SECTOR;
                            data[start..start + chunks[i].len()].copy_from_slice(&chunks[i]);
                        }
                    }
                }
            }

            assert!(
                offset <= (dir.lba as usize + 1) * SECTOR,
                "directory {index} overflows its sector"
            );
        }

        MemoryBlockDevice::new(data)
    }

    fn write_pvd(&self, data: &mut [u8], total_sectors: u32) {
        let pvd = 16 * SECTOR;
        data[pvd] = 1; // Primary
        data[pvd + 1..pvd + 6].copy_from_slice(b"CD001");
        data[pvd + 6] = 1; // Version

        write_padded(&mut data[pvd + 8..pvd + 40], &self.system_id);
        write_padded(&mut data[pvd + 40..pvd + 72], &self.volume_id);

        write_both_endian_u32(&mut data[pvd + 80..], total_sectors);
        write_both_endian_u16(&mut data[pvd + 120..], 1); // volume set size
        write_both_endian_u16(&mut data[pvd + 124..], 1); // volume sequence number
        write_both_endian_u16(&mut data[pvd + 128..], SECTOR as u16);
        write_both_endian_u32(&mut data[pvd + 132..], 0); // path table size

        // Root directory record in its fixed 34-byte slot
        let mut root_offset = pvd + 156;
        write_dir_entry(data, &mut root_offset, self.root_lba, SECTOR as u32, 0x02, &[0x00]);

        write_padded(&mut data[pvd + 190..pvd + 318], &self.volume_set_id);
        write_padded(&mut data[pvd + 318..pvd + 446], &self.publisher_id);
        write_padded(&mut data[pvd + 446..pvd + 574], "");
        write_padded(&mut data[pvd + 574..pvd + 702], "");
        write_padded(&mut data[pvd + 702..pvd + 739], "");
        write_padded(&mut data[pvd + 739..pvd + 776], "");
        write_padded(&mut data[pvd + 776..pvd + 813], "");

        // The four date-times, unrecorded form: sixteen '0' digits + 0
        for date_offset in [813, 830, 847, 864] {
            let start = pvd + date_offset;
            data[start..start + 16].copy_from_slice(b"0000000000000000");
            data[start + 16] = 0;
        }

        data[pvd + 881] = 1; // file structure version
    }
}

struct FlatDir {
    parent: usize,
    lba: u32,
    entries: Vec<FlatEntry>,
}

enum FlatEntry {
    Dir {
        name: String,
        dir_id: usize,
    },
    File {
        name: String,
        flags: u8,
        chunks: Vec<Vec<u8>>,
        extents: Vec<(u32, u32)>,
    },
}

fn flatten(node: Node, parent: usize, dirs: &mut Vec<FlatDir>) -> usize {
    let id = dirs.len();
    dirs.push(FlatDir {
        parent,
        lba: 0,
        entries: Vec::new(),
    });
    for child in node.children {
        let entry = match child {
            Child::Dir(name, sub) => {
                let dir_id = flatten(sub, id, dirs);
                FlatEntry::Dir { name, dir_id }
            }
            Child::File(spec) => FlatEntry::File {
                name: spec.name,
                flags: spec.flags,
                chunks: spec.chunks,
                extents: Vec::new(),
            },
        };
        dirs[id].entries.push(entry);
    }
    id
}

fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

fn dir_node<'a>(mut node: &'a mut Node, parts: &[&str]) -> &'a mut Node {
    for part in parts {
        let position = node.children.iter().position(
            |c| matches!(c, Child::Dir(name, _) if name == part),
        );
        let position = match position {
            Some(p) => p,
            None => {
                node.children
                    .push(Child::Dir(part.to_string(), Node::default()));
                node.children.len() - 1
            }
        };
        node = match &mut node.children[position] {
            Child::Dir(_, sub) => sub,
            Child::File(_) => panic!("path component {part} is a file"),
        };
    }
    node
}

fn write_padded(dst: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    assert!(bytes.len() <= dst.len());
    dst[..bytes.len()].copy_from_slice(bytes);
    dst[bytes.len()..].fill(b' ');
}

pub fn write_both_endian_u32(dst: &mut [u8], value: u32) {
    dst[0..4].copy_from_slice(&value.to_le_bytes());
    dst[4..8].copy_from_slice(&value.to_be_bytes());
}

pub fn write_both_endian_u16(dst: &mut [u8], value: u16) {
    dst[0..2].copy_from_slice(&value.to_le_bytes());
    dst[2..4].copy_from_slice(&value.to_be_bytes());
}

/// Write one directory record at `offset`, advancing it by the record
/// length. Identifier bytes are written verbatim (0x00 / 0x01 for the
/// pseudo-entries).
pub fn write_dir_entry(
    data: &mut [u8],
    offset: &mut usize,
    lba: u32,
    size: u32,
    flags: u8,
    name: &[u8],
) {
    let name_len = name.len();
    let mut entry_len = 33 + name_len;
    if entry_len % 2 != 0 {
        entry_len += 1; // padding to even
    }

    let start = *offset;
    data[start] = entry_len as u8;
    data[start + 1] = 0; // extended attribute length

    write_both_endian_u32(&mut data[start + 2..], lba);
    write_both_endian_u32(&mut data[start + 10..], size);

    // Recording date (7 bytes): 2024-06-01 12:30:00 UTC
    data[start + 18..start + 25].copy_from_slice(&[124, 6, 1, 12, 30, 0, 0]);

    data[start + 25] = flags;

    write_both_endian_u16(&mut data[start + 28..], 1); // volume sequence

    data[start + 32] = name_len as u8;
    data[start + 33..start + 33 + name_len].copy_from_slice(name);

    *offset += entry_len;
}
