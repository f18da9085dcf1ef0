//! ISO9660 (ECMA-119) image reader
//!
//! A `no_std` reader for raw ISO9660 disc images: volume descriptor
//! scanning, directory record decoding, and bounded file content reading
//! for extraction tools.
//!
//! # Overview
//!
//! ISO9660 is the standard filesystem for CD-ROMs and DVDs. This crate
//! provides:
//! - Primary Volume Descriptor location and full field decoding
//! - Directory record decoding, including multi-extent continuation runs
//! - A lazy depth-first walk over the whole directory tree
//! - Bounded file readers that never return bytes past the declared length
//!
//! Rock Ridge, Joliet, El Torito and UDF are out of scope: their byte
//! regions (system use areas, foreign descriptors) are measured and
//! skipped, never interpreted.
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Volume layer** - Scans sectors 16+ for the Primary Volume Descriptor
//! 2. **Directory layer** - Decodes directory records and walks extents
//! 3. **File layer** - Reads file data from extent chains
//!
//! # Usage
//!
//! ```ignore
//! use isofs::{mount, DirectoryWalk, EntryKind};
//!
//! // Mount the image from a block device at the given start sector
//! let volume = mount(&mut block_io, 0)?;
//! println!("volume: {}", volume.volume_id());
//!
//! // Walk the tree depth-first; directories are emitted before their
//! // children so an extractor can create them first.
//! let mut walk = DirectoryWalk::new(&mut block_io, &volume);
//! while let Some(entry) = walk.next() {
//!     let entry = entry?;
//!     if let Some(mut reader) = walk.open_file(&entry) {
//!         // copy exactly entry.size bytes out of `reader`
//!     }
//! }
//! ```
//!
//! # Path lookup
//!
//! ```ignore
//! use isofs::{mount, find_file, read_file_vec};
//!
//! let volume = mount(&mut block_io, 0)?;
//! let file = find_file(&mut block_io, &volume, "/boot/vmlinuz")?;
//! let data = read_file_vec(&mut block_io, &volume, &file)?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;
pub mod types;
pub mod volume;
pub mod directory;
pub mod file;
pub mod utils;

pub use error::{IsoError, Result};
pub use types::{EntryKind, FileEntry, FileFlags, IsoLayout, Volume};

// High-level API exports
pub use directory::{find_file, DirectoryIterator, DirectoryWalk};
pub use file::{read_file, read_file_vec, FileReader};
pub use volume::{mount, mount_with, scan, PrimaryVolumeDescriptor};
