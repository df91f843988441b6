//! This library handles reading from and creating **PFS** archives used by *EverQuest*.
//!
//! # PFS Archive Format Documentation
//!
//! This crate provides utilities to read, edit and write the **PFS** container format used by
//! the game *EverQuest* to bundle models, world geometry and textures into a single file. PFS
//! containers are found with the `.eqg`, `.s3d`, `.pfs` and `.pak` extensions.
//!
//! ## File Structure
//!
//! A PFS file consists of a header, the compressed data region, a directory block and an
//! optional footer.
//!
//! | Offset (bytes) | Field            | Description                                         |
//! |----------------|------------------|-----------------------------------------------------|
//! | 0x0000         | Directory Offset | 4 bytes: Offset to the directory block              |
//! | 0x0004         | Magic number     | 4 bytes: 0x20534650 ("PFS ")                        |
//! | 0x0008         | Version          | 4 bytes: Fixed value 0x00020000                     |
//!
//! ### Data Region
//!
//! The data region starts at offset 12 and holds one block chain per entry. Each block is
//! framed by two little-endian 32-bit lengths followed by a zlib stream:
//!
//! | Offset (bytes) | Field          | Description                                 |
//! |----------------|----------------|---------------------------------------------|
//! | 0x0000         | Deflated Size  | 4 bytes: Length of the zlib data that follows |
//! | 0x0004         | Inflated Size  | 4 bytes: Length of the block once inflated  |
//!
//! A chain ends once the accumulated inflated length reaches the entry's size recorded in the
//! directory. Writers split payloads into blocks of at most 8192 inflated bytes.
//!
//! ### Directory Block
//!
//! The directory block starts at the offset named in the header with a 4-byte entry count,
//! followed by one 12-byte record per entry:
//!
//! | Offset (bytes) | Field    | Description                                          |
//! |----------------|----------|------------------------------------------------------|
//! | 0x0000         | CRC32    | 4 bytes: Checksum of the entry's file name           |
//! | 0x0004         | Offset   | 4 bytes: Offset to the entry's first data block      |
//! | 0x0008         | Size     | 4 bytes: Size of the entry's payload once inflated   |
//!
//! The checksum covers the file name bytes plus a trailing null, using polynomial
//! `0x04C11DB7` with a zero initial value and no reflection or final xor.
//!
//! ### Name Entry
//!
//! File names are not stored next to the directory records. Instead, the record whose
//! checksum equals `0x61580AC9` points at a block chain holding the name list: a 4-byte name
//! count, then for each name a 4-byte length followed by that many bytes including a trailing
//! null. Names pair with the remaining directory records in ascending data-offset order.
//!
//! ### Footer
//!
//! Some containers carry a trailing footer after the directory: the 5 bytes `"STEVE"`
//! followed by a 4-byte date stamp. The footer is preserved when present and omitted
//! otherwise.
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.eqg`, `.s3d`, `.pfs`, `.pak`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression**: Zlib for every data block, including the name entry
//!

pub mod asset;
pub mod checksum;
pub mod compression;
pub mod error;
pub mod read;
pub mod table;
pub mod types;
pub mod write;

pub use asset::{Asset, AssetHandler, FieldNode, HandlerRegistry};
pub use read::PfsArchive;
pub use table::PfsTable;
pub use write::PfsWriter;
