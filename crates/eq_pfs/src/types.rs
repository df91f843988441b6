//! Base types for structure of PFS file.

use binrw::{BinRead, BinWrite};

/// The only version of the container format seen in the wild.
pub const PFS_VERSION: u32 = 0x0002_0000;

/// Checksum value marking the directory record that holds the file name list.
pub const NAME_ENTRY_CRC: u32 = 0x6158_0AC9;

/// PFS file header
///
/// Defines the header of the PFS file: the directory offset, then the magic "PFS " and a
/// fixed version. All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct PfsHeader {
    /// The offset from the beginning of the file where the directory block starts
    pub dir_offset: u32,

    /// The version of the container format, always [`PFS_VERSION`]
    #[brw(magic = b"PFS ")]
    #[br(assert(version == PFS_VERSION))]
    pub version: u32,
}

impl Default for PfsHeader {
    fn default() -> Self {
        Self {
            dir_offset: 12,
            version: PFS_VERSION,
        }
    }
}

/// PFS directory record
///
/// Defines one entry in the directory block
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct PfsDirEntry {
    /// Checksum of the entry's file name, see [`crate::checksum::file_name_crc`]
    pub crc: u32,

    /// The offset to the entry's first data block from the start of the file
    pub offset: u32,

    /// The size of the entry's payload once every block has been inflated
    pub size: u32,
}

/// Trailing footer carried by some containers
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"STEVE", little)]
pub struct PfsFooter {
    /// Date stamp, seconds since the unix epoch
    pub date: u32,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::PfsDirEntry;
    use crate::types::PfsFooter;
    use crate::types::PfsHeader;

    #[test]
    fn read_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x0C, 0x00, 0x00, 0x00,
            0x50, 0x46, 0x53, 0x20,
            0x00, 0x00, 0x02, 0x00,
        ]);

        let expected = PfsHeader {
            dir_offset: 12,
            ..Default::default()
        };

        assert_eq!(PfsHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_header_invalid_magic() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x0C, 0x00, 0x00, 0x00,
            0x50, 0x46, 0x53, 0x21,
            0x00, 0x00, 0x02, 0x00,
        ]);

        assert!(PfsHeader::read(&mut input).is_err());
    }

    #[test]
    fn read_header_unsupported_version() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x0C, 0x00, 0x00, 0x00,
            0x50, 0x46, 0x53, 0x20,
            0x00, 0x00, 0x03, 0x00,
        ]);

        assert!(PfsHeader::read(&mut input).is_err());
    }

    #[test]
    fn write_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x2A, 0x00, 0x00, 0x00,
            0x50, 0x46, 0x53, 0x20,
            0x00, 0x00, 0x02, 0x00,
        ];

        let header = PfsHeader {
            dir_offset: 42,
            ..Default::default()
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_dir_entry() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0xC9, 0x0A, 0x58, 0x61,
            0x0C, 0x00, 0x00, 0x00,
            0x0B, 0x00, 0x00, 0x00,
        ]);

        let expected = PfsDirEntry {
            crc: 0x6158_0AC9,
            offset: 12,
            size: 11,
        };

        assert_eq!(PfsDirEntry::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn write_dir_entry() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0xC9, 0x0A, 0x58, 0x61,
            0x0C, 0x00, 0x00, 0x00,
            0x0B, 0x00, 0x00, 0x00,
        ];

        let entry = PfsDirEntry {
            crc: 0x6158_0AC9,
            offset: 12,
            size: 11,
        };

        let mut actual = Vec::new();
        entry.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn footer_round_trip() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x53, 0x54, 0x45, 0x56, 0x45,
            0x78, 0x56, 0x34, 0x12,
        ];

        let footer = PfsFooter { date: 0x1234_5678 };

        let mut actual = Vec::new();
        footer.write(&mut Cursor::new(&mut actual))?;
        assert_eq!(actual, expected);

        assert_eq!(PfsFooter::read(&mut Cursor::new(&actual))?, footer);

        Ok(())
    }
}
