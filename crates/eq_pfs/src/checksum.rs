//! Directory checksum handling.

use crc::{Algorithm, Crc};

/// CRC parameters used for PFS directory records: CRC-32/CKSUM without the final xor.
const CRC_32_PFS: Algorithm<u32> = Algorithm {
    width: 32,
    poly: 0x04C1_1DB7,
    init: 0x0000_0000,
    refin: false,
    refout: false,
    xorout: 0x0000_0000,
    check: 0x89A1_897F,
    residue: 0x0000_0000,
};

/// Compute the directory checksum for a file name.
///
/// The hash covers the name bytes plus the trailing null that terminates the name inside
/// the archive's name entry.
pub fn file_name_crc(name: &str) -> u32 {
    let crc = Crc::<u32>::new(&CRC_32_PFS);
    let mut digest = crc.digest();
    digest.update(name.as_bytes());
    digest.update(&[0]);
    digest.finalize()
}

#[cfg(test)]
mod test {
    use crc::Crc;

    use super::{file_name_crc, CRC_32_PFS};

    #[test]
    fn algorithm_check_value() {
        assert_eq!(
            Crc::<u32>::new(&CRC_32_PFS).checksum(b"123456789"),
            0x89A1_897F
        );
    }

    #[test]
    fn includes_trailing_null() {
        let with_null = Crc::<u32>::new(&CRC_32_PFS).checksum(b"hello.txt\0");
        assert_eq!(file_name_crc("hello.txt"), with_null);
    }

    #[test]
    fn names_hash_apart() {
        assert_ne!(file_name_crc("hello.txt"), file_name_crc("world.txt"));
    }
}
