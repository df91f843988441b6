//! Types for reading PFS archives
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use indexmap::IndexMap;
use std::{
    fmt::{self, Debug},
    io::{Read, Seek, SeekFrom},
    sync::Arc,
};

use crate::{
    compression::PfsBlockReader,
    error::{Error, FileNotFoundError, Result},
    types::{PfsDirEntry, PfsFooter, PfsHeader, NAME_ENTRY_CRC},
};

/// A struct for reading an entry from a PFS file
pub struct PfsFile<'a, R: Read + Seek> {
    data: &'a PfsFileData,
    reader: PfsBlockReader<'a, R>,
}

impl<R: Read + Seek> Debug for PfsFile<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PfsFile({:#?})", self.data)
    }
}

/// Methods for retrieving information on PFS file entries
impl<R: Read + Seek> PfsFile<'_, R> {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`). Carelessly writing to these paths
    /// allows an attacker to craft a PFS archive that will overwrite critical
    /// files.
    ///
    pub fn name(&self) -> &str {
        &self.data.file_name
    }

    /// Get the size of the file, in bytes, when inflated
    pub fn size(&self) -> u64 {
        self.data.size
    }

    /// Get the directory checksum of the file's name
    pub fn crc32(&self) -> u32 {
        self.data.crc
    }

    /// Get the starting offset of the file's first data block
    pub fn data_start(&self) -> u64 {
        self.data.data_start
    }
}

impl<R: Read + Seek> Read for PfsFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Structure representing a PFS file entry.
#[derive(Debug, Clone, Default)]
pub struct PfsFileData {
    /// Directory checksum of the file's name
    pub crc: u32,

    /// Size of the file when every block has been inflated
    pub size: u64,

    /// Name of the file, in its original case
    pub file_name: Box<str>,

    /// Specifies where the first data block of the file starts
    pub data_start: u64,
}

#[derive(Debug)]
pub(crate) struct Shared {
    footer: Option<PfsFooter>,
    files: IndexMap<Box<str>, PfsFileData>,
}

/// PFS archive reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_pfs_contents(reader: impl Read + Seek) -> eq_pfs::error::Result<()> {
///     let mut pfs = eq_pfs::PfsArchive::new(reader)?;
///
///     for i in 0..pfs.len() {
///         let mut file = pfs.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::stdout())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct PfsArchive<R> {
    reader: R,
    shared: Arc<Shared>,
}

impl<R> PfsArchive<R> {
    /// Total size of the files in the archive, if it can be known. Doesn't include the name
    /// entry or directory metadata.
    pub fn decompressed_size(&self) -> Option<u128> {
        let mut total = 0u128;
        for file in self.shared.files.values() {
            total = total.checked_add(file.size as u128)?;
        }
        Some(total)
    }

    /// The archive's trailing footer, when one is present.
    pub fn footer(&self) -> Option<PfsFooter> {
        self.shared.footer
    }
}

impl<R: Read + Seek> PfsArchive<R> {
    /// Read a PFS archive collecting the files it contains.
    pub fn new(mut reader: R) -> Result<PfsArchive<R>> {
        match Self::get_metadata(&mut reader) {
            Ok(shared) => Ok(PfsArchive {
                reader,
                shared: shared.into(),
            }),
            Err(e) => Err(Error::InvalidArchive(e.to_string())),
        }
    }

    /// Number of entries contained in this PFS.
    pub fn len(&self) -> usize {
        self.shared.files.len()
    }

    /// Whether this PFS archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all the file names in this archive, in data order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.shared.files.values().map(|f| f.file_name.as_ref())
    }

    /// Get the index of a file entry by name, if it's present. Names compare
    /// case-insensitively.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared
            .files
            .get_index_of(name.to_ascii_lowercase().as_str())
    }

    /// Get the name of a file entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.shared
            .files
            .get_index(index)
            .map(|(_, data)| data.file_name.as_ref())
    }

    /// Search for a file entry by name
    pub fn by_name(&mut self, name: &str) -> Result<PfsFile<'_, R>> {
        let Some(index) = self.index_for_name(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained file by index
    pub fn by_index(&mut self, file_number: usize) -> Result<PfsFile<'_, R>> {
        let (_, data) = self
            .shared
            .files
            .get_index(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        Ok(PfsFile {
            data,
            reader: PfsBlockReader::new(&mut self.reader, data.data_start, data.size)?,
        })
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn get_names(reader: &mut R, entry: &PfsDirEntry) -> Result<Vec<Box<str>>> {
        let mut name_reader = PfsBlockReader::new(reader, entry.offset as u64, entry.size as u64)?;

        let count = name_reader.read_u32::<LittleEndian>()?;
        (0..count)
            .map(|_| {
                let len = name_reader.read_u32::<LittleEndian>()? as usize;
                let mut name_raw = vec![0u8; len];
                name_reader.read_exact(&mut name_raw)?;
                while name_raw.last() == Some(&b'\0') {
                    name_raw.pop();
                }
                Ok(String::from_utf8_lossy(&name_raw).into())
            })
            .collect()
    }

    fn get_metadata(reader: &mut R) -> Result<Shared> {
        let header = PfsHeader::read(reader)?;

        reader.seek(SeekFrom::Start(header.dir_offset as u64))?;
        let count = reader.read_u32::<LittleEndian>()?;

        let mut name_entry = None;
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let record = PfsDirEntry::read(reader)?;
            if record.crc == NAME_ENTRY_CRC {
                name_entry = Some(record);
            } else {
                records.push(record);
            }
        }

        let dir_end = header.dir_offset as u64 + 4 + count as u64 * 12;
        let footer = Self::get_footer(reader, dir_end);

        // Names pair with the data records in ascending offset order.
        records.sort_by_key(|r| r.offset);

        let names = match name_entry {
            Some(entry) => Self::get_names(reader, &entry)?,
            None if records.is_empty() => Vec::new(),
            None => {
                return Err(Error::CustomError(
                    "directory has entries but no name entry".into(),
                ))
            }
        };

        if names.len() != records.len() {
            return Err(Error::CustomError(format!(
                "name entry holds {} names for {} directory records",
                names.len(),
                records.len()
            )));
        }

        let mut index_map = IndexMap::with_capacity(records.len());
        for (r, n) in records.into_iter().zip(names) {
            let file = PfsFileData {
                crc: r.crc,
                size: r.size as u64,
                data_start: r.offset as u64,
                file_name: n,
            };
            let key: Box<str> = file.file_name.to_ascii_lowercase().into();
            if let Some(previous) = index_map.insert(key, file) {
                return Err(Error::CustomError(format!(
                    "duplicate file name {}",
                    previous.file_name
                )));
            }
        }

        Ok(Shared {
            footer,
            files: index_map,
        })
    }

    fn get_footer(reader: &mut R, dir_end: u64) -> Option<PfsFooter> {
        reader.seek(SeekFrom::Start(dir_end)).ok()?;
        PfsFooter::read(reader).ok()
    }
}
