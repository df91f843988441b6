//! Types for writing PFS archives
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fmt::Debug;
use std::io::{self, Cursor, Seek, Write};
use std::mem;
use tracing::instrument;

use crate::checksum::file_name_crc;
use crate::compression::PfsBlockWriter;
use crate::error::Result;
use crate::types::{PfsDirEntry, PfsFooter, PfsHeader, NAME_ENTRY_CRC};

/// Options for how the PFS file should be written
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct PfsWriterOptions {
    /// Date stamp for the trailing footer; no footer is written when unset
    pub footer_date: Option<u32>,
}

/// PFS archive generator
///
/// ```
/// # fn doit() -> eq_pfs::error::Result<()>
/// # {
/// # use eq_pfs::PfsWriter;
/// use std::io::Write;
/// use eq_pfs::write::PfsWriterOptions;
///
/// // We use a buffer here, though you'd normally use a `File`
/// let mut pfs = PfsWriter::new(
///     std::io::Cursor::new(Vec::new()),
///     PfsWriterOptions::builder().build(),
/// );
///
/// pfs.start_file("hello_world.txt")?;
/// pfs.write(b"Hello, World!")?;
///
/// // Apply the changes you've made.
/// pfs.finish()?;
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct PfsWriter<W: Write + Seek> {
    inner: W,
    writing_to_file: bool,
    data_block: Cursor<Vec<u8>>,
    current_data_block: Option<PfsBlockWriter<Cursor<Vec<u8>>>>,
    names: Vec<Box<str>>,
    directory: Vec<PfsDirEntry>,
    record: PfsDirEntry,
    options: PfsWriterOptions,
}

impl<W: Write + Seek> PfsWriter<W> {
    /// Initializes the archive.
    ///
    /// Before writing to this object, the [`PfsWriter::start_file`] function should be called.
    /// After a successful write, the file remains open for writing. After a failed write, call
    /// [`PfsWriter::is_writing_file`] to determine if the file remains open.
    pub fn new(inner: W, options: PfsWriterOptions) -> PfsWriter<W> {
        PfsWriter {
            inner,
            writing_to_file: false,
            data_block: Cursor::new(Vec::new()),
            current_data_block: None,
            names: Vec::new(),
            directory: Vec::new(),
            record: PfsDirEntry::default(),
            options,
        }
    }

    /// Returns true if a file is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.writing_to_file
    }

    /// Start a new file entry.
    #[instrument(skip(self, name), err)]
    pub fn start_file(&mut self, name: impl ToString) -> Result<()> {
        if self.writing_to_file {
            self.finish_file()?;
        }

        assert!(self.current_data_block.is_none());

        let _ = mem::replace(
            &mut self.current_data_block,
            Some(PfsBlockWriter::new(Cursor::new(Vec::new()))),
        );

        let name = name.to_string();
        self.record.crc = file_name_crc(&name);
        self.record.offset = 12 + self.data_block.get_ref().len() as u32;
        self.names.push(name.into());

        self.writing_to_file = true;

        Ok(())
    }

    #[instrument(skip(self), err)]
    fn finish_file(&mut self) -> Result<()> {
        let current_block = self
            .current_data_block
            .take()
            .expect("current data block should always be valid when finishing a file");

        let block_total_in = current_block.total_in();
        let current_block_data = current_block.finalize()?.into_inner();

        self.record.size = block_total_in as u32;
        self.directory.push(self.record);

        self.data_block.write_all(&current_block_data)?;

        self.writing_to_file = false;

        Ok(())
    }

    /// Finish the last file and write all other PFS file structures
    ///
    /// This will return the writer, but one should normally not append any data to the end of
    /// the file.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        if self.writing_to_file {
            self.finish_file()?;
        }

        if !self.names.is_empty() {
            let mut blob = Vec::new();
            blob.write_u32::<LittleEndian>(self.names.len() as u32)?;
            for name in &self.names {
                blob.write_u32::<LittleEndian>(name.len() as u32 + 1)?;
                blob.extend_from_slice(name.as_bytes());
                blob.push(0);
            }

            let record = PfsDirEntry {
                crc: NAME_ENTRY_CRC,
                offset: 12 + self.data_block.get_ref().len() as u32,
                size: blob.len() as u32,
            };

            let mut name_block = PfsBlockWriter::new(Cursor::new(Vec::new()));
            name_block.write_all(&blob)?;
            self.data_block
                .write_all(&name_block.finalize()?.into_inner())?;
            self.directory.push(record);
        }

        // Directory records are stored sorted by checksum; readers re-pair names with data
        // records through their offsets.
        self.directory.sort_by_key(|r| r.crc);

        let data_block = self.data_block.into_inner();
        let header = PfsHeader {
            dir_offset: 12 + data_block.len() as u32,
            ..Default::default()
        };

        header.write(&mut self.inner)?;
        self.inner.write_all(&data_block)?;
        self.inner
            .write_u32::<LittleEndian>(self.directory.len() as u32)?;
        for record in &self.directory {
            record.write(&mut self.inner)?;
        }

        if let Some(date) = self.options.footer_date {
            PfsFooter { date }.write(&mut self.inner)?;
        }

        Ok(self.inner)
    }
}

impl<W: Write + Seek> Write for PfsWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.writing_to_file {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "No file has been started",
            ));
        }
        self.current_data_block
            .as_mut()
            .expect("current data block should be initialized by the time we write")
            .write(buf)
    }

    #[instrument(skip(self), err)]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
