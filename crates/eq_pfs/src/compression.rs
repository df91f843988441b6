//! Block compression and decompression handling.

use std::io::{self, Read, Seek, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use tracing::instrument;

use crate::error::Result;

/// Largest number of inflated bytes a single block may carry.
pub(crate) const MAX_BLOCK_SIZE: usize = 8192;

/// Reader over one entry's chain of zlib blocks.
///
/// Each block is framed with its deflated and inflated lengths; the chain ends once the
/// inflated total given at construction has been served.
pub(crate) struct PfsBlockReader<'a, R: Read + Seek> {
    reader: &'a mut R,
    remaining: u64,
    buffer: Vec<u8>,
    pos: usize,
}

impl<'a, R: Read + Seek> PfsBlockReader<'a, R> {
    #[tracing::instrument(skip(reader))]
    pub fn new(reader: &'a mut R, start: u64, inflated: u64) -> Result<Self> {
        reader.seek(io::SeekFrom::Start(start))?;

        Ok(PfsBlockReader {
            reader,
            remaining: inflated,
            buffer: Vec::new(),
            pos: 0,
        })
    }

    fn next_block(&mut self) -> io::Result<()> {
        let deflated = self.reader.read_u32::<LittleEndian>()? as u64;
        let inflated = self.reader.read_u32::<LittleEndian>()? as u64;

        if inflated > self.remaining {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "block inflates past the entry's directory size",
            ));
        }

        let mut block = Vec::with_capacity(inflated as usize);
        let mut decoder = ZlibDecoder::new(self.reader.by_ref().take(deflated));
        decoder.read_to_end(&mut block)?;

        if block.len() as u64 != inflated {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "block did not inflate to its framed length",
            ));
        }

        self.remaining -= inflated;
        self.buffer = block;
        self.pos = 0;

        Ok(())
    }
}

impl<R: Read + Seek> Read for PfsBlockReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.buffer.len() {
            if self.remaining == 0 {
                return Ok(0);
            }
            self.next_block()?;
        }

        let n = buf.len().min(self.buffer.len() - self.pos);
        buf[..n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
        self.pos += n;

        Ok(n)
    }
}

/// Writer that frames a payload into a chain of zlib blocks.
pub(crate) struct PfsBlockWriter<W: Write> {
    inner: W,
    pending: Vec<u8>,
    total_in: u64,
}

impl<W: Write> PfsBlockWriter<W> {
    pub fn new(inner: W) -> Self {
        PfsBlockWriter {
            inner,
            pending: Vec::new(),
            total_in: 0,
        }
    }

    /// Number of payload bytes accepted so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    #[instrument(skip(self), err)]
    pub fn finalize(mut self) -> io::Result<W> {
        // An empty payload still gets one block, so every chain owns a distinct
        // offset in the data region.
        if !self.pending.is_empty() || self.total_in == 0 {
            let chunk = std::mem::take(&mut self.pending);
            self.emit_block(&chunk)?;
        }
        Ok(self.inner)
    }

    fn emit_block(&mut self, chunk: &[u8]) -> io::Result<()> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(chunk)?;
        let deflated = encoder.finish()?;

        self.inner.write_u32::<LittleEndian>(deflated.len() as u32)?;
        self.inner.write_u32::<LittleEndian>(chunk.len() as u32)?;
        self.inner.write_all(&deflated)?;

        Ok(())
    }
}

impl<W: Write> Write for PfsBlockWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.total_in += buf.len() as u64;

        while self.pending.len() >= MAX_BLOCK_SIZE {
            let rest = self.pending.split_off(MAX_BLOCK_SIZE);
            let chunk = std::mem::replace(&mut self.pending, rest);
            self.emit_block(&chunk)?;
        }

        Ok(buf.len())
    }

    #[instrument(skip(self), err)]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
