//! The in-memory editing model for an open archive.
//!
//! [`PfsTable`] decodes a container into named byte payloads and mediates every read and
//! write against them until the caller re-encodes. Nothing touches disk between `open` and
//! `encode`; the table is the source of truth for the session.

use indexmap::IndexMap;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::instrument;

use crate::{
    error::{Error, FileNotFoundError, Result},
    read::PfsArchive,
    write::{PfsWriter, PfsWriterOptions},
};

/// One named payload inside an open archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfsEntry {
    name: Box<str>,
    data: Vec<u8>,
}

impl PfsEntry {
    /// The entry's file name, in its original case.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's raw, undecoded payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// The decoded directory of one container archive, open for editing.
///
/// Names are unique within a table and compare case-insensitively; insertion order is
/// preserved for display. Mutations are pure in-memory edits; only [`PfsTable::encode`]
/// persists anything.
#[derive(Debug, Default)]
pub struct PfsTable {
    files: IndexMap<Box<str>, PfsEntry>,
    footer_date: Option<u32>,
    dirty: bool,
}

impl PfsTable {
    /// Create an empty table, not backed by any container.
    pub fn new() -> PfsTable {
        PfsTable::default()
    }

    /// Decode a container into a table, reading every payload into memory.
    #[instrument(skip(reader), err)]
    pub fn open<R: Read + Seek>(reader: R) -> Result<PfsTable> {
        let mut archive = PfsArchive::new(reader)?;

        let mut files = IndexMap::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            let name: Box<str> = file.name().into();
            file.read_to_end(&mut data)?;

            files.insert(
                name.to_ascii_lowercase().into(),
                PfsEntry { name, data },
            );
        }

        Ok(PfsTable {
            files,
            footer_date: archive.footer().map(|f| f.date),
            dirty: false,
        })
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether the table holds edits that have not been encoded yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Date stamp decoded from the container's footer, when one was present.
    pub fn footer_date(&self) -> Option<u32> {
        self.footer_date
    }

    /// Read-only view of the entries, in stable display order.
    pub fn files(&self) -> impl Iterator<Item = &PfsEntry> {
        self.files.values()
    }

    /// Look up an entry's payload by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&[u8]> {
        self.files
            .get(name.to_ascii_lowercase().as_str())
            .map(|entry| entry.data())
            .ok_or_else(|| Error::FileNotFound(FileNotFoundError::Name(name.to_owned())))
    }

    /// Insert a new entry or overwrite an existing one's payload.
    ///
    /// An empty name is rejected. A name without an extension is rejected when it would
    /// create a new entry; overwriting an existing entry is exempt from the extension rule.
    #[instrument(skip(self, data), err)]
    pub fn set(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::NameRequired);
        }

        let key = name.to_ascii_lowercase();
        match self.files.get_mut(key.as_str()) {
            Some(entry) => {
                entry.data = data;
            }
            None => {
                Self::require_extension(name)?;
                self.files.insert(
                    key.into(),
                    PfsEntry {
                        name: name.into(),
                        data,
                    },
                );
            }
        }

        self.dirty = true;
        Ok(())
    }

    /// Delete an entry by name, ignoring case.
    #[instrument(skip(self), err)]
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.files
            .shift_remove(name.to_ascii_lowercase().as_str())
            .ok_or_else(|| Error::FileNotFound(FileNotFoundError::Name(name.to_owned())))?;

        self.dirty = true;
        Ok(())
    }

    /// Give an entry a new name, keeping its position and payload.
    ///
    /// Fails without touching the table when the old name is absent, the new name is
    /// invalid, or the new name already belongs to a different entry (ignoring case).
    #[instrument(skip(self), err)]
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if new_name.is_empty() {
            return Err(Error::NameRequired);
        }
        Self::require_extension(new_name)?;

        let old_key = old_name.to_ascii_lowercase();
        let new_key = new_name.to_ascii_lowercase();

        let Some(index) = self.files.get_index_of(old_key.as_str()) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                old_name.to_owned(),
            )));
        };

        if old_key != new_key && self.files.contains_key(new_key.as_str()) {
            return Err(Error::NameConflict(new_name.to_owned()));
        }

        let (_, mut entry) = self
            .files
            .shift_remove_index(index)
            .expect("index was just resolved from the old name");
        entry.name = new_name.into();
        self.files.shift_insert(index, new_key.into(), entry);

        self.dirty = true;
        Ok(())
    }

    /// Serialize the current entry set back to the container layout.
    ///
    /// Clears the dirty flag and re-emits a footer when the source container carried one.
    /// Round-trip fidelity is relaxed: re-opening the output yields byte-identical
    /// `(name, data)` pairs for every entry, but container framing (directory order, block
    /// boundaries, zlib bytes) is not guaranteed to match the source.
    #[instrument(skip_all, err)]
    pub fn encode<W: Write + Seek>(&mut self, writer: W) -> Result<W> {
        let options = PfsWriterOptions::builder()
            .maybe_footer_date(self.footer_date)
            .build();

        let mut pfs = PfsWriter::new(writer, options);
        for entry in self.files.values() {
            pfs.start_file(entry.name())?;
            pfs.write_all(entry.data())?;
        }
        let inner = pfs.finish()?;

        self.dirty = false;
        Ok(inner)
    }

    fn require_extension(name: &str) -> Result<()> {
        if Path::new(name).extension().is_none() {
            return Err(Error::MissingExtension(name.to_owned()));
        }
        Ok(())
    }
}
