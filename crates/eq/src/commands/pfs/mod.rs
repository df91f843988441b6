use std::fs::File;
use std::path::Path;

use eq_pfs::PfsTable;
use miette::{Context, IntoDiagnostic, Result};

pub mod add;
pub mod diff;
pub mod extract;
pub mod list;
pub mod pack;
pub mod remove;
pub mod rename;
pub mod show;

#[derive(clap::Subcommand)]
pub enum PfsCommands {
    /// List the entries of a PFS archive
    List(list::ListArgs),
    /// Extract a PFS archive into a directory
    Extract(extract::ExtractArgs),
    /// Pack a directory into a PFS archive
    Pack(pack::PackArgs),
    /// Add or replace one entry in a PFS archive
    Add(add::AddArgs),
    /// Remove one entry from a PFS archive
    Remove(remove::RemoveArgs),
    /// Rename one entry inside a PFS archive
    Rename(rename::RenameArgs),
    /// Show a decoded view of one entry
    Show(show::ShowArgs),
    /// Compare two PFS archives
    Diff(diff::DiffArgs),
}

impl PfsCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            PfsCommands::List(list) => list.handle(),
            PfsCommands::Extract(extract) => extract.handle(),
            PfsCommands::Pack(pack) => pack.handle(),
            PfsCommands::Add(add) => add.handle(),
            PfsCommands::Remove(remove) => remove.handle(),
            PfsCommands::Rename(rename) => rename.handle(),
            PfsCommands::Show(show) => show.handle(),
            PfsCommands::Diff(diff) => diff.handle(),
        }
    }
}

/// Decode an archive into an editing table.
pub(crate) fn open_table(path: &Path) -> Result<PfsTable> {
    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    Ok(PfsTable::open(f)?)
}

/// Persist an edited table back to disk.
pub(crate) fn save_table(path: &Path, table: &mut PfsTable) -> Result<()> {
    let mut f = File::create(path)
        .into_diagnostic()
        .context(format!("creating {}", path.display()))?;

    table.encode(&mut f)?;
    Ok(())
}
