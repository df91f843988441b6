use clap::Args;
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use super::{open_table, save_table};

#[derive(Args)]
pub struct RenameArgs {
    /// A PFS file to edit
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Entry name to change
    #[arg(short, long, value_name = "NAME")]
    name: String,

    /// The entry's new name
    #[arg(short, long, value_name = "NAME")]
    to: String,
}

impl RenameArgs {
    pub fn handle(&self) -> Result<()> {
        let mut table = open_table(&self.file)?;
        table.rename(&self.name, &self.to)?;
        save_table(&self.file, &mut table)?;

        info!(
            "renamed {} to {} in {}",
            self.name,
            self.to,
            self.file.display()
        );

        Ok(())
    }
}
