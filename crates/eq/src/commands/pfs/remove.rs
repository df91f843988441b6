use clap::Args;
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use super::{open_table, save_table};

#[derive(Args)]
pub struct RemoveArgs {
    /// A PFS file to edit
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Entry name to delete
    #[arg(short, long, value_name = "NAME")]
    name: String,
}

impl RemoveArgs {
    pub fn handle(&self) -> Result<()> {
        let mut table = open_table(&self.file)?;
        table.remove(&self.name)?;
        save_table(&self.file, &mut table)?;

        info!("removed {} from {}", self.name, self.file.display());

        Ok(())
    }
}
