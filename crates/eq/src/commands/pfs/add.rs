use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

use super::{open_table, save_table};

#[derive(Args)]
pub struct AddArgs {
    /// A PFS file to edit
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A local file to insert
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Entry name inside the archive; defaults to the input's file name
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,
}

impl AddArgs {
    pub fn handle(&self) -> Result<()> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => self
                .input
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| miette::miette!("unable to derive an entry name"))?
                .to_owned(),
        };

        let data = std::fs::read(&self.input)
            .into_diagnostic()
            .context(format!("reading {}", self.input.display()))?;

        let mut table = open_table(&self.file)?;
        table.set(&name, data)?;
        save_table(&self.file, &mut table)?;

        info!("added {} to {}", name, self.file.display());

        Ok(())
    }
}
