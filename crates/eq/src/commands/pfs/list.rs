use clap::Args;
use eq_pfs::PfsArchive;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};

#[derive(Args)]
pub struct ListArgs {
    /// An input PFS file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let mut f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut pfs = PfsArchive::new(&mut f)?;

        for i in 0..pfs.len() {
            let file = pfs.by_index(i)?;
            println!("{:>12}  {}", file.size(), file.name());
        }
        println!(
            "{} entries, {} bytes decompressed",
            pfs.len(),
            pfs.decompressed_size().unwrap_or_default()
        );

        Ok(())
    }
}
