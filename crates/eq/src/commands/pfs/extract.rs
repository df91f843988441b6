use clap::Args;
use eq_pfs::{read::PfsFile, PfsArchive};
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input PFS file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Extract only the named entry instead of the whole archive
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let mut f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut pfs = PfsArchive::new(&mut f)?;

        match &self.name {
            Some(name) => {
                let index = pfs
                    .index_for_name(name)
                    .ok_or_else(|| miette::miette!("{} is not in the archive", name))?;
                let entry = pfs.by_index(index)?;
                self.write_entry(entry)?;
            }
            None => {
                for i in 0..pfs.len() {
                    let entry = pfs.by_index(i)?;
                    self.write_entry(entry)?;
                }
            }
        }

        Ok(())
    }

    fn write_entry(&self, mut entry: PfsFile<'_, &mut File>) -> Result<()> {
        let p = self.directory.join(entry.name());
        info!("writing {}", p.display());

        if let Some(parent) = p.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let mut out = if !self.overwrite {
            File::create_new(&p)
                .into_diagnostic()
                .context(format!("creating {}", &p.display()))?
        } else {
            File::create(&p)
                .into_diagnostic()
                .context(format!("creating {}", &p.display()))?
        };

        std::io::copy(&mut entry, &mut out).into_diagnostic()?;
        Ok(())
    }
}
