use clap::Args;
use eq_pfs::write::{PfsWriter, PfsWriterOptions};
use miette::miette;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Args)]
pub struct PackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target PFS file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Date stamp for the archive footer, seconds since the unix epoch
    #[arg(long, value_name = "SECONDS")]
    date: Option<u32>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PackArgs {
    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        let mut out = if !self.overwrite {
            File::create_new(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", &self.file.display()))?
        } else {
            File::create(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", &self.file.display()))?
        };

        let options = PfsWriterOptions::builder()
            .maybe_footer_date(self.date)
            .build();
        let mut pfs = PfsWriter::new(&mut out, options);

        for file in files {
            let name = file
                .path()
                .strip_prefix(&self.directory)
                .into_diagnostic()?;
            info!("packing {}", name.display());

            pfs.start_file(
                name.to_str()
                    .ok_or(miette!("unable to convert {} to a string", name.display()))?,
            )
            .context(format!("starting entry for {}", name.display()))?;

            let mut f = File::open(file.path())
                .into_diagnostic()
                .context(format!("opening {}", file.path().display()))?;

            std::io::copy(&mut f, &mut pfs)
                .into_diagnostic()
                .context(format!("copying {}", file.path().display()))?;
        }

        pfs.finish().context("finalizing pfs file")?;

        Ok(())
    }
}
