pub mod pfs;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle PFS archives
    Pfs {
        #[command(subcommand)]
        command: pfs::PfsCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Pfs { command } => command.handle(),
        }
    }
}
