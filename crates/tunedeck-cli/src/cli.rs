use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tunedeck")]
#[command(bin_name = "tunedeck")]
#[command(version)]
#[command(about = "Settings editor and library search for tunedeck")]
pub struct Cli {
    #[arg(long, global = true, help = "Write a diagnostics log for this run")]
    pub diagnostics: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Print the stored settings with defaults filled in")]
    Show,
    #[command(about = "Resolve one search query against the local catalog")]
    Suggest {
        #[arg(help = "Query text; prefix with the tag marker to search tags")]
        query: String,
    },
}
