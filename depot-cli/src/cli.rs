use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "depot-cli")]
#[clap(about = "Talk to a depot file server", long_about = None)]
pub struct Cli {
    /// Server base URL. Falls back to $DEPOT_URL, then localhost.
    #[clap(long)]
    pub url: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[clap(about = "Check that the server is up")]
    Ping,

    #[clap(about = "Upload one or more files")]
    Add {
        #[clap(required = true)]
        paths: Vec<PathBuf>,
    },

    #[clap(about = "List stored files")]
    Ls,

    #[clap(about = "Delete the stored file matching this file's content")]
    Rm { path: PathBuf },

    #[clap(about = "Update a stored file by name, creating it if missing")]
    Update { path: PathBuf },

    #[clap(about = "Total word count across all stored files")]
    Wc,

    #[clap(about = "Show the most or least frequent words")]
    Freq {
        /// Ranking direction: `asc` or `dsc`.
        #[clap(long)]
        order: String,

        /// How many words to show (server default applies when omitted).
        #[clap(long)]
        limit: Option<u64>,
    },
}
