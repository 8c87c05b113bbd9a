use clap::Parser;

use crate::cli::{Cli, Command};
use crate::client::DepotClient;

mod cli;
mod client;
mod error;

const DEFAULT_URL: &str = "http://127.0.0.1:2021";

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let url = cli
        .url
        .clone()
        .or_else(|| std::env::var("DEPOT_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_owned());

    let client = DepotClient::new(url);
    if let Err(err) = run(&client, cli.command).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(client: &DepotClient, command: Command) -> error::Result<()> {
    let output = match command {
        Command::Ping => client.ping().await?,
        Command::Add { paths } => client.add(&paths).await?,
        Command::Ls => client.list().await?,
        Command::Rm { path } => client.remove(&path).await?,
        Command::Update { path } => client.update(&path).await?,
        Command::Wc => client.word_count().await?,
        Command::Freq { order, limit } => {
            client.frequent_words(&order, limit).await?
        }
    };
    print!("{output}");
    Ok(())
}
