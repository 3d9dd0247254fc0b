mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use colored::Colorize;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::presentation::cli::Cli;

/// hsp: HTTP Superpowers
///
/// An interactive HTTP client for the terminal. `hsp request` walks through
/// URL, method, headers, query parameters and body, previews the request,
/// sends it and keeps a JSON record of every request sent. `hsp get` and
/// `hsp post` are one-shot shortcuts.
#[tokio::main]
async fn main() {
    infrastructure::logging::init();

    let cli = Cli::parse();
    let config = cli.config();

    let request_service = match HyperHttpClient::new(config.timeout) {
        Ok(http_client) => http_client.create_request_service(),
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            std::process::exit(1);
        }
    };

    if let Err(err) = cli.run(&config, &request_service).await {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}
