use crate::application::services::HttpRequestService;
use crate::infrastructure::config::{Config, HISTORY_DIR_ENV_VAR};
use crate::presentation::commands;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::io;

/// CLI configuration for hsp
#[derive(Parser, Debug)]
#[command(name = "hsp", version = "0.1.0")]
#[command(about = "HTTP Superpowers: build and send HTTP requests from the terminal")]
#[command(long_about = "Interactive HTTP client.\n\n\
    Run 'hsp request' and answer the prompts: URL, method, headers, query\n\
    parameters, body and output style. The request is previewed before it is\n\
    sent, and every sent request is saved to the history directory.")]
pub struct Cli {
    /// Where sent requests are recorded (default: ~/.hsp/history)
    #[arg(long, global = true, env = HISTORY_DIR_ENV_VAR)]
    pub history_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build and send a request step by step
    Request,

    /// Send a GET request
    Get {
        url: String,

        /// Extra header as 'Name: Value' (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Pretty-print JSON output
        #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
        pretty: bool,
    },

    /// Send a POST request with a JSON payload
    Post {
        url: String,

        /// JSON payload
        #[arg(long)]
        json: Option<String>,

        /// Extra header as 'Name: Value' (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::load(self.history_dir.as_deref())
    }

    pub async fn run(&self, config: &Config, request_service: &HttpRequestService) -> Result<()> {
        match &self.command {
            Command::Request => {
                let stdin = io::stdin();
                commands::run_interactive(config, request_service, stdin.lock(), io::stdout())
                    .await
            }
            Command::Get {
                url,
                headers,
                pretty,
            } => commands::run_get(request_service, url, headers, *pretty, io::stdout()).await,
            Command::Post { url, json, headers } => {
                commands::run_post(request_service, url, json, headers, io::stdout()).await
            }
        }
    }
}
