use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "subjects", about = "CLI for listing, fetching and autocompleting subjects")]
struct Cli {
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Preferred language for multilingual fields, sent as Accept-Language.
    #[arg(long)]
    language: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    List {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
    },
    Get {
        id: String,
    },
    Autocomplete {
        query: String,
    },
}

#[derive(Deserialize)]
struct Config {
    base_url: String,
    #[serde(default = "default_api_version")]
    api_version: String,
}

fn default_api_version() -> String {
    "v1.0".to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let base_url = format!(
        "{}/api/{}/subjects",
        config.base_url.trim_end_matches('/'),
        config.api_version
    );

    let mut headers = HeaderMap::new();
    if let Some(language) = cli.language.as_deref() {
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(language).context("invalid language")?,
        );
    }

    let client = reqwest::Client::new();
    match cli.command {
        Commands::List {
            query,
            limit,
            offset,
        } => {
            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(query) = query {
                params.push(("query", query));
            }
            if let Some(limit) = limit {
                params.push(("limit", limit.to_string()));
            }
            if let Some(offset) = offset {
                params.push(("offset", offset.to_string()));
            }

            let response = client
                .get(format!("{}/", base_url))
                .headers(headers)
                .query(&params)
                .send()
                .await
                .context("failed to send list request")?;
            handle_response(response).await?;
        }
        Commands::Autocomplete { query } => {
            let response = client
                .get(format!("{}/autocomplete/", base_url))
                .headers(headers)
                .query(&[("query", query)])
                .send()
                .await
                .context("failed to send autocomplete request")?;
            handle_response(response).await?;
        }
        Commands::Get { id } => {
            let mut url = reqwest::Url::parse(&base_url).context("invalid base_url")?;
            url.path_segments_mut()
                .map_err(|_| anyhow::anyhow!("base_url cannot be a base"))?
                .push(&id)
                .push("");

            let response = client
                .get(url)
                .headers(headers)
                .send()
                .await
                .context("failed to send get request")?;
            handle_response(response).await?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

async fn handle_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    let body = response.text().await.context("failed to read response")?;
    if !status.is_success() {
        anyhow::bail!("request failed with status {}: {}", status, body);
    }
    println!("{}", body);
    Ok(())
}
