use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Parser)]
#[command(name = "slicer-cli")]
#[command(about = "Command-line client for the slicer proxy", long_about = None)]
struct Cli {
    /// Proxy base URL, including the API prefix.
    #[arg(short, long, default_value = "http://127.0.0.1:7130/server/orcaslicer")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check slicer service health
    Health,
    /// Show slicing status
    Status,
    /// List profiles in a category (printer, process, filament)
    Profiles { category: String },
    /// Show one profile
    Show { category: String, name: String },
    /// Upload a new profile file
    Upload { category: String, file: PathBuf },
    /// Replace an existing profile with a file
    Replace {
        category: String,
        name: String,
        file: PathBuf,
    },
    /// Rename a profile
    Rename {
        category: String,
        name: String,
        new_name: String,
    },
    /// Delete a profile
    Delete { category: String, name: String },
    /// Slice a model; the G-code lands in the printer's gcodes directory
    Slice {
        model: PathBuf,
        #[arg(long)]
        printer: String,
        #[arg(long)]
        process: String,
        #[arg(long)]
        filament: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = Url::parse(cli.url.trim_end_matches('/'))?;

    match cli.command {
        Commands::Health => {
            let res = client.get(endpoint(&base, &["health"])?).send().await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client.get(endpoint(&base, &["status"])?).send().await?;
            print_response(res).await?;
        }
        Commands::Profiles { category } => {
            let res = client
                .get(endpoint(&base, &["profiles", &category])?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Show { category, name } => {
            let res = client
                .get(endpoint(&base, &["profiles", &category, &name])?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Upload { category, file } => {
            let form = Form::new().part("file", file_part(&file).await?);
            let res = client
                .post(endpoint(&base, &["profiles", &category])?)
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Replace {
            category,
            name,
            file,
        } => {
            let form = Form::new().part("file", file_part(&file).await?);
            let res = client
                .post(endpoint(&base, &["profiles", &category, &name])?)
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Rename {
            category,
            name,
            new_name,
        } => {
            let res = client
                .post(endpoint(&base, &["profiles", &category, &name])?)
                .json(&json!({ "new_name": new_name }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete { category, name } => {
            let res = client
                .delete(endpoint(&base, &["profiles", &category, &name])?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Slice {
            model,
            printer,
            process,
            filament,
        } => {
            let form = Form::new()
                .part("model", file_part(&model).await?)
                .text("printer", printer)
                .text("process", process)
                .text("filament", filament);
            let res = client
                .post(endpoint(&base, &["slice"])?)
                .multipart(form)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Append path segments, percent-encoding each one (profile names may hold `/`).
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn file_part(path: &Path) -> Result<Part, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes)
        .file_name(name)
        .mime_str("application/octet-stream")?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
