//! Print or write the OpenAPI document as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::Write as _;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use orders_backend::doc::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Render the orders API OpenAPI document",
    version
)]
struct CliArgs {
    /// Write the document to this file instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn write_document(path: &Path, json: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("output path {} has no file name", path.display()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open output directory {}", parent.display()))?;
    dir.write(Path::new(file_name), json.as_bytes())
        .wrap_err_with(|| format!("write {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;

    match args.output {
        Some(path) => write_document(&path, &json),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").wrap_err("write OpenAPI document to stdout")
        }
    }
}
