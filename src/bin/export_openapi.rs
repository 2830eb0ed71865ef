//! Export the OpenAPI document as JSON
//!
//! Usage:
//!   cargo run --bin export_openapi > openapi.json
//!
//! Or with file output:
//!   cargo run --bin export_openapi -- --output docs/openapi.json

use clap::Parser;
use food_randomizer::gateway::openapi::ApiDoc;
use utoipa::OpenApi;

#[derive(Parser, Debug)]
#[command(name = "export_openapi", about = "Write the OpenAPI document as JSON")]
struct Args {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let json = ApiDoc::openapi().to_pretty_json()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            eprintln!("OpenAPI document exported to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
