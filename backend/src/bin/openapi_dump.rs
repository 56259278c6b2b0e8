//! Print the OpenAPI document as JSON, or YAML with `--yaml`.

use booksyde::doc::ApiDoc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use utoipa::OpenApi;

#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Print the OpenAPI document")]
struct Args {
    /// Emit YAML instead of pretty-printed JSON.
    #[arg(long)]
    yaml: bool,
}

#[expect(clippy::print_stdout, reason = "the document is this binary's output")]
fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let rendered = if args.yaml {
        doc.to_yaml().wrap_err("failed to render OpenAPI as YAML")?
    } else {
        doc.to_pretty_json()
            .wrap_err("failed to render OpenAPI as JSON")?
    };
    println!("{rendered}");
    Ok(())
}
