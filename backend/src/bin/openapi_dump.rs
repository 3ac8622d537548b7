//! Print the OpenAPI document as JSON.

use color_eyre::eyre::Result;
use public_api::doc::ApiDoc;
use std::io::Write;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi().to_pretty_json()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{document}")?;
    Ok(())
}
