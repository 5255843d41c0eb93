//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI document of the REST surface. With no argument it is
//! written to `openapi.json`; `-` prints it to stdout instead.

use api_lib::web::rest::ApiDoc;
use std::io::Write;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    let json = ApiDoc::openapi().to_pretty_json()?;

    if target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(&target, json)?;
        eprintln!("Wrote {} ({} routes)", target, ApiDoc::openapi().paths.paths.len());
    }
    Ok(())
}
